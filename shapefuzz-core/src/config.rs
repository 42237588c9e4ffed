//! Generator configuration

use crate::constants::{DEFAULT_MAX_CONSUMABLE, DEFAULT_MAX_DEPTH};
use crate::error::Error;
use serde::{Deserialize, Serialize};

/// What to do with a private field of an aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldStrategy {
    /// Skip the field; no bytes are consumed for it
    #[default]
    Ignore,
    /// Populate the field as if it were public
    ForceAccess,
    /// Abort the whole generation
    Fail,
}

/// What to do with a shape that has no structural generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStrategy {
    /// Leave the value as it is and continue
    #[default]
    Ignore,
    /// Abort the whole generation with an error naming the type
    Fail,
}

/// Knobs controlling a [`crate::Generator`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Probability in `[0, 1]` that an optional container is left empty
    ///
    /// At `0.0` no gate byte is drawn at all.
    pub nil_chance: f32,

    /// Recursion ceiling; subtrees at or below it keep their current value
    pub max_depth: usize,

    /// Cap on the cursor position and on any single length-framed read
    pub max_consumable: usize,

    /// Handling of private aggregate fields
    pub unexported_fields: FieldStrategy,

    /// Handling of shapes with no structural generation
    pub unknown_shapes: UnknownStrategy,

    /// Whether registered overrides are consulted
    pub overrides_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            nil_chance: 0.0,
            max_depth: DEFAULT_MAX_DEPTH,
            max_consumable: DEFAULT_MAX_CONSUMABLE,
            unexported_fields: FieldStrategy::default(),
            unknown_shapes: UnknownStrategy::default(),
            overrides_enabled: true,
        }
    }
}

impl Config {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=1.0).contains(&self.nil_chance) {
            return Err(Error::InvalidConfig(format!(
                "nil_chance {} outside [0, 1]",
                self.nil_chance
            )));
        }

        if self.max_consumable == 0 {
            return Err(Error::InvalidConfig(
                "max_consumable must be non-zero".into(),
            ));
        }

        Ok(())
    }

    /// The nil gate threshold on the `0..10` scale, or `None` when no gate is drawn
    pub(crate) fn nil_threshold(&self) -> Option<f32> {
        if self.nil_chance > 0.0 {
            Some(self.nil_chance * f32::from(crate::constants::NIL_GATE_SCALE))
        } else {
            None
        }
    }
}

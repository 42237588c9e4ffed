//! Type-directed generation over a byte cursor

use crate::config::{Config, FieldStrategy, UnknownStrategy};
use crate::constants::{MAP_ENTRY_CAP, NIL_GATE_SCALE, PARTIAL_SEQUENCE_MIN};
use crate::cursor::ByteCursor;
use crate::error::{BoxError, Error};
use crate::overrides::{Continue, OverrideRegistry};
use crate::types::{FieldAccess, Generate};
use crate::Result;
use bytes::Bytes;
use core::any::type_name;

#[cfg(feature = "logging")]
use tracing::{debug, trace, warn};

/// Populates values of arbitrary [`Generate`] types from one fuzz input
///
/// Construct one per input and discard it afterwards. The cursor position
/// carries over between calls; depth restarts at zero for each.
#[derive(Debug)]
pub struct Generator {
    cursor: ByteCursor,
    config: Config,
    overrides: OverrideRegistry,
}

impl Generator {
    /// Create a generator with the default configuration and no overrides
    pub fn new(data: impl Into<Bytes>) -> Self {
        let config = Config::default();
        Self {
            cursor: ByteCursor::with_max_consumable(data, config.max_consumable),
            config,
            overrides: OverrideRegistry::new(),
        }
    }

    /// Start building a generator over `data`
    pub fn builder(data: impl Into<Bytes>) -> GeneratorBuilder {
        GeneratorBuilder::new(data)
    }

    /// Create a generator with an explicit configuration
    pub fn with_config(data: impl Into<Bytes>, config: Config) -> Result<Self> {
        GeneratorBuilder::new(data).config(config).build()
    }

    /// Populate `target` in place
    ///
    /// On error the traversal is abandoned; `target` may hold values
    /// populated before the failure.
    pub fn generate_struct<T: Generate>(&mut self, target: &mut T) -> Result<()> {
        #[cfg(feature = "logging")]
        let start = self.cursor.position();

        #[cfg(feature = "logging")]
        debug!(
            "Generating {} from {} available bytes",
            type_name::<T>(),
            self.cursor.remaining()
        );

        let mut root = Traversal {
            cursor: &mut self.cursor,
            config: &self.config,
            overrides: &self.overrides,
            depth: 0,
        };
        let result = root.visit(target);

        #[cfg(feature = "logging")]
        {
            match &result {
                Ok(()) => debug!(
                    "Generated {}: consumed {} bytes, position {}",
                    type_name::<T>(),
                    self.cursor.position() - start,
                    self.cursor.position()
                ),
                Err(e) => debug!("Generation of {} stopped: {}", type_name::<T>(), e),
            }
        }

        result
    }

    /// Generate a fresh value of `T`
    pub fn generate<T: Generate + Default>(&mut self) -> Result<T> {
        let mut value = T::default();
        self.generate_struct(&mut value)?;
        Ok(value)
    }

    /// Direct access to the underlying cursor for raw draws
    pub fn cursor(&mut self) -> &mut ByteCursor {
        &mut self.cursor
    }

    /// Bytes consumed so far
    pub fn consumed(&self) -> usize {
        self.cursor.position()
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Builder for a [`Generator`]
#[derive(Debug)]
pub struct GeneratorBuilder {
    data: Bytes,
    config: Config,
    overrides: OverrideRegistry,
}

impl GeneratorBuilder {
    /// Create a builder with the default configuration
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            config: Config::default(),
            overrides: OverrideRegistry::new(),
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the probability that optional containers stay empty
    pub fn nil_chance(mut self, nil_chance: f32) -> Self {
        self.config.nil_chance = nil_chance;
        self
    }

    /// Set the recursion ceiling
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Set the cap on consumed bytes
    pub fn max_consumable(mut self, max_consumable: usize) -> Self {
        self.config.max_consumable = max_consumable;
        self
    }

    /// Set how private aggregate fields are handled
    pub fn unexported_fields(mut self, strategy: FieldStrategy) -> Self {
        self.config.unexported_fields = strategy;
        self
    }

    /// Set how unknown shapes are handled
    pub fn unknown_shapes(mut self, strategy: UnknownStrategy) -> Self {
        self.config.unknown_shapes = strategy;
        self
    }

    /// Ignore every registered override
    pub fn without_overrides(mut self) -> Self {
        self.config.overrides_enabled = false;
        self
    }

    /// Register an override used in place of structural generation for `T`
    ///
    /// A later registration for the same type replaces the earlier one.
    pub fn with_override<T, F>(mut self, f: F) -> Self
    where
        T: Generate,
        F: Fn(&mut T, &mut Continue<'_, '_>) -> core::result::Result<(), BoxError> + 'static,
    {
        self.overrides.register::<T, F>(f);
        self
    }

    /// Validate the configuration and build the generator
    pub fn build(self) -> Result<Generator> {
        self.config.validate()?;
        Ok(Generator {
            cursor: ByteCursor::with_max_consumable(self.data, self.config.max_consumable),
            config: self.config,
            overrides: self.overrides,
        })
    }
}

/// One node of a depth-first traversal
///
/// Each child gets its own `Traversal` one level deeper, so the parent's depth
/// is unchanged when the child returns.
pub struct Traversal<'g> {
    cursor: &'g mut ByteCursor,
    config: &'g Config,
    overrides: &'g OverrideRegistry,
    depth: usize,
}

impl Traversal<'_> {
    /// Depth of this node; the root is zero
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        self.config
    }

    /// The shared cursor
    pub fn cursor(&mut self) -> &mut ByteCursor {
        &mut *self.cursor
    }

    pub(crate) fn cursor_ref(&self) -> &ByteCursor {
        &*self.cursor
    }

    /// Populate a child of this node
    pub fn fill<T: Generate>(&mut self, target: &mut T) -> Result<()> {
        let mut child = Traversal {
            cursor: &mut *self.cursor,
            config: self.config,
            overrides: self.overrides,
            depth: self.depth + 1,
        };
        child.visit(target)
    }

    fn visit<T: Generate>(&mut self, target: &mut T) -> Result<()> {
        if self.depth >= self.config.max_depth {
            #[cfg(feature = "logging")]
            trace!("Depth cutoff at {} for {}", self.depth, type_name::<T>());
            return Ok(());
        }

        if self.config.overrides_enabled {
            let overrides = self.overrides;
            if let Some(result) = overrides.invoke(target, self) {
                return result;
            }
        }

        #[cfg(feature = "logging")]
        trace!("Populating {} as {:?}", type_name::<T>(), T::SHAPE);

        target.populate(self)
    }

    /// Draw the nil gate; true means the optional container stays empty
    ///
    /// No byte is drawn when `nil_chance` is zero.
    pub fn nil_gate(&mut self) -> Result<bool> {
        let Some(threshold) = self.config.nil_threshold() else {
            return Ok(false);
        };
        let gate = self.cursor.byte()? % NIL_GATE_SCALE;
        let is_nil = f32::from(gate) < threshold;

        #[cfg(feature = "logging")]
        trace!("Nil gate {} at depth {}: nil = {}", gate, self.depth, is_nil);

        Ok(is_nil)
    }

    /// Populate one field of an aggregate according to its access
    pub fn field<T: Generate>(
        &mut self,
        aggregate: &'static str,
        name: &'static str,
        access: FieldAccess,
        target: &mut T,
    ) -> Result<()> {
        match (access, self.config.unexported_fields) {
            (FieldAccess::Public, _) | (FieldAccess::Private, FieldStrategy::ForceAccess) => {
                self.fill(target)
            }
            (FieldAccess::Private, FieldStrategy::Ignore) => Ok(()),
            (FieldAccess::Private, FieldStrategy::Fail) => {
                #[cfg(feature = "logging")]
                warn!("Private field {}.{} rejected", aggregate, name);

                Err(Error::PrivateField {
                    aggregate,
                    field: name,
                })
            }
        }
    }

    /// Populate a variable-length sequence
    ///
    /// The element count comes from one seed byte modulo `T::ELEMENT_CAP`,
    /// clamped to the remaining budget. Running out of bytes after at least
    /// [`PARTIAL_SEQUENCE_MIN`] elements keeps the populated prefix.
    pub fn sequence<T: Generate + Default>(&mut self, target: &mut Vec<T>) -> Result<()> {
        if self.nil_gate()? {
            target.clear();
            return Ok(());
        }

        let seed = self.cursor.u32()?;
        let count = (seed.checked_rem(T::ELEMENT_CAP).unwrap_or(0) as usize)
            .min(self.cursor.remaining());

        let mut elements: Vec<T> = (0..count).map(|_| T::default()).collect();
        let mut populated = count;
        for (i, element) in elements.iter_mut().enumerate() {
            match self.fill(element) {
                Ok(()) => {}
                Err(Error::InsufficientBytes { .. }) if i >= PARTIAL_SEQUENCE_MIN => {
                    #[cfg(feature = "logging")]
                    debug!(
                        "Sequence of {} truncated to {} of {} elements",
                        type_name::<T>(),
                        i,
                        count
                    );
                    populated = i;
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        elements.truncate(populated);

        *target = elements;
        Ok(())
    }

    /// Generate the entries of an associative collection
    ///
    /// Returns no entries when the nil gate fires. Keys may collide; callers
    /// collect in order so the last write wins.
    pub fn entries<K, V>(&mut self) -> Result<Vec<(K, V)>>
    where
        K: Generate + Default,
        V: Generate + Default,
    {
        if self.nil_gate()? {
            return Ok(Vec::new());
        }

        let count = self.cursor.int_like()? % MAP_ENTRY_CAP;
        let mut entries = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let mut key = K::default();
            self.fill(&mut key)?;
            let mut value = V::default();
            self.fill(&mut value)?;
            entries.push((key, value));
        }
        Ok(entries)
    }

    /// Populate an optional value
    ///
    /// The nil gate is always drawn. A fresh value is then populated one level
    /// deeper, through its own override if it has one.
    pub fn optional<T: Generate + Default>(&mut self, target: &mut Option<T>) -> Result<()> {
        if self.nil_gate()? {
            *target = None;
            return Ok(());
        }

        let mut value = T::default();
        self.fill(&mut value)?;
        *target = Some(value);
        Ok(())
    }

    /// Apply the unknown-shape strategy to `T`
    pub fn unknown<T: Generate>(&mut self) -> Result<()> {
        match self.config.unknown_shapes {
            UnknownStrategy::Ignore => {
                #[cfg(feature = "logging")]
                trace!("Ignoring unknown shape {}", type_name::<T>());
                Ok(())
            }
            UnknownStrategy::Fail => {
                #[cfg(feature = "logging")]
                warn!("Unknown shape {} rejected", type_name::<T>());
                Err(Error::UnknownShape(type_name::<T>()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Pair {
        left: u8,
        right: u8,
    }

    impl Generate for Pair {
        const SHAPE: crate::Shape = crate::Shape::Aggregate;

        fn populate(&mut self, traversal: &mut Traversal<'_>) -> Result<()> {
            traversal.field("Pair", "left", FieldAccess::Public, &mut self.left)?;
            traversal.field("Pair", "right", FieldAccess::Private, &mut self.right)
        }
    }

    #[test]
    fn test_private_field_ignored_by_default() {
        let mut generator = Generator::new(vec![7u8, 9]);
        let pair: Pair = generator.generate().unwrap();
        assert_eq!(pair, Pair { left: 7, right: 0 });
        assert_eq!(generator.consumed(), 1);
    }

    #[test]
    fn test_private_field_force_access() {
        let mut generator = Generator::builder(vec![7u8, 9])
            .unexported_fields(FieldStrategy::ForceAccess)
            .build()
            .unwrap();
        let pair: Pair = generator.generate().unwrap();
        assert_eq!(pair, Pair { left: 7, right: 9 });
    }

    #[test]
    fn test_private_field_fail() {
        let mut generator = Generator::builder(vec![7u8, 9])
            .unexported_fields(FieldStrategy::Fail)
            .build()
            .unwrap();
        let err = generator.generate::<Pair>().unwrap_err();
        assert!(matches!(
            err,
            Error::PrivateField {
                aggregate: "Pair",
                field: "right"
            }
        ));
    }

    #[test]
    fn test_depth_zero_leaves_value_untouched() {
        let mut generator = Generator::builder(vec![1u8, 2, 3]).max_depth(0).build().unwrap();
        let mut value = 42u8;
        generator.generate_struct(&mut value).unwrap();
        assert_eq!(value, 42);
        assert_eq!(generator.consumed(), 0);
    }

    #[test]
    fn test_nil_gate_draws_nothing_at_zero_chance() {
        let mut cursor = ByteCursor::new(vec![5u8]);
        let config = Config::default();
        let overrides = OverrideRegistry::new();
        let mut traversal = Traversal {
            cursor: &mut cursor,
            config: &config,
            overrides: &overrides,
            depth: 0,
        };
        assert!(!traversal.nil_gate().unwrap());
        assert_eq!(traversal.cursor().position(), 0);
    }

    #[test]
    fn test_nil_gate_threshold() {
        let config = Config {
            nil_chance: 0.5,
            ..Config::default()
        };
        let overrides = OverrideRegistry::new();
        // 14 % 10 = 4 is below 5, 25 % 10 = 5 is not
        let mut cursor = ByteCursor::new(vec![14u8, 25]);
        let mut traversal = Traversal {
            cursor: &mut cursor,
            config: &config,
            overrides: &overrides,
            depth: 0,
        };
        assert!(traversal.nil_gate().unwrap());
        assert!(!traversal.nil_gate().unwrap());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let result = Generator::builder(Vec::<u8>::new()).nil_chance(2.0).build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_depth_restored_after_fill() {
        let config = Config::default();
        let overrides = OverrideRegistry::new();
        let mut cursor = ByteCursor::new(vec![1u8, 2]);
        let mut traversal = Traversal {
            cursor: &mut cursor,
            config: &config,
            overrides: &overrides,
            depth: 3,
        };
        let mut value = 0u8;
        traversal.fill(&mut value).unwrap();
        assert_eq!(value, 1);
        assert_eq!(traversal.depth(), 3);
    }
}

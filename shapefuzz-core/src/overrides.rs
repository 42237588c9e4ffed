//! Caller-supplied overrides keyed by type

use crate::cursor::ByteCursor;
use crate::error::{BoxError, Error};
use crate::generator::Traversal;
use crate::types::Generate;
use crate::Result;
use core::any::{type_name, Any, TypeId};
use core::fmt;
use core::ops::{Deref, DerefMut};
use std::collections::HashMap;

#[cfg(feature = "logging")]
use tracing::trace;

type OverrideFn =
    Box<dyn Fn(&mut dyn Any, &mut Continue<'_, '_>) -> core::result::Result<(), BoxError>>;

struct Entry {
    type_name: &'static str,
    func: OverrideFn,
}

/// Overrides registered at construction time, looked up by [`TypeId`]
#[derive(Default)]
pub struct OverrideRegistry {
    entries: HashMap<TypeId, Entry>,
}

// Pins the closure signature so its lifetimes are higher-ranked.
fn erased<F>(f: F) -> F
where
    F: Fn(&mut dyn Any, &mut Continue<'_, '_>) -> core::result::Result<(), BoxError>,
{
    f
}

impl OverrideRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` for values of type `T`, replacing any earlier override
    pub fn register<T, F>(&mut self, f: F)
    where
        T: Generate,
        F: Fn(&mut T, &mut Continue<'_, '_>) -> core::result::Result<(), BoxError> + 'static,
    {
        let func = erased(move |value, cont| {
            let value = value
                .downcast_mut::<T>()
                .ok_or("override invoked with a value of another type")?;
            f(value, cont)
        });

        self.entries.insert(
            TypeId::of::<T>(),
            Entry {
                type_name: type_name::<T>(),
                func: Box::new(func),
            },
        );
    }

    /// Check if `T` has an override
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries.contains_key(&TypeId::of::<T>())
    }

    /// Number of registered overrides
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no override is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run the override for `T`, if any, at the traversal's node
    ///
    /// The target is allocated with [`Generate::allocate`] first.
    pub(crate) fn invoke<T: Generate>(
        &self,
        target: &mut T,
        traversal: &mut Traversal<'_>,
    ) -> Option<Result<()>> {
        let entry = self.entries.get(&TypeId::of::<T>())?;

        #[cfg(feature = "logging")]
        trace!("Override for {} at depth {}", entry.type_name, traversal.depth());

        target.allocate();
        let value: &mut dyn Any = target;
        let mut cont = Continue { traversal };
        Some((entry.func)(value, &mut cont).map_err(|source| Error::Override {
            type_name: entry.type_name,
            source,
        }))
    }
}

impl fmt::Debug for OverrideRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.entries.values().map(|entry| entry.type_name))
            .finish()
    }
}

/// Handle given to an override
///
/// Dereferences to the [`ByteCursor`], so overrides draw from the same input
/// at the same position as structural generation.
pub struct Continue<'a, 'g> {
    traversal: &'a mut Traversal<'g>,
}

impl Continue<'_, '_> {
    /// Populate a child value one level below the overridden node
    pub fn fill<T: Generate>(&mut self, target: &mut T) -> Result<()> {
        self.traversal.fill(target)
    }

    /// Generate a fresh child value
    pub fn generate<T: Generate + Default>(&mut self) -> Result<T> {
        let mut value = T::default();
        self.fill(&mut value)?;
        Ok(value)
    }

    /// Depth of the overridden node
    pub fn depth(&self) -> usize {
        self.traversal.depth()
    }
}

impl Deref for Continue<'_, '_> {
    type Target = ByteCursor;

    fn deref(&self) -> &ByteCursor {
        self.traversal.cursor_ref()
    }
}

impl DerefMut for Continue<'_, '_> {
    fn deref_mut(&mut self) -> &mut ByteCursor {
        self.traversal.cursor()
    }
}

//! The rule-source side of the registry.
//!
//! A [`Loader`] turns a type into its [`ValidatorSet`]. The gate calls it at most
//! once per type, so implementations are free to do expensive work (read files,
//! compile rules) without caching anything themselves.

use crate::error::RulebookError;
use crate::types::TypeKey;
use crate::validator::{ValidatorSet, ValidatorSetBuilder};
use fxhash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Produces the validator set for a type.
///
/// # Errors
///
/// Implementations return [`RulebookError::ConfigurationNotFound`] when no rule
/// source exists for the type. Any other error is treated the same way by the
/// gate: logged, then reported as a missing configuration.
pub trait Loader: Send + Sync {
    fn load(&self, ty: &TypeKey) -> Result<ValidatorSet, RulebookError>;
}

impl<L: Loader + ?Sized> Loader for Arc<L> {
    fn load(&self, ty: &TypeKey) -> Result<ValidatorSet, RulebookError> {
        (**self).load(ty)
    }
}

impl<L: Loader + ?Sized> Loader for Box<L> {
    fn load(&self, ty: &TypeKey) -> Result<ValidatorSet, RulebookError> {
        (**self).load(ty)
    }
}

type SetFactory = Box<dyn Fn(ValidatorSetBuilder) -> ValidatorSetBuilder + Send + Sync>;

/// An in-memory [`Loader`] backed by per-type registration closures.
///
/// # Example
///
/// ```rust
/// use rulebook_registry::{FieldFailures, Loader, StaticLoader, TypeKey, Validatable};
///
/// #[derive(Validatable)]
/// struct Person {
///     name: String,
/// }
///
/// let loader = StaticLoader::new().register::<Person>(|set| {
///     set.namespace_fn("default", |_| FieldFailures::new())
/// });
///
/// let set = loader.load(&TypeKey::of::<Person>("Person")).unwrap();
/// assert_eq!(set.len(), 1);
/// ```
#[derive(Default)]
pub struct StaticLoader {
    factories: FxHashMap<TypeId, SetFactory>,
}

impl StaticLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the rule sets for `T`. The closure runs on every `load` call for
    /// `T`; the gate guarantees that happens once.
    #[must_use = "The loader must be handed to a dispatcher"]
    pub fn register<T: Any>(
        mut self,
        factory: impl Fn(ValidatorSetBuilder) -> ValidatorSetBuilder + Send + Sync + 'static,
    ) -> Self {
        self.factories.insert(TypeId::of::<T>(), Box::new(factory));
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl Loader for StaticLoader {
    fn load(&self, ty: &TypeKey) -> Result<ValidatorSet, RulebookError> {
        let factory = self
            .factories
            .get(&ty.id())
            .ok_or_else(|| RulebookError::configuration_not_found(ty.name()))?;
        Ok(factory(ValidatorSet::builder(*ty)).build())
    }
}

impl fmt::Debug for StaticLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticLoader").field("types", &self.factories.len()).finish()
    }
}

//! Contracts consumed from the rule engine, plus the per-type [`ValidatorSet`].

use crate::types::{FieldFailures, TypeKey, Validatable, ValidatorKey};
use fxhash::FxHashMap;
use std::fmt;
use std::sync::Arc;

/// A compiled rule set for one type under one namespace.
///
/// `execute` returns the failing rules per field, in evaluation order. An empty
/// map means the object passed.
pub trait Validator: Send + Sync {
    fn execute(&self, object: &dyn Validatable) -> FieldFailures;
}

/// Adapts a closure into a [`Validator`].
pub struct FnValidator<F>(F);

impl<F> FnValidator<F>
where
    F: Fn(&dyn Validatable) -> FieldFailures + Send + Sync,
{
    pub const fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Validator for FnValidator<F>
where
    F: Fn(&dyn Validatable) -> FieldFailures + Send + Sync,
{
    fn execute(&self, object: &dyn Validatable) -> FieldFailures {
        (self.0)(object)
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnValidator")
    }
}

/// Every namespace-qualified validator known for one type.
///
/// Immutable once built; the registry shares it behind an [`Arc`].
#[derive(Clone)]
pub struct ValidatorSet {
    owner: TypeKey,
    validators: FxHashMap<ValidatorKey, Arc<dyn Validator>>,
}

impl ValidatorSet {
    #[must_use]
    pub fn builder(owner: TypeKey) -> ValidatorSetBuilder {
        ValidatorSetBuilder { owner, validators: FxHashMap::default() }
    }

    /// The type this set was built for.
    #[must_use]
    pub const fn owner(&self) -> TypeKey {
        self.owner
    }

    #[must_use]
    pub fn get(&self, key: &ValidatorKey) -> Option<&Arc<dyn Validator>> {
        self.validators.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &ValidatorKey) -> bool {
        self.validators.contains_key(key)
    }

    /// Keys in this set, sorted for stable output.
    #[must_use]
    pub fn keys(&self) -> Vec<&ValidatorKey> {
        let mut keys: Vec<_> = self.validators.keys().collect();
        keys.sort();
        keys
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSet").field("owner", &self.owner).field("keys", &self.keys()).finish()
    }
}

/// Collects validators for a [`ValidatorSet`].
pub struct ValidatorSetBuilder {
    owner: TypeKey,
    validators: FxHashMap<ValidatorKey, Arc<dyn Validator>>,
}

impl ValidatorSetBuilder {
    /// Registers `validator` under `"{owner}#{namespace}"`. A later registration
    /// for the same namespace replaces the earlier one.
    #[must_use = "The builder must be finished with `build`"]
    pub fn namespace(mut self, namespace: &str, validator: impl Validator + 'static) -> Self {
        self.validators
            .insert(ValidatorKey::new(self.owner.name(), namespace), Arc::new(validator));
        self
    }

    /// Closure shorthand for [`ValidatorSetBuilder::namespace`].
    #[must_use = "The builder must be finished with `build`"]
    pub fn namespace_fn<F>(self, namespace: &str, f: F) -> Self
    where
        F: Fn(&dyn Validatable) -> FieldFailures + Send + Sync + 'static,
    {
        self.namespace(namespace, FnValidator::new(f))
    }

    #[must_use]
    pub fn build(self) -> ValidatorSet {
        ValidatorSet { owner: self.owner, validators: self.validators }
    }
}

impl fmt::Debug for ValidatorSetBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorSetBuilder")
            .field("owner", &self.owner)
            .field("validators", &self.validators.len())
            .finish()
    }
}

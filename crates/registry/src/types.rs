//! Core identifiers and value types shared by the loader, gate, and dispatcher.

use indexmap::IndexMap;
use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Namespace used when the caller does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Separates the type name from the namespace inside a [`ValidatorKey`].
pub const KEY_SEPARATOR: char = '#';

/// An object that can be dispatched to a validator.
///
/// Usually derived with `#[derive(Validatable)]`. Implementations must return the
/// same name for every instance of a type; the name is part of every
/// [`ValidatorKey`] for that type.
pub trait Validatable: Any + Send + Sync {
    /// Stable name of the object's type (e.g. `"Person"`).
    fn type_name(&self) -> &'static str;

    /// Helper to allow downcasting from the trait object.
    fn as_any(&self) -> &dyn Any;
}

/// Identity of a validated type.
///
/// Equality and hashing use the [`TypeId`]; the name is carried along for keys,
/// logs, and error messages.
#[derive(Debug, Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
}

impl TypeKey {
    /// Builds a key for a concrete type with an explicit name.
    #[must_use]
    pub fn of<T: Any>(name: &'static str) -> Self {
        Self { id: TypeId::of::<T>(), name }
    }

    /// Builds the key for the runtime type behind `object`.
    #[must_use]
    pub fn of_object(object: &dyn Validatable) -> Self {
        Self { id: object.as_any().type_id(), name: object.type_name() }
    }

    #[must_use]
    pub const fn id(&self) -> TypeId {
        self.id
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// `"{type_name}#{namespace}"`, the lookup key inside a [`crate::ValidatorSet`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValidatorKey(String);

impl ValidatorKey {
    #[must_use]
    pub fn new(type_name: &str, namespace: &str) -> Self {
        let mut key = String::with_capacity(type_name.len() + namespace.len() + 1);
        key.push_str(type_name);
        key.push(KEY_SEPARATOR);
        key.push_str(namespace);
        Self(key)
    }

    /// The type-name half of the key.
    #[must_use]
    pub fn type_name(&self) -> &str {
        self.0.rsplit_once(KEY_SEPARATOR).map_or(self.0.as_str(), |(name, _)| name)
    }

    /// The namespace half of the key.
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.0.rsplit_once(KEY_SEPARATOR).map_or("", |(_, namespace)| namespace)
    }
}

impl AsRef<str> for ValidatorKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ValidatorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleFailure {
    /// Name of the rule that failed (e.g. `"notEmpty"`).
    pub rule: Cow<'static, str>,
    /// Raw message pattern; `{0}` is replaced with the field name.
    pub pattern: Cow<'static, str>,
}

impl RuleFailure {
    pub fn new(rule: impl Into<Cow<'static, str>>, pattern: impl Into<Cow<'static, str>>) -> Self {
        Self { rule: rule.into(), pattern: pattern.into() }
    }
}

/// Raw validator output: field name to failures, in evaluation order.
pub type FieldFailures = IndexMap<String, Vec<RuleFailure>>;

/// Rendered output: field name to `;`-joined messages, in evaluation order.
pub type ValidationReport = IndexMap<String, String>;

//! A lazily populated, thread-safe registry of object validators.
//!
//! Validators are grouped per type into a [`ValidatorSet`] and keyed by
//! namespace, so one type can be checked under several rule sets (`default`,
//! `strict`, `import`, ...). Sets are produced on demand by a [`Loader`] the
//! first time an object of that type is validated, then shared by every thread.
//! Failure messages are rendered from cached [`MessageTemplate`]s.
//!
//! # Core Features
//!
//! - **Load Once**: The loader runs at most once per type, however many threads race to validate it.
//! - **Per-Type Locking**: A slow load blocks only callers of the same type.
//! - **Negative Caching**: A type with no rules is reported on every call without reloading.
//! - **Template Cache**: Each message pattern is compiled once for the life of the dispatcher.
//! - **Ordered Reports**: Fields and messages come back in the order the validator produced them.
//!
//! # Architectural Overview
//!
//! 1.  **[`Dispatcher`]**: The thread-safe handle and entry point.
//! 2.  **[`LoadGate`]**: The per-type load state machine behind the dispatcher.
//! 3.  **[`ValidatorRegistry`]**: Published validator sets, first writer wins.
//! 4.  **[`TemplateCache`]**: Compiled message patterns.
//!
//! # Examples
//!
//! ```rust
//! use rulebook_registry::prelude::*;
//!
//! #[derive(Validatable)]
//! #[validatable(name = "Person")]
//! struct Person {
//!     age: i32,
//! }
//!
//! fn main() -> Result<(), RulebookError> {
//!     let loader = StaticLoader::new().register::<Person>(|set| {
//!         set.namespace_fn("adult", |object| {
//!             let mut failures = FieldFailures::new();
//!             if let Some(person) = object.as_any().downcast_ref::<Person>() {
//!                 if person.age < 18 {
//!                     failures
//!                         .entry("age".to_owned())
//!                         .or_default()
//!                         .push(RuleFailure::new("min", "{0} must be at least 18"));
//!                 }
//!             }
//!             failures
//!         })
//!     });
//!
//!     let dispatcher = Dispatcher::builder().loader(loader).build()?;
//!
//!     let report = dispatcher.validate_in(&Person { age: 12 }, "adult")?;
//!     assert_eq!(report.unwrap()["age"], "age must be at least 18");
//!
//!     let err = dispatcher.validate_in(&Person { age: 30 }, "senior").unwrap_err();
//!     assert!(matches!(err, RulebookError::NamespaceNotFound { .. }));
//!
//!     Ok(())
//! }
//! ```

// Lets `#[derive(Validatable)]` resolve `::rulebook_registry` in unit tests.
#[cfg(test)]
extern crate self as rulebook_registry;

mod config;
mod dispatcher;
mod error;
mod gate;
mod loader;
mod registry;
mod template;
mod types;
mod validator;

pub use self::config::{DEFAULT_MESSAGE_SEPARATOR, ENV_PREFIX, RulebookConfig, load_config};
pub use dispatcher::{Dispatcher, DispatcherBuilder, DispatcherInner, NoLoader, WithLoader};
pub use error::{RulebookError, RulebookErrorExt};
pub use gate::{LoadGate, LoadPhase};
pub use loader::{Loader, StaticLoader};
pub use registry::ValidatorRegistry;
pub use rulebook_derive::Validatable;
pub use template::{Applied, MessageTemplate, TemplateCache};
pub use types::{
    DEFAULT_NAMESPACE, FieldFailures, KEY_SEPARATOR, RuleFailure, TypeKey, Validatable,
    ValidationReport, ValidatorKey,
};
pub use validator::{FnValidator, Validator, ValidatorSet, ValidatorSetBuilder};

pub mod prelude {
    pub use crate::{
        DEFAULT_NAMESPACE, Dispatcher, FieldFailures, Loader, RuleFailure, RulebookConfig,
        RulebookError, StaticLoader, TypeKey, Validatable, ValidationReport, Validator,
        ValidatorSet,
    };
}

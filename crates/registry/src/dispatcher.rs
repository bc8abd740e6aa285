//! The public entry point: resolve, execute, render.

use crate::config::RulebookConfig;
use crate::error::RulebookError;
use crate::gate::{LoadGate, LoadPhase};
use crate::loader::Loader;
use crate::registry::ValidatorRegistry;
use crate::template::TemplateCache;
use crate::types::{FieldFailures, TypeKey, Validatable, ValidationReport, ValidatorKey};
use private::Sealed;
use std::fmt::{self, Display};
use std::ops::Deref;
use std::sync::Arc;
use tracing::{debug, error};

/// The internal shared state of a [`Dispatcher`].
#[derive(Debug)]
pub struct DispatcherInner {
    gate: LoadGate,
    templates: TemplateCache,
    config: RulebookConfig,
}

impl DispatcherInner {
    #[must_use]
    pub const fn config(&self) -> &RulebookConfig {
        &self.config
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<ValidatorRegistry> {
        self.gate.registry()
    }

    #[must_use]
    pub const fn templates(&self) -> &TemplateCache {
        &self.templates
    }

    /// Load state of `ty`; see [`LoadPhase`].
    #[must_use]
    pub fn phase(&self, ty: &TypeKey) -> LoadPhase {
        self.gate.phase(ty)
    }
}

/// Validates objects against lazily loaded, namespace-qualified validators.
///
/// The handle is reference-counted: clones share the registry, the load state,
/// and the template cache, so one dispatcher can serve every thread of a
/// process.
///
/// # Example
///
/// ```rust
/// use rulebook_registry::prelude::*;
///
/// #[derive(Validatable)]
/// struct Person {
///     name: String,
/// }
///
/// # fn main() -> Result<(), RulebookError> {
/// let loader = StaticLoader::new().register::<Person>(|set| {
///     set.namespace_fn(DEFAULT_NAMESPACE, |object| {
///         let mut failures = FieldFailures::new();
///         let person = object.as_any().downcast_ref::<Person>().expect("Person");
///         if person.name.is_empty() {
///             failures.insert("name".into(), vec![RuleFailure::new("notEmpty", "{0} must not be empty")]);
///         }
///         failures
///     })
/// });
///
/// let dispatcher = Dispatcher::builder().loader(loader).build()?;
///
/// let report = dispatcher.validate(&Person { name: String::new() })?.expect("failures");
/// assert_eq!(report["name"], "name must not be empty");
///
/// assert!(dispatcher.validate(&Person { name: "Ada".into() })?.is_none());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl Deref for Dispatcher {
    type Target = DispatcherInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Dispatcher {
    #[must_use = "The dispatcher is not usable until you call .loader(..).build()"]
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Validates `object` under the configured default namespace.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::validate_option`].
    pub fn validate(
        &self,
        object: &dyn Validatable,
    ) -> Result<Option<ValidationReport>, RulebookError> {
        self.validate_option(Some(object), &self.config.default_namespace)
    }

    /// Validates `object` under `namespace`.
    ///
    /// # Errors
    ///
    /// See [`Dispatcher::validate_option`].
    pub fn validate_in(
        &self,
        object: &dyn Validatable,
        namespace: &str,
    ) -> Result<Option<ValidationReport>, RulebookError> {
        self.validate_option(Some(object), namespace)
    }

    /// Validates an object that may be absent.
    ///
    /// Returns `Ok(None)` when every rule passes, and `Ok(Some(report))` mapping
    /// each failing field to its messages joined by the configured separator,
    /// in the validator's field and rule order.
    ///
    /// # Errors
    ///
    /// * [`RulebookError::NullInput`] if `object` is `None`.
    /// * [`RulebookError::ConfigurationNotFound`] if no validator set exists for the type.
    /// * [`RulebookError::NamespaceNotFound`] if the set has no validator for `namespace`.
    /// * [`RulebookError::InvalidTemplate`] if a failure carries a malformed pattern.
    pub fn validate_option(
        &self,
        object: Option<&dyn Validatable>,
        namespace: &str,
    ) -> Result<Option<ValidationReport>, RulebookError> {
        let Some(object) = object else {
            return Err(RulebookError::NullInput {
                message: "object to validate is missing".into(),
                context: Some(namespace.to_owned().into()),
            });
        };

        let ty = TypeKey::of_object(object);
        let set = self.gate.ensure_loaded(&ty)?;

        let key = ValidatorKey::new(ty.name(), namespace);
        let Some(validator) = set.get(&key) else {
            error!(namespace, type_name = ty.name(), "Can't find namespace for type");
            return Err(RulebookError::namespace_not_found(namespace, ty.name()));
        };

        let failures = validator.execute(object);
        if failures.is_empty() {
            return Ok(None);
        }

        debug!(
            %key,
            fields = failures.len(),
            rules = ?failures.values().flatten().map(|f| f.rule.as_ref()).collect::<Vec<&str>>(),
            "Validation produced failures"
        );
        self.render(failures).map(Some)
    }

    fn render(&self, failures: FieldFailures) -> Result<ValidationReport, RulebookError> {
        let separator = self.config.message_separator.as_str();
        let mut report = ValidationReport::with_capacity(failures.len());

        for (field, rules) in failures {
            let mut messages = String::new();
            let args: [&dyn Display; 1] = [&field];

            for (i, failure) in rules.iter().enumerate() {
                if i > 0 {
                    messages.push_str(separator);
                }
                self.templates.render_into(&mut messages, &failure.pattern, &args)?;
            }

            report.insert(field, messages);
        }

        Ok(report)
    }
}

#[derive(Debug, Default)]
pub struct NoLoader;

pub struct WithLoader(Arc<dyn Loader>);

impl fmt::Debug for WithLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WithLoader")
    }
}

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoLoader {}
impl Sealed for WithLoader {}

/// Builder for [`Dispatcher`]; a loader is required before `build`.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct DispatcherBuilder<S: Sealed = NoLoader> {
    state: S,
    config: RulebookConfig,
    registry: Option<Arc<ValidatorRegistry>>,
}

#[allow(private_bounds)]
impl<S: Sealed> DispatcherBuilder<S> {
    #[must_use = "Sets the dispatcher configuration"]
    pub fn config(mut self, config: RulebookConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares an existing registry instead of creating a private one.
    #[must_use = "Sets the registry the dispatcher publishes into"]
    pub fn registry(mut self, registry: Arc<ValidatorRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    fn transition<N: Sealed>(self, state: N) -> DispatcherBuilder<N> {
        DispatcherBuilder { state, config: self.config, registry: self.registry }
    }
}

impl DispatcherBuilder<NoLoader> {
    #[must_use = "Creates a new dispatcher builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the loader that produces validator sets"]
    pub fn loader(self, loader: impl Loader + 'static) -> DispatcherBuilder<WithLoader> {
        self.transition(WithLoader(Arc::new(loader)))
    }
}

impl DispatcherBuilder<WithLoader> {
    /// Finalizes the dispatcher.
    ///
    /// # Errors
    ///
    /// Returns [`RulebookError::Config`] if the configuration is invalid.
    pub fn build(self) -> Result<Dispatcher, RulebookError> {
        self.config.validate()?;

        let registry = self.registry.unwrap_or_default();
        debug!(
            default_namespace = %self.config.default_namespace,
            published = registry.len(),
            "Building validation dispatcher"
        );

        Ok(Dispatcher {
            inner: Arc::new(DispatcherInner {
                gate: LoadGate::new(self.state.0, registry),
                templates: TemplateCache::new(),
                config: self.config,
            }),
        })
    }
}

#![allow(dead_code, unreachable_pub)]

use rulebook_registry::prelude::*;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Validatable)]
#[validatable(name = "Person")]
pub struct Person {
    pub name: String,
    pub age: i32,
}

impl Person {
    #[must_use]
    pub fn new(name: &str, age: i32) -> Self {
        Self { name: name.to_owned(), age }
    }
}

/// A type nothing registers rules for.
#[derive(Debug, Validatable)]
pub struct Widget {
    pub id: u32,
}

/// Rules for [`Person`] under `default` and `strict`.
#[must_use]
pub fn person_rules() -> StaticLoader {
    StaticLoader::new().register::<Person>(|set| {
        set.namespace_fn(DEFAULT_NAMESPACE, |object| {
            let person = object.as_any().downcast_ref::<Person>().expect("Person");
            let mut failures = FieldFailures::new();
            if person.name.is_empty() {
                failures
                    .entry("name".to_owned())
                    .or_default()
                    .push(RuleFailure::new("notEmpty", "{0} must not be empty"));
            }
            if person.age < 0 {
                let rules = failures.entry("age".to_owned()).or_default();
                rules.push(RuleFailure::new("positive", "{0} must be positive"));
                rules.push(RuleFailure::new("range", "{0} must be between 0 and 150"));
            }
            failures
        })
        .namespace_fn("strict", |object| {
            let person = object.as_any().downcast_ref::<Person>().expect("Person");
            let mut failures = FieldFailures::new();
            if person.name.chars().count() < 3 {
                failures
                    .entry("name".to_owned())
                    .or_default()
                    .push(RuleFailure::new("minLength", "{0} is too short"));
            }
            if person.age < 18 {
                failures
                    .entry("age".to_owned())
                    .or_default()
                    .push(RuleFailure::new("adult", "{0} must be at least 18"));
            }
            failures
        })
    })
}

/// Wraps a loader and counts how often the gate calls it.
#[derive(Debug, Default)]
pub struct CountingLoader<L> {
    inner: L,
    calls: Arc<AtomicUsize>,
}

impl<L: Loader> CountingLoader<L> {
    #[must_use]
    pub fn new(inner: L) -> Self {
        Self { inner, calls: Arc::default() }
    }

    /// A handle that keeps reporting the count after the loader moves into a dispatcher.
    #[must_use]
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

impl<L: Loader> Loader for CountingLoader<L> {
    fn load(&self, ty: &TypeKey) -> Result<ValidatorSet, RulebookError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.load(ty)
    }
}

/// Builds a dispatcher over [`person_rules`].
/// # Panics
/// * If the default configuration is rejected.
#[must_use]
pub fn setup_dispatcher() -> Dispatcher {
    Dispatcher::builder().loader(person_rules()).build().expect("Dispatcher setup failed")
}

/// Like [`setup_dispatcher`], also returning the loader call counter.
#[must_use]
pub fn setup_counted() -> (Dispatcher, Arc<AtomicUsize>) {
    let loader = CountingLoader::new(person_rules());
    let calls = loader.counter();
    let dispatcher = Dispatcher::builder().loader(loader).build().expect("Dispatcher setup failed");
    (dispatcher, calls)
}

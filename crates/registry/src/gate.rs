//! # Load Gate
//!
//! Runs the [`Loader`] at most once per type and shares the outcome with every
//! caller, concurrent or later.
//!
//! ## State machine (per type)
//!
//! ```text
//! Unseen ──▶ Loading ──▶ Loaded
//!                   └──▶ LoadFailed
//! ```
//!
//! `Loading` only exists while one thread holds the type's load lock; other
//! callers of the same type wait on that lock and then read the result. Each
//! type owns its own lock, so a slow load never stalls callers of other types.
//! A failed load is terminal: later calls report the missing configuration
//! without consulting the loader again.

use crate::error::RulebookError;
use crate::loader::Loader;
use crate::registry::ValidatorRegistry;
use crate::types::TypeKey;
use crate::validator::ValidatorSet;
use fxhash::FxHashMap;
use parking_lot::{Mutex, RwLock};
use std::any::TypeId;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, error, trace};

/// Observable lifecycle of a type inside the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    /// No load has been attempted.
    Unseen,
    /// A load was attempted and a set is published.
    Loaded,
    /// A load was attempted and produced nothing.
    LoadFailed,
}

/// Per-type load marker. `attempted` flips to `true` exactly once, whatever the
/// outcome; `lock` serializes the loader call for this type only.
#[derive(Debug, Default)]
struct LoadSlot {
    attempted: AtomicBool,
    lock: Mutex<()>,
}

impl LoadSlot {
    fn is_attempted(&self) -> bool {
        self.attempted.load(Ordering::Acquire)
    }

    fn mark_attempted(&self) {
        self.attempted.store(true, Ordering::Release);
    }
}

/// Guarantees one loader call per type and publishes the result.
pub struct LoadGate {
    loader: Arc<dyn Loader>,
    registry: Arc<ValidatorRegistry>,
    slots: RwLock<FxHashMap<TypeId, Arc<LoadSlot>>>,
}

impl LoadGate {
    #[must_use]
    pub fn new(loader: Arc<dyn Loader>, registry: Arc<ValidatorRegistry>) -> Self {
        Self { loader, registry, slots: RwLock::new(FxHashMap::default()) }
    }

    /// Returns the validator set for `ty`, loading it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`RulebookError::ConfigurationNotFound`] if the loader produced no
    /// set for `ty`, now or on an earlier call.
    pub fn ensure_loaded(&self, ty: &TypeKey) -> Result<Arc<ValidatorSet>, RulebookError> {
        let slot = self.slot(ty);
        if slot.is_attempted() {
            return self.published(ty);
        }

        let _guard = slot.lock.lock();
        if slot.is_attempted() {
            trace!(type_name = ty.name(), "Reusing load finished by another caller");
            return self.published(ty);
        }

        if let Some(set) = self.registry.get(ty) {
            slot.mark_attempted();
            return Ok(set);
        }

        debug!(type_name = ty.name(), "Loading validator set");
        let outcome = match self.loader.load(ty) {
            Ok(set) if set.owner() != *ty => {
                error!(
                    type_name = ty.name(),
                    owner = set.owner().name(),
                    "Loader returned a validator set for another type"
                );
                Err(RulebookError::configuration_not_found(ty.name()))
            },
            Ok(set) => {
                let set = self.registry.publish(ty, set);
                debug!(type_name = ty.name(), validators = set.len(), "Validator set loaded");
                Ok(set)
            },
            Err(err) => {
                error!(type_name = ty.name(), error = %err, "Failed to load validator set");
                Err(RulebookError::configuration_not_found(ty.name()))
            },
        };
        slot.mark_attempted();

        outcome
    }

    /// Where `ty` currently sits in the load state machine.
    #[must_use]
    pub fn phase(&self, ty: &TypeKey) -> LoadPhase {
        let attempted = self.slots.read().get(&ty.id()).is_some_and(|slot| slot.is_attempted());
        match (attempted, self.registry.contains(ty)) {
            (false, _) => LoadPhase::Unseen,
            (true, true) => LoadPhase::Loaded,
            (true, false) => LoadPhase::LoadFailed,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &Arc<ValidatorRegistry> {
        &self.registry
    }

    fn slot(&self, ty: &TypeKey) -> Arc<LoadSlot> {
        if let Some(slot) = self.slots.read().get(&ty.id()) {
            return Arc::clone(slot);
        }

        let mut slots = self.slots.write();
        let slot = Arc::clone(slots.entry(ty.id()).or_default());
        drop(slots);
        slot
    }

    fn published(&self, ty: &TypeKey) -> Result<Arc<ValidatorSet>, RulebookError> {
        self.registry.get(ty).ok_or_else(|| {
            error!(type_name = ty.name(), "There is no validator set for type");
            RulebookError::configuration_not_found(ty.name())
        })
    }
}

impl fmt::Debug for LoadGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadGate")
            .field("registry", &self.registry)
            .field("slots", &self.slots.read().len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::StaticLoader;
    use crate::types::{DEFAULT_NAMESPACE, FieldFailures};
    use std::panic::{AssertUnwindSafe, catch_unwind};
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    struct Person;
    struct Widget;

    fn person() -> TypeKey {
        TypeKey::of::<Person>("Person")
    }

    fn widget() -> TypeKey {
        TypeKey::of::<Widget>("Widget")
    }

    #[derive(Debug, Default)]
    struct CountingLoader {
        calls: AtomicUsize,
    }

    impl Loader for CountingLoader {
        fn load(&self, ty: &TypeKey) -> Result<ValidatorSet, RulebookError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if ty.id() == TypeId::of::<Person>() {
                Ok(ValidatorSet::builder(*ty)
                    .namespace_fn(DEFAULT_NAMESPACE, |_| FieldFailures::new())
                    .build())
            } else {
                Err(RulebookError::configuration_not_found(ty.name()))
            }
        }
    }

    fn gate_with(loader: Arc<CountingLoader>) -> LoadGate {
        LoadGate::new(loader, Arc::new(ValidatorRegistry::new()))
    }

    #[test]
    fn loads_once_and_caches_success() {
        let loader = Arc::new(CountingLoader::default());
        let gate = gate_with(Arc::clone(&loader));

        assert_eq!(gate.phase(&person()), LoadPhase::Unseen);
        let first = gate.ensure_loaded(&person()).unwrap();
        let second = gate.ensure_loaded(&person()).unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.phase(&person()), LoadPhase::Loaded);
    }

    #[test]
    fn failure_is_terminal() {
        let loader = Arc::new(CountingLoader::default());
        let gate = gate_with(Arc::clone(&loader));

        for _ in 0..3 {
            let err = gate.ensure_loaded(&widget()).unwrap_err();
            assert!(matches!(
                err,
                RulebookError::ConfigurationNotFound { ref type_name, .. } if type_name == "Widget"
            ));
        }

        assert_eq!(loader.calls.load(Ordering::SeqCst), 1);
        assert_eq!(gate.phase(&widget()), LoadPhase::LoadFailed);
    }

    #[test]
    fn concurrent_first_callers_share_one_load() {
        let loader = Arc::new(CountingLoader::default());
        let gate = gate_with(Arc::clone(&loader));

        thread::scope(|scope| {
            for _ in 0..16 {
                scope.spawn(|| {
                    gate.ensure_loaded(&person()).unwrap();
                    gate.ensure_loaded(&widget()).unwrap_err();
                });
            }
        });

        assert_eq!(loader.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn prepublished_set_skips_loader() {
        let loader = Arc::new(CountingLoader::default());
        let registry = Arc::new(ValidatorRegistry::new());
        registry.publish(&widget(), ValidatorSet::builder(widget()).build());
        let gate = LoadGate::new(Arc::clone(&loader) as Arc<dyn Loader>, registry);

        gate.ensure_loaded(&widget()).unwrap();

        assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
        assert_eq!(gate.phase(&widget()), LoadPhase::Loaded);
    }

    #[test]
    fn panicking_loader_leaves_type_unseen() {
        struct Exploding;
        impl Loader for Exploding {
            fn load(&self, _: &TypeKey) -> Result<ValidatorSet, RulebookError> {
                panic!("rule source unreadable");
            }
        }

        let gate = LoadGate::new(Arc::new(Exploding), Arc::new(ValidatorRegistry::new()));
        let result = catch_unwind(AssertUnwindSafe(|| gate.ensure_loaded(&person())));

        assert!(result.is_err());
        assert_eq!(gate.phase(&person()), LoadPhase::Unseen);
    }

    #[test]
    fn set_for_another_type_is_rejected() {
        struct Mismatched;
        impl Loader for Mismatched {
            fn load(&self, _: &TypeKey) -> Result<ValidatorSet, RulebookError> {
                Ok(ValidatorSet::builder(person())
                    .namespace_fn(DEFAULT_NAMESPACE, |_| FieldFailures::new())
                    .build())
            }
        }

        let registry = Arc::new(ValidatorRegistry::new());
        let gate = LoadGate::new(Arc::new(Mismatched), Arc::clone(&registry));

        let err = gate.ensure_loaded(&widget()).unwrap_err();

        assert!(matches!(
            err,
            RulebookError::ConfigurationNotFound { ref type_name, .. } if type_name == "Widget"
        ));
        assert_eq!(gate.phase(&widget()), LoadPhase::LoadFailed);
        assert!(registry.is_empty());
    }

    #[test]
    fn static_loader_unknown_type_fails() {
        let gate = LoadGate::new(Arc::new(StaticLoader::new()), Arc::new(ValidatorRegistry::new()));
        assert!(gate.ensure_loaded(&widget()).is_err());
        assert_eq!(gate.phase(&widget()), LoadPhase::LoadFailed);
    }
}

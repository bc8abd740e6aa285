//! Storage for published validator sets.
//!
//! Pure storage: the registry never loads anything. Sets are keyed by
//! [`TypeKey`] and published at most once per type.

use crate::types::TypeKey;
use crate::validator::ValidatorSet;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::TypeId;
use std::sync::Arc;
use tracing::{trace, warn};

/// Per-type validator sets, append-only for the life of the registry.
#[derive(Debug, Default)]
pub struct ValidatorRegistry {
    sets: RwLock<FxHashMap<TypeId, Arc<ValidatorSet>>>,
}

impl ValidatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, ty: &TypeKey) -> Option<Arc<ValidatorSet>> {
        self.sets.read().get(&ty.id()).cloned()
    }

    /// Inserts `set` for `ty` unless one is already present.
    ///
    /// Returns whichever set is registered afterwards; the first writer wins and
    /// later sets are dropped.
    pub fn publish(&self, ty: &TypeKey, set: ValidatorSet) -> Arc<ValidatorSet> {
        if let Some(existing) = self.get(ty) {
            warn!(type_name = ty.name(), "Validator set already published; keeping the first one");
            return existing;
        }

        let mut sets = self.sets.write();
        let mut inserted = false;
        let winner = sets
            .entry(ty.id())
            .or_insert_with(|| {
                inserted = true;
                Arc::new(set)
            })
            .clone();
        drop(sets);

        if inserted {
            trace!(type_name = ty.name(), validators = winner.len(), "Published validator set");
        } else {
            warn!(type_name = ty.name(), "Validator set already published; keeping the first one");
        }
        winner
    }

    #[must_use]
    pub fn contains(&self, ty: &TypeKey) -> bool {
        self.sets.read().contains_key(&ty.id())
    }

    /// Number of types with a published set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sets.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sets.read().is_empty()
    }
}

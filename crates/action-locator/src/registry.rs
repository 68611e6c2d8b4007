//! Locator registry: the single source of truth for target -> selector

use crate::{
    errors::LocatorError,
    healer::{FirstMatchStrategy, HealingStrategy},
    store::{LocatorMap, RegistryStore},
};
use action_primitives::PageCapability;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};
use webheal_core_types::{Selector, Target};

struct RegistryInner {
    entries: DashMap<Target, Selector>,
    write_locks: DashMap<Target, Arc<Mutex<()>>>,
    strategy: Arc<dyn HealingStrategy>,
}

/// Name -> selector mapping with self-heal
///
/// The registry is an explicit handle, never process-wide state. Cloning it
/// shares the same mapping, so callers choose per-session or shared scope by
/// deciding whether to clone or construct a new one.
///
/// Reads are lock-free. Every mutation of a target (`set`, `heal`, `remove`)
/// holds that target's write lock, so two heals of the same target from
/// parallel streams run one after the other.
#[derive(Clone)]
pub struct LocatorRegistry {
    inner: Arc<RegistryInner>,
}

impl Default for LocatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LocatorRegistry {
    pub fn new() -> Self {
        Self::with_strategy(Arc::new(FirstMatchStrategy::new()))
    }

    pub fn with_strategy(strategy: Arc<dyn HealingStrategy>) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                entries: DashMap::new(),
                write_locks: DashMap::new(),
                strategy,
            }),
        }
    }

    /// Build a registry pre-populated from a store
    pub fn load_from(store: &dyn RegistryStore) -> Result<Self, LocatorError> {
        Self::load_from_with_strategy(store, Arc::new(FirstMatchStrategy::new()))
    }

    /// Like [`LocatorRegistry::load_from`], healing with `strategy`
    pub fn load_from_with_strategy(
        store: &dyn RegistryStore,
        strategy: Arc<dyn HealingStrategy>,
    ) -> Result<Self, LocatorError> {
        let registry = Self::with_strategy(strategy);
        let loaded = store.load()?;
        debug!(entries = loaded.len(), "loaded locator registry");
        for (target, selector) in loaded {
            registry.inner.entries.insert(target, selector);
        }
        Ok(registry)
    }

    /// Write the current mapping to a store
    pub fn flush_to(&self, store: &dyn RegistryStore) -> Result<(), LocatorError> {
        let snapshot = self.snapshot();
        store.save(&snapshot)?;
        debug!(entries = snapshot.len(), "flushed locator registry");
        Ok(())
    }

    /// Current selector for the target; `None` means unresolved
    pub fn get(&self, target: &Target) -> Option<Selector> {
        self.inner
            .entries
            .get(target)
            .map(|entry| entry.value().clone())
    }

    /// Establish `selector` as the current selector for `target`
    pub async fn set(&self, target: &Target, selector: Selector) {
        let lock = self.write_lock(target);
        let _guard = lock.lock().await;
        self.store_locked(target, selector);
    }

    /// Explicitly drop a target; the registry never does this on its own
    pub async fn remove(&self, target: &Target) -> Option<Selector> {
        let lock = self.write_lock(target);
        let _guard = lock.lock().await;
        let removed = self.inner.entries.remove(target).map(|(_, selector)| selector);

        // Prune the lock unless another writer is waiting on it (map + ours = 2)
        self.inner
            .write_locks
            .remove_if(target, |_, held| Arc::strong_count(held) <= 2);
        removed
    }

    /// Probe `candidates` in order and persist the first one that resolves
    ///
    /// Individual probe failures are absorbed by the strategy. When nothing
    /// resolves the entry for `target` is left exactly as it was.
    pub async fn heal(
        &self,
        target: &Target,
        candidates: &[Selector],
        probe: &dyn PageCapability,
    ) -> Option<Selector> {
        let lock = self.write_lock(target);
        let _guard = lock.lock().await;

        let attempt = self
            .inner
            .strategy
            .probe_candidates(probe, candidates)
            .await;
        debug!(
            target = %target,
            strategy = self.inner.strategy.name(),
            tried = attempt.tried.len(),
            "healing pass finished"
        );

        let healed = attempt.healed?;
        info!(target = %target, selector = %healed, "healed locator");
        self.store_locked(target, healed.clone());
        Some(healed)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries.is_empty()
    }

    /// Sorted point-in-time copy of the mapping
    pub fn snapshot(&self) -> LocatorMap {
        self.inner
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    fn write_lock(&self, target: &Target) -> Arc<Mutex<()>> {
        self.inner
            .write_locks
            .entry(target.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    fn store_locked(&self, target: &Target, selector: Selector) {
        self.inner.entries.insert(target.clone(), selector);
    }
}

//! Bounded cache of read-only snapshots
//!
//! Hosts keep per-user data (known-word probabilities, learning sets) here between
//! requests. Scoring never sees the cache itself, only the `Arc` snapshot handed out.

use crate::config::RuntimeConfig;
use crate::probabilities::KnownProbabilities;
use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

pub struct SnapshotCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, Arc<V>>>,
}

impl<K: Hash + Eq + Clone, V> SnapshotCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(
                NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN),
            )),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<K, Arc<V>>> {
        // A panic while holding the lock cannot leave a half-written snapshot behind
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.lock().get(key).cloned()
    }

    /// Return the cached snapshot or build, store and return a new one.
    /// The loader runs outside the lock.
    pub fn get_or_load<E>(
        &self,
        key: &K,
        load: impl FnOnce() -> Result<V, E>,
    ) -> Result<Arc<V>, E> {
        if let Some(hit) = self.get(key) {
            return Ok(hit);
        }
        let fresh = Arc::new(load()?);
        self.lock().put(key.clone(), fresh.clone());
        Ok(fresh)
    }

    pub fn insert(&self, key: K, value: V) -> Arc<V> {
        let snapshot = Arc::new(value);
        self.lock().put(key, snapshot.clone());
        snapshot
    }

    /// Drop a snapshot after the underlying data changed (e.g. a new bookmark)
    pub fn invalidate(&self, key: &K) -> bool {
        self.lock().pop(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

/// Per-user known-word probabilities, keyed however the host identifies users
pub type ProbabilityCache<K> = SnapshotCache<K, KnownProbabilities>;

/// Probability cache sized by `WORDSCOPE_PROBABILITY_CACHE_MAX`
pub fn probability_cache<K: Hash + Eq + Clone>(runtime: &RuntimeConfig) -> ProbabilityCache<K> {
    SnapshotCache::new(runtime.probability_cache_max)
}

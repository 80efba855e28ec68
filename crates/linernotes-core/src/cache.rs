//! Run-scoped memoization.
//!
//! Resolvers receive their cache by injection so that the in-memory map
//! can later be swapped for a persistent store without touching resolver
//! logic. Nothing here is persisted across runs.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;

/// A key/value memo with get-or-compute semantics.
pub trait Cache<K, V: Clone> {
    /// Returns a copy of the cached value, if any.
    fn get(&self, key: &K) -> Option<V>;

    /// Stores `value` under `key`, replacing any previous entry.
    fn insert(&mut self, key: K, value: V);

    /// Number of cached entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the cached value for `key`, computing and storing it first
    /// when absent. `compute` runs at most once per key; a failed
    /// computation stores nothing.
    #[allow(async_fn_in_trait)]
    async fn get_or_try_insert_with<F, Fut, E>(&mut self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }
}

/// `HashMap`-backed cache living for the duration of one run.
#[derive(Debug, Clone)]
pub struct MemoryCache<K, V> {
    entries: HashMap<K, V>,
}

impl<K, V> MemoryCache<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<K, V> Default for MemoryCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Cache<K, V> for MemoryCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).cloned()
    }

    fn insert(&mut self, key: K, value: V) {
        self.entries.insert(key, value);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

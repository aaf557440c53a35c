// SPDX-License-Identifier: MIT OR Apache-2.0
//! One-to-many lookup table.

use indexmap::{IndexMap, IndexSet};
use std::hash::Hash;

/// Maps a key to an insertion-ordered set of values.
///
/// Keys whose set becomes empty are dropped, so `has_key` reflects live
/// entries only.
#[derive(Debug, Clone)]
pub struct MultiMap<K, V> {
    entries: IndexMap<K, IndexSet<V>>,
}

impl<K: Hash + Eq, V: Hash + Eq> MultiMap<K, V> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Associate `value` with `key`
    pub fn add(&mut self, key: K, value: V) {
        self.entries.entry(key).or_default().insert(value);
    }

    /// Remove one association; returns whether it existed
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let Some(values) = self.entries.get_mut(key) else {
            return false;
        };
        let removed = values.shift_remove(value);
        if values.is_empty() {
            self.entries.shift_remove(key);
        }
        removed
    }

    /// Values associated with `key`
    pub fn get(&self, key: &K) -> Option<&IndexSet<V>> {
        self.entries.get(key)
    }

    /// Whether any value is associated with `key`
    pub fn has_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of distinct keys
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<K: Hash + Eq, V: Hash + Eq> Default for MultiMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

//! Insertion-ordered counting
//!
//! Rankings break ties by first-encounter order, so counts are kept in a
//! vector with a side index instead of a hash map alone.

use std::collections::HashMap;
use std::hash::Hash;

/// Counter that remembers the order keys were first seen
#[derive(Debug, Clone)]
pub struct OrderedCounter<K> {
    entries: Vec<(K, usize)>,
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash + Clone> OrderedCounter<K> {
    /// Empty counter
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Increment `key`, returning its position in encounter order
    pub fn increment(&mut self, key: K) -> usize {
        match self.index.get(&key) {
            Some(&pos) => {
                self.entries[pos].1 += 1;
                pos
            }
            None => {
                let pos = self.entries.len();
                self.index.insert(key.clone(), pos);
                self.entries.push((key, 1));
                pos
            }
        }
    }

    /// Count for `key`, zero when unseen
    pub fn get(&self, key: &K) -> usize {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1)
            .unwrap_or(0)
    }

    /// Encounter position of `key`
    pub fn position(&self, key: &K) -> Option<usize> {
        self.index.get(key).copied()
    }

    /// Entries in encounter order
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.entries.iter().map(|(key, count)| (key, *count))
    }

    /// Up to `n` entries by count descending; ties keep encounter order
    pub fn most_common(&self, n: usize) -> Vec<(&K, usize)> {
        let mut ranked: Vec<(&K, usize)> = self.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was counted
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for OrderedCounter<K> {
    fn default() -> Self {
        Self::new()
    }
}

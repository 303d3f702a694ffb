//! LRU Tracker Module
//!
//! Implements Least Recently Used tracking for cache eviction.

use std::collections::{BTreeMap, HashMap};

// == LRU Tracker ==
/// Tracks access order for LRU eviction strategy.
///
/// Every touch stamps the key with a fresh tick. `order` maps ticks back to
/// keys, so its first entry is always the least recently used key.
#[derive(Debug, Default)]
pub struct LruTracker {
    /// Latest tick per key
    ticks: HashMap<String, u64>,
    /// Keys ordered by their latest tick
    order: BTreeMap<u64, String>,
    /// Next tick to hand out
    clock: u64,
}

impl LruTracker {
    // == Constructor ==
    /// Creates a new empty LRU tracker.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used.
    pub fn touch(&mut self, key: &str) {
        let tick = self.clock;
        self.clock += 1;

        if let Some(previous) = self.ticks.insert(key.to_string(), tick) {
            self.order.remove(&previous);
        }
        self.order.insert(tick, key.to_string());
    }

    // == Remove ==
    /// Removes a key from the tracker.
    pub fn remove(&mut self, key: &str) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the least recently used key.
    ///
    /// Returns None if tracker is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

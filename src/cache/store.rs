//! Cache Store Module
//!
//! Cache engine combining HashMap storage with LRU tracking and TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker, DEFAULT_MAX_VALUE_SIZE, MAX_KEY_LENGTH};
use crate::error::{CacheError, CacheResult};

// == Cache Store ==
/// Bounded key/value storage with per-entry expiry and LRU eviction.
///
/// Entries are never updated in place by readers: a key either holds the
/// exact payload written last, or nothing.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_entries: usize,
    /// Largest payload accepted, in bytes
    max_value_size: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries,
            max_value_size: DEFAULT_MAX_VALUE_SIZE,
        }
    }

    /// Overrides the largest payload accepted, in bytes.
    pub fn with_max_value_size(mut self, max_value_size: usize) -> Self {
        self.max_value_size = max_value_size;
        self
    }

    // == Set ==
    /// Stores a payload under `key` for `ttl`.
    ///
    /// An existing entry is replaced and its TTL restarted. When the store is
    /// at capacity the least recently used entry is evicted first.
    pub fn set(&mut self, key: String, value: String, ttl: Duration) -> CacheResult<()> {
        if key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::KeyTooLong(MAX_KEY_LENGTH));
        }
        if value.len() > self.max_value_size {
            return Err(CacheError::ValueTooLarge(self.max_value_size));
        }

        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted_key) => {
                    self.entries.remove(&evicted_key);
                    self.stats.record_eviction();
                }
                None => return Err(CacheError::Full),
            }
        }

        self.entries.insert(key.clone(), CacheEntry::new(value, ttl));
        self.lru.touch(&key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Returns the payload stored under `key` if present and not expired.
    ///
    /// A stale entry is removed on the spot and counted as a miss.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => entry.is_expired(),
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.record_expirations(1);
            self.stats.set_total_entries(self.entries.len());
            self.stats.record_miss();
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_expirations(expired_keys.len());
        self.stats.set_total_entries(self.entries.len());
        expired_keys.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

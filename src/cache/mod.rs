//! Cache Module
//!
//! Response cache sitting in front of the catalog store and search index.
//! The resolver only sees the `ResponseCache` trait; `MemoryCache` backs it
//! with an in-process TTL/LRU engine.

mod entry;
mod lru;
mod memory;
mod stats;
mod store;


use std::time::Duration;

use async_trait::async_trait;

use crate::error::CacheResult;

// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use memory::MemoryCache;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 1024;

/// Default maximum value size in bytes, sized for a full page of products
pub const DEFAULT_MAX_VALUE_SIZE: usize = 16 * 1024 * 1024; // 16 MB

// == Response Cache ==
/// Key/value cache with get, set-with-expiry and passive expiry.
///
/// No transactional guarantees: callers treat every error as a miss or a
/// skipped write.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    /// Returns the payload under `key`, or None when absent or expired.
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()>;
}

//! Cache Entry Module
//!
//! Defines the structure for individual cached envelopes with expiry.

use std::time::{Duration, Instant};

/// Longest lifetime an entry can be given; larger TTLs are clamped.
pub const MAX_ENTRY_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

// == Cache Entry ==
/// A serialized envelope together with its expiry deadline.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored payload
    pub value: String,
    /// Monotonic deadline after which the entry is stale
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that lives for `ttl`, at most `MAX_ENTRY_TTL`.
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl.min(MAX_ENTRY_TTL),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its deadline, so a
    /// zero TTL produces an entry that is never served.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

//! In-process response cache
//!
//! Shares one `CacheStore` behind an async RwLock between all request
//! handlers and the background sweeper.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore, ResponseCache};
use crate::error::CacheResult;

// == Memory Cache ==
/// Cloneable handle to a shared in-process cache store.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    /// Creates a cache holding at most `max_entries` envelopes.
    pub fn new(max_entries: usize) -> Self {
        Self::from_store(CacheStore::new(max_entries))
    }

    /// Creates a cache with explicit entry and payload size limits.
    pub fn with_limits(max_entries: usize, max_value_size: usize) -> Self {
        Self::from_store(CacheStore::new(max_entries).with_max_value_size(max_value_size))
    }

    fn from_store(store: CacheStore) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Shared store handle, used by the cleanup task.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    /// Current cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        // Write lock: reads update LRU order and stats
        let mut store = self.store.write().await;
        let value = store.get(key);
        debug!(
            "Cache {} for {}",
            if value.is_some() { "hit" } else { "miss" },
            key
        );
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> CacheResult<()> {
        let mut store = self.store.write().await;
        store.set(key.to_string(), value, ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MAX_KEY_LENGTH;
    use crate::error::CacheError;

    #[tokio::test]
    async fn test_memory_cache_roundtrip() {
        let cache = MemoryCache::new(10);

        cache
            .set("products:k", "{\"total\":0}".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        let value = cache.get("products:k").await.unwrap();
        assert_eq!(value.as_deref(), Some("{\"total\":0}"));
        assert_eq!(cache.stats().await.hits, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_miss() {
        let cache = MemoryCache::new(10);

        assert!(cache.get("missing").await.unwrap().is_none());
        assert_eq!(cache.stats().await.misses, 1);
    }

    #[tokio::test]
    async fn test_memory_cache_rejects_oversized_key() {
        let cache = MemoryCache::new(10);
        let key = "k".repeat(MAX_KEY_LENGTH + 1);

        let result = cache.set(&key, "v".to_string(), Duration::from_secs(1)).await;
        assert!(matches!(result, Err(CacheError::KeyTooLong(_))));
    }

    #[tokio::test]
    async fn test_unbounded_ttl_does_not_panic() {
        let cache = MemoryCache::new(10);

        cache
            .set("products:k", "{}".to_string(), Duration::from_secs(u64::MAX))
            .await
            .unwrap();

        assert_eq!(cache.get("products:k").await.unwrap().as_deref(), Some("{}"));
    }

    #[tokio::test]
    async fn test_clones_share_storage() {
        let cache = MemoryCache::new(10);
        let other = cache.clone();

        cache
            .set("shared", "v".to_string(), Duration::from_secs(60))
            .await
            .unwrap();

        assert!(other.get("shared").await.unwrap().is_some());
    }
}

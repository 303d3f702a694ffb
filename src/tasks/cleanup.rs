//! Cache Sweep Task
//!
//! Expired envelopes are already dropped lazily on read; this task reclaims
//! entries for requests that are never repeated.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a task that sweeps expired entries every `cleanup_interval_secs`.
///
/// The returned handle is aborted during graceful shutdown.
pub fn spawn_cleanup_task(
    cache: Arc<RwLock<CacheStore>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache sweep task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut store = cache.write().await;
                store.cleanup_expired()
            };

            if removed > 0 {
                info!("Cache sweep: removed {} expired entries", removed);
            } else {
                debug!("Cache sweep: no expired entries found");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    #[tokio::test]
    async fn test_sweep_removes_expired_entries() {
        let cache = MemoryCache::new(100);
        {
            let store = cache.store();
            let mut store = store.write().await;
            store
                .set(
                    "products:expire_soon".to_string(),
                    "{}".to_string(),
                    Duration::from_millis(200),
                )
                .unwrap();
        }

        let handle = spawn_cleanup_task(cache.store(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        // Swept without any read touching the key
        let stats = cache.stats().await;
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.expirations, 1);

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_preserves_live_entries() {
        let cache = MemoryCache::new(100);
        {
            let store = cache.store();
            let mut store = store.write().await;
            store
                .set(
                    "products:long_lived".to_string(),
                    "{}".to_string(),
                    Duration::from_secs(3600),
                )
                .unwrap();
        }

        let handle = spawn_cleanup_task(cache.store(), 1);
        tokio::time::sleep(Duration::from_millis(1500)).await;

        let store = cache.store();
        let mut store = store.write().await;
        assert_eq!(store.get("products:long_lived").as_deref(), Some("{}"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_sweep_task_can_be_aborted() {
        let cache = Arc::new(RwLock::new(CacheStore::new(100)));

        let handle = spawn_cleanup_task(cache, 1);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}

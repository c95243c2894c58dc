//! Expired-Entry Sweep Task
//!
//! Reads already treat expired entries as absent, so the sweep only
//! reclaims memory held by entries nobody asked for again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::cache::InMemoryCacheStore;

/// Spawns the periodic expiry sweep over `store`.
///
/// The interval is clamped to at least one second. Abort the returned
/// handle on shutdown.
pub fn spawn_cleanup_task(store: Arc<InMemoryCacheStore>, interval_secs: u64) -> JoinHandle<()> {
    let period = Duration::from_secs(interval_secs.max(1));

    tokio::spawn(async move {
        info!(interval_secs = period.as_secs(), "cache expiry sweep started");

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match store.purge_expired().await {
                0 => debug!("cache sweep found nothing to purge"),
                removed => info!(removed, "cache sweep purged expired entries"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheBackend;

    async fn store_with_entry(ttl: Option<u64>) -> Arc<InMemoryCacheStore> {
        let store = Arc::new(InMemoryCacheStore::new(["textEntries"], ttl));
        store
            .put("textEntries", "entry-1", r#"{"id":1}"#.to_string())
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_sweep_purges_expired_entries() {
        let store = store_with_entry(Some(0)).await;

        let handle = spawn_cleanup_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1300)).await;
        handle.abort();

        assert_eq!(store.purge_expired().await, 0);
        assert_eq!(store.region_size("textEntries").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_sweep_keeps_entries_without_deadline() {
        let store = store_with_entry(None).await;

        let handle = spawn_cleanup_task(store.clone(), 1);
        tokio::time::sleep(Duration::from_millis(1300)).await;
        handle.abort();

        assert_eq!(store.region_size("textEntries").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_aborted_sweep_finishes() {
        let handle = spawn_cleanup_task(store_with_entry(None).await, 60);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.is_finished());
    }
}

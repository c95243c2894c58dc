//! Startup warm-up task.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use crate::service::CacheAdminService;

/// Warms the cache once in the background. Failures are logged by the
/// warm-up itself and never stop the server.
pub fn spawn_warm_up_task(admin: Arc<CacheAdminService>) -> JoinHandle<()> {
    tokio::spawn(async move {
        if admin.warm_up().await {
            info!("Startup cache warm-up finished");
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheBackend, InMemoryCacheStore, StrategyFlag};
    use crate::repository::InMemoryEntryRepository;
    use crate::service::TextEntryService;

    #[tokio::test]
    async fn test_warm_up_task_populates_region() {
        let store = Arc::new(InMemoryCacheStore::new(["textEntries"], None));
        let entries = Arc::new(TextEntryService::new(
            Arc::new(InMemoryEntryRepository::new()),
            store.clone(),
            "textEntries",
            StrategyFlag::new(true),
        ));
        let admin = Arc::new(CacheAdminService::new(entries, store.clone()));

        spawn_warm_up_task(admin).await.unwrap();

        // Declarative strategy skips the empty page, so only the count is cached.
        assert_eq!(store.region_size("textEntries").await.unwrap(), 1);
        assert!(store
            .get("textEntries", "auto-total-count")
            .await
            .unwrap()
            .is_some());
    }
}

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use entry_cache::cache::{CacheBackend, InMemoryCacheStore, StrategyFlag};
use entry_cache::error::{CacheError, Result};
use entry_cache::models::{NewTextEntry, Page, PageRequest, TextEntry};
use entry_cache::repository::{EntryFilter, InMemoryEntryRepository, TextEntryRepository};
use entry_cache::service::{CacheAdminService, TextEntryService};

pub const REGION: &str = "textEntries";

// == Counting Repository ==
/// Repository wrapper counting every call, used as the loader-call fixture.
#[derive(Debug, Default)]
pub struct CountingRepository {
    inner: InMemoryEntryRepository,
    pub find_by_id_calls: AtomicUsize,
    pub find_all_calls: AtomicUsize,
    pub count_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
}

impl CountingRepository {
    pub fn new() -> Self {
        Self {
            inner: InMemoryEntryRepository::new(),
            ..Self::default()
        }
    }

    pub async fn seed(&self, id: i64, owner: &str, message: &str) -> TextEntry {
        self.inner
            .insert_with_id(
                id,
                NewTextEntry {
                    message: message.to_string(),
                    owner: owner.to_string(),
                    user_id: Some(id * 100),
                },
                Utc::now() - Duration::minutes(60 - id),
            )
            .await
    }

    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    pub fn find_all_calls(&self) -> usize {
        self.find_all_calls.load(Ordering::SeqCst)
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl TextEntryRepository for CountingRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<TextEntry>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_by_id(id).await
    }

    async fn find_all(&self, filter: &EntryFilter, page: PageRequest) -> Result<Page<TextEntry>> {
        self.find_all_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.find_all(filter, page).await
    }

    async fn count(&self, filter: &EntryFilter) -> Result<u64> {
        self.count_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.count(filter).await
    }

    async fn insert(&self, entry: NewTextEntry) -> Result<TextEntry> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(entry).await
    }

    async fn update(&self, entry: TextEntry) -> Result<TextEntry> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.update(entry).await
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.delete_by_id(id).await
    }
}

// == Failing Store ==
/// Cache store that is always unreachable.
#[derive(Debug, Default)]
pub struct FailingCacheStore;

fn down<T>() -> std::result::Result<T, CacheError> {
    Err(CacheError::Unavailable("connection refused".to_string()))
}

#[async_trait]
impl CacheBackend for FailingCacheStore {
    async fn get(&self, _region: &str, _key: &str) -> std::result::Result<Option<String>, CacheError> {
        down()
    }

    async fn put(&self, _region: &str, _key: &str, _value: String) -> std::result::Result<(), CacheError> {
        down()
    }

    async fn evict(&self, _region: &str, _key: &str) -> std::result::Result<bool, CacheError> {
        down()
    }

    async fn evict_all(&self, _region: &str) -> std::result::Result<usize, CacheError> {
        down()
    }

    async fn list_regions(&self) -> std::result::Result<Vec<String>, CacheError> {
        down()
    }

    async fn region_size(&self, _region: &str) -> std::result::Result<usize, CacheError> {
        down()
    }
}

// == Fixture ==
pub struct Fixture {
    pub repo: Arc<CountingRepository>,
    pub store: Arc<dyn CacheBackend>,
    pub service: Arc<TextEntryService>,
    pub admin: CacheAdminService,
}

impl Fixture {
    /// Seeds entries 1..=10; odd ids belong to alice, even ids to bob.
    pub async fn seeded(store: Arc<dyn CacheBackend>, use_auto: bool) -> Self {
        let repo = Arc::new(CountingRepository::new());
        for id in 1..=10 {
            let owner = if id % 2 == 1 { "alice" } else { "bob" };
            repo.seed(id, owner, &format!("note {} about admissions", id))
                .await;
        }
        let service = Arc::new(TextEntryService::new(
            repo.clone(),
            store.clone(),
            REGION,
            StrategyFlag::new(use_auto),
        ));
        let admin = CacheAdminService::new(service.clone(), store.clone());
        Self {
            repo,
            store,
            service,
            admin,
        }
    }

    pub async fn in_memory(use_auto: bool) -> Self {
        Self::seeded(Arc::new(InMemoryCacheStore::new([REGION], None)), use_auto).await
    }

    pub async fn region_size(&self) -> usize {
        self.store.region_size(REGION).await.unwrap()
    }
}

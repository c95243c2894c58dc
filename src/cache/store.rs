//! Cache Store Module
//!
//! The store contract the cache layer talks to, plus an in-memory
//! region store used by the service binary and the tests.

use std::collections::HashMap;
use std::future::Future;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::entry::{current_timestamp_ms, CacheEntry};
use crate::error::CacheError;

// == Backend Trait ==
/// Key-value store partitioned into named regions.
///
/// Values are JSON strings so any serializable DTO can be stored. Atomicity
/// of individual operations is the store's responsibility.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, region: &str, key: &str) -> Result<Option<String>, CacheError>;

    async fn put(&self, region: &str, key: &str, value: String) -> Result<(), CacheError>;

    /// Returns whether a key was removed.
    async fn evict(&self, region: &str, key: &str) -> Result<bool, CacheError>;

    /// Removes every key of a region, returning how many were dropped.
    async fn evict_all(&self, region: &str) -> Result<usize, CacheError>;

    async fn list_regions(&self) -> Result<Vec<String>, CacheError>;

    /// Estimated number of live keys in a region.
    async fn region_size(&self, region: &str) -> Result<usize, CacheError>;
}

// == Typed Helpers ==
/// Typed JSON access on top of any [`CacheBackend`].
pub trait CacheBackendExt: CacheBackend {
    fn get_json<'a, T>(
        &'a self,
        region: &'a str,
        key: &'a str,
    ) -> impl Future<Output = Result<Option<T>, CacheError>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        async move {
            match self.get(region, key).await? {
                Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
                None => Ok(None),
            }
        }
    }

    fn put_json<'a, T>(
        &'a self,
        region: &'a str,
        key: &'a str,
        value: &'a T,
    ) -> impl Future<Output = Result<(), CacheError>> + Send + 'a
    where
        T: Serialize + Sync + 'a,
    {
        async move {
            let raw = serde_json::to_string(value)?;
            self.put(region, key, raw).await
        }
    }
}

impl<B: CacheBackend + ?Sized> CacheBackendExt for B {}

// == In-Memory Store ==
/// Region store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryCacheStore {
    regions: RwLock<HashMap<String, HashMap<String, CacheEntry>>>,
    /// Store-default TTL in seconds, None = entries never expire
    default_ttl: Option<u64>,
}

impl InMemoryCacheStore {
    // == Constructor ==
    /// Creates a store with the given regions pre-declared.
    pub fn new<I, S>(regions: I, default_ttl: Option<u64>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let regions = regions
            .into_iter()
            .map(|name| (name.into(), HashMap::new()))
            .collect();
        Self {
            regions: RwLock::new(regions),
            default_ttl,
        }
    }

    // == Purge Expired ==
    /// Removes all expired entries from every region.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let now = current_timestamp_ms();
        let mut regions = self.regions.write().await;
        let mut removed = 0;
        for entries in regions.values_mut() {
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired_at(now));
            removed += before - entries.len();
        }
        removed
    }
}

#[async_trait]
impl CacheBackend for InMemoryCacheStore {
    async fn get(&self, region: &str, key: &str) -> Result<Option<String>, CacheError> {
        let regions = self.regions.read().await;
        // Expired entries read as absent; the sweep task drops them later.
        Ok(regions
            .get(region)
            .and_then(|entries| entries.get(key))
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.value.clone()))
    }

    async fn put(&self, region: &str, key: &str, value: String) -> Result<(), CacheError> {
        let mut regions = self.regions.write().await;
        regions
            .entry(region.to_string())
            .or_default()
            .insert(key.to_string(), CacheEntry::new(value, self.default_ttl));
        Ok(())
    }

    async fn evict(&self, region: &str, key: &str) -> Result<bool, CacheError> {
        let mut regions = self.regions.write().await;
        Ok(regions
            .get_mut(region)
            .map(|entries| entries.remove(key).is_some())
            .unwrap_or(false))
    }

    async fn evict_all(&self, region: &str) -> Result<usize, CacheError> {
        let mut regions = self.regions.write().await;
        let entries = regions
            .get_mut(region)
            .ok_or_else(|| CacheError::RegionNotFound(region.to_string()))?;
        let removed = entries.len();
        entries.clear();
        debug!(region, removed, "region cleared");
        Ok(removed)
    }

    async fn list_regions(&self) -> Result<Vec<String>, CacheError> {
        let regions = self.regions.read().await;
        let mut names: Vec<String> = regions.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn region_size(&self, region: &str) -> Result<usize, CacheError> {
        let regions = self.regions.read().await;
        regions
            .get(region)
            .map(HashMap::len)
            .ok_or_else(|| CacheError::RegionNotFound(region.to_string()))
    }
}

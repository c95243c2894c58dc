//! Read-through access to a cache region.
//!
//! [`ReadThrough`] is the manual strategy: an explicit get, a loader call on
//! miss, then a put. Store failures never reach the caller; the loader is
//! the source of truth and its result is returned directly.

use std::future::Future;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::stats::CacheMetrics;
use crate::cache::store::{CacheBackend, CacheBackendExt};
use crate::error::{CacheError, Result};

// == Outcome ==
/// How a cache-eligible call was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheOutcome {
    /// Served from the store, loader not called
    Hit,
    /// Loader called, result offered to the store
    Miss,
    /// A rule excluded the call from caching
    Skipped,
    /// Store failed, loader called directly
    Bypass,
}

impl CacheOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOutcome::Hit => "hit",
            CacheOutcome::Miss => "miss",
            CacheOutcome::Skipped => "skipped",
            CacheOutcome::Bypass => "bypass",
        }
    }
}

/// A value together with how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched<T> {
    pub value: T,
    pub outcome: CacheOutcome,
}

pub(crate) enum Lookup<T> {
    Hit(T),
    Miss,
    Failed(CacheError),
}

// == Region Cache ==
/// One region of a store plus the counters of the strategy using it.
#[derive(Clone)]
pub struct RegionCache {
    store: Arc<dyn CacheBackend>,
    region: String,
    metrics: Arc<CacheMetrics>,
}

impl RegionCache {
    pub fn new(store: Arc<dyn CacheBackend>, region: impl Into<String>) -> Self {
        Self {
            store,
            region: region.into(),
            metrics: Arc::new(CacheMetrics::new()),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn store(&self) -> &Arc<dyn CacheBackend> {
        &self.store
    }

    pub fn metrics(&self) -> &CacheMetrics {
        &self.metrics
    }

    pub async fn put<T>(&self, key: &str, value: &T) -> std::result::Result<(), CacheError>
    where
        T: Serialize + Sync,
    {
        self.store.put_json(&self.region, key, value).await?;
        self.metrics.record_put();
        Ok(())
    }

    pub async fn evict(&self, key: &str) -> std::result::Result<bool, CacheError> {
        self.store.evict(&self.region, key).await
    }

    pub async fn evict_all(&self) -> std::result::Result<usize, CacheError> {
        self.store.evict_all(&self.region).await
    }

    pub(crate) async fn lookup<T>(&self, key: &str) -> Lookup<T>
    where
        T: DeserializeOwned + Send,
    {
        match self.store.get_json::<T>(&self.region, key).await {
            Ok(Some(value)) => Lookup::Hit(value),
            Ok(None) => Lookup::Miss,
            Err(err) => Lookup::Failed(err),
        }
    }

    /// Stores a freshly loaded value; a failure is logged and otherwise ignored.
    pub(crate) async fn offer<T>(&self, key: &str, value: &T)
    where
        T: Serialize + Sync,
    {
        if let Err(err) = self.put(key, value).await {
            warn!(region = %self.region, key, error = %err, "cache put failed, value not cached");
        }
    }

    pub(crate) fn trace(&self, key: &str, outcome: CacheOutcome) {
        match outcome {
            CacheOutcome::Hit => self.metrics.record_hit(),
            CacheOutcome::Miss => self.metrics.record_miss(),
            CacheOutcome::Skipped => self.metrics.record_skip(),
            CacheOutcome::Bypass => self.metrics.record_fallback(),
        }
        debug!(region = %self.region, key, outcome = outcome.as_str(), "cache lookup");
    }
}

// == Read Through ==
/// Manual read-through accessor.
#[derive(Clone)]
pub struct ReadThrough {
    cache: RegionCache,
}

impl ReadThrough {
    pub fn new(cache: RegionCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &RegionCache {
        &self.cache
    }

    /// Returns the cached value for `key`, or loads, stores and returns it.
    ///
    /// Loader errors propagate and are never cached, so an absent entity is
    /// looked up again on the next call.
    pub async fn fetch<T, F, Fut>(&self, key: &str, loader: F) -> Result<Fetched<T>>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match self.cache.lookup::<T>(key).await {
            Lookup::Hit(value) => {
                self.cache.trace(key, CacheOutcome::Hit);
                Ok(Fetched {
                    value,
                    outcome: CacheOutcome::Hit,
                })
            }
            Lookup::Miss => {
                self.cache.trace(key, CacheOutcome::Miss);
                let value = loader().await?;
                self.cache.offer(key, &value).await;
                Ok(Fetched {
                    value,
                    outcome: CacheOutcome::Miss,
                })
            }
            Lookup::Failed(err) => {
                warn!(region = %self.cache.region(), key, error = %err, "cache read failed, loading directly");
                self.cache.trace(key, CacheOutcome::Bypass);
                let value = loader().await?;
                Ok(Fetched {
                    value,
                    outcome: CacheOutcome::Bypass,
                })
            }
        }
    }

    pub async fn read_through<T, F, Fut>(&self, key: &str, loader: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.fetch(key, loader).await.map(|fetched| fetched.value)
    }
}

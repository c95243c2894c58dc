//! Rule-driven caching.
//!
//! A [`CacheRule`] describes how one operation is cached: how its key is
//! derived from the arguments, when the call is eligible at all, and which
//! results must not be stored. [`Interceptor::cacheable`] applies a rule
//! around a loader with the same hit/miss/fallback behaviour as the manual
//! accessor.

use std::future::Future;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::read_through::{CacheOutcome, Fetched, Lookup, RegionCache};
use crate::error::Result;

// == Cache Rule ==
pub struct CacheRule<A: ?Sized, T> {
    /// Operation name, used in logs
    pub name: &'static str,
    /// Derives the key from the call arguments
    pub key: fn(&A) -> String,
    /// Call is cached only when this holds; otherwise the store is not touched
    pub condition: fn(&A) -> bool,
    /// A result matching this is returned but not stored
    pub unless: fn(&T) -> bool,
}

fn always<A: ?Sized>(_: &A) -> bool {
    true
}

fn never<T>(_: &T) -> bool {
    false
}

impl<A: ?Sized, T> CacheRule<A, T> {
    pub fn new(name: &'static str, key: fn(&A) -> String) -> Self {
        Self {
            name,
            key,
            condition: always::<A>,
            unless: never::<T>,
        }
    }

    pub fn condition(mut self, condition: fn(&A) -> bool) -> Self {
        self.condition = condition;
        self
    }

    pub fn unless(mut self, unless: fn(&T) -> bool) -> Self {
        self.unless = unless;
        self
    }
}

// == Interceptor ==
/// Declarative read-through accessor.
#[derive(Clone)]
pub struct Interceptor {
    cache: RegionCache,
}

impl Interceptor {
    pub fn new(cache: RegionCache) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &RegionCache {
        &self.cache
    }

    /// Runs `loader` under `rule`.
    pub async fn cacheable<A, T, F, Fut>(
        &self,
        rule: &CacheRule<A, T>,
        args: &A,
        loader: F,
    ) -> Result<Fetched<T>>
    where
        A: ?Sized + Sync,
        T: Serialize + DeserializeOwned + Send + Sync,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if !(rule.condition)(args) {
            debug!(rule = rule.name, "cache condition not met, skipping cache");
            self.cache.trace(rule.name, CacheOutcome::Skipped);
            let value = loader().await?;
            return Ok(Fetched {
                value,
                outcome: CacheOutcome::Skipped,
            });
        }

        let key = (rule.key)(args);
        match self.cache.lookup::<T>(&key).await {
            Lookup::Hit(value) => {
                self.cache.trace(&key, CacheOutcome::Hit);
                Ok(Fetched {
                    value,
                    outcome: CacheOutcome::Hit,
                })
            }
            Lookup::Miss => {
                self.cache.trace(&key, CacheOutcome::Miss);
                let value = loader().await?;
                if (rule.unless)(&value) {
                    debug!(rule = rule.name, key = %key, "result excluded from cache");
                } else {
                    self.cache.offer(&key, &value).await;
                }
                Ok(Fetched {
                    value,
                    outcome: CacheOutcome::Miss,
                })
            }
            Lookup::Failed(err) => {
                warn!(rule = rule.name, key = %key, error = %err, "cache read failed, loading directly");
                self.cache.trace(&key, CacheOutcome::Bypass);
                let value = loader().await?;
                Ok(Fetched {
                    value,
                    outcome: CacheOutcome::Bypass,
                })
            }
        }
    }
}

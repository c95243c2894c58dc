//! Cache Module
//!
//! Read-through caching of text entry projections over a region store,
//! with two interchangeable strategies selected at runtime.

mod declarative;
mod entry;
mod keys;
mod read_through;
mod stats;
mod store;
mod strategy;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use declarative::{CacheRule, Interceptor};
pub use entry::CacheEntry;
pub use keys::{EntryQuery, AUTO_PREFIX};
pub use read_through::{CacheOutcome, Fetched, ReadThrough, RegionCache};
pub use stats::{CacheMetrics, CacheStats};
pub use store::{CacheBackend, CacheBackendExt, InMemoryCacheStore};
pub use strategy::{CacheStrategy, StrategyFlag};

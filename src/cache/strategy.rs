//! Runtime-selectable caching strategy.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// How read-through caching is performed for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    /// Explicit get/put calls around the loader
    Manual,
    /// Rule-driven interception with key and skip conditions
    Auto,
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheStrategy::Manual => write!(f, "manual"),
            CacheStrategy::Auto => write!(f, "auto"),
        }
    }
}

/// Process-wide strategy switch shared by every request.
///
/// Reads and writes use relaxed ordering: requests already in flight when
/// the flag flips may still run under the previous strategy. Both
/// strategies return the same data, so this only affects which region keys
/// get populated. The flag is not persisted and restarts from config.
#[derive(Debug, Clone)]
pub struct StrategyFlag {
    use_auto: Arc<AtomicBool>,
}

impl StrategyFlag {
    pub fn new(use_auto: bool) -> Self {
        Self {
            use_auto: Arc::new(AtomicBool::new(use_auto)),
        }
    }

    pub fn use_auto(&self) -> bool {
        self.use_auto.load(Ordering::Relaxed)
    }

    pub fn current(&self) -> CacheStrategy {
        if self.use_auto() {
            CacheStrategy::Auto
        } else {
            CacheStrategy::Manual
        }
    }

    /// Sets the flag and returns the strategy that was active before.
    pub fn set(&self, use_auto: bool) -> CacheStrategy {
        if self.use_auto.swap(use_auto, Ordering::Relaxed) {
            CacheStrategy::Auto
        } else {
            CacheStrategy::Manual
        }
    }
}

impl Default for StrategyFlag {
    fn default() -> Self {
        Self::new(false)
    }
}

//! Stored cache values and their expiry deadlines.

use std::time::{SystemTime, UNIX_EPOCH};

/// A serialized value held by the in-memory store.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// JSON text of the cached value
    pub value: String,
    /// Unix milliseconds at insertion
    pub created_at: u64,
    /// Unix milliseconds after which the entry is gone; `None` keeps it until evicted
    pub expires_at: Option<u64>,
}

impl CacheEntry {
    pub fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        Self::stored_at(value, current_timestamp_ms(), ttl_seconds)
    }

    fn stored_at(value: String, now_ms: u64, ttl_seconds: Option<u64>) -> Self {
        Self {
            value,
            created_at: now_ms,
            expires_at: ttl_seconds.map(|secs| now_ms.saturating_add(secs.saturating_mul(1000))),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(current_timestamp_ms())
    }

    /// Deadline is inclusive: an entry expiring at `t` is already gone at `t`.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        self.expires_at.is_some_and(|deadline| now_ms >= deadline)
    }
}

pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as u64)
        .unwrap_or_default()
}

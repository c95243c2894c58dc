//! Response DTOs for the entry service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::cache::{CacheStats, CacheStrategy};

/// Response body for the count endpoints
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Response body for DELETE /api/entries/:id
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: i64,
}

impl DeleteResponse {
    pub fn new(id: i64) -> Self {
        Self {
            message: format!("Entry {} deleted successfully", id),
            id,
        }
    }
}

/// Outcome of an administrative cache command.
///
/// `success` is false only when the command itself failed; a best-effort
/// warm-up that failed is reported through `warmed_up`.
#[derive(Debug, Clone, Serialize)]
pub struct CacheOperationResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cleared_regions: Vec<String>,
    pub warmed_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CacheOperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            cleared_regions: Vec::new(),
            warmed_up: false,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            cleared_regions: Vec::new(),
            warmed_up: false,
            error: Some(error.into()),
        }
    }
}

/// Response body for GET /api/admin/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsReport {
    pub success: bool,
    pub message: String,
    pub cache_names: Vec<String>,
    /// Entry count per region, as estimated by the store
    pub region_sizes: BTreeMap<String, usize>,
    pub active_strategy: CacheStrategy,
    pub use_auto_cache: bool,
    pub manual: CacheStats,
    pub auto: CacheStats,
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_response_serialize() {
        let json = serde_json::to_string(&DeleteResponse::new(7)).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("deleted"));
    }

    #[test]
    fn test_failed_operation_carries_error() {
        let result = CacheOperationResult::failed("Clear failed", "region missing");
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["error"], "region missing");
        assert!(json.get("cleared_regions").is_none());
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }
}

//! Request DTOs for the entry service API
//!
//! Defines the structure of incoming HTTP request bodies and query strings.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::page::{PageRequest, DEFAULT_PAGE_SIZE};

/// Maximum allowed message length in characters
pub const MAX_MESSAGE_LENGTH: usize = 1000;

/// Request body for creating an entry (POST /api/entries)
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEntryRequest {
    pub message: String,
}

/// Request body for replacing an entry's message (PUT /api/entries/:id)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEntryRequest {
    pub message: String,
}

impl CreateEntryRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_message(&self.message)
    }
}

impl UpdateEntryRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        validate_message(&self.message)
    }
}

fn validate_message(message: &str) -> Option<String> {
    if message.trim().is_empty() {
        return Some("Message cannot be empty".to_string());
    }
    if message.chars().count() > MAX_MESSAGE_LENGTH {
        return Some(format!(
            "Message exceeds maximum length of {} characters",
            MAX_MESSAGE_LENGTH
        ));
    }
    None
}

fn default_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Query string for plain paged listings
#[derive(Debug, Clone, Deserialize)]
pub struct PageParams {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

impl PageParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

/// Query string for GET /api/search
#[derive(Debug, Clone, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

impl SearchParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

/// Query string for GET /api/range; both dates are inclusive ISO dates
#[derive(Debug, Clone, Deserialize)]
pub struct DateRangeParams {
    pub from: NaiveDate,
    pub to: NaiveDate,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_size")]
    pub size: u32,
}

impl DateRangeParams {
    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

/// Request body for POST /api/admin/cache/clear
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClearCacheRequest {
    /// Region to clear when `clear_all` is false
    #[serde(default)]
    pub region_name: Option<String>,
    #[serde(default)]
    pub clear_all: bool,
    /// Run a warm-up pass after clearing
    #[serde(default)]
    pub warm_up: bool,
}

/// Request body for POST /api/admin/cache/strategy
#[derive(Debug, Clone, Deserialize)]
pub struct ToggleStrategyRequest {
    pub use_auto: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_deserialize() {
        let req: CreateEntryRequest = serde_json::from_str(r#"{"message": "hi"}"#).unwrap();
        assert_eq!(req.message, "hi");
        assert!(req.validate().is_none());
    }

    #[test]
    fn test_validate_blank_message() {
        let req = UpdateEntryRequest {
            message: "   ".to_string(),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_message_too_long() {
        let req = CreateEntryRequest {
            message: "x".repeat(MAX_MESSAGE_LENGTH + 1),
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_clear_request_defaults() {
        let req: ClearCacheRequest = serde_json::from_str("{}").unwrap();
        assert!(req.region_name.is_none());
        assert!(!req.clear_all);
        assert!(!req.warm_up);
    }

    #[test]
    fn test_date_range_params_parse_iso_dates() {
        let params: DateRangeParams =
            serde_json::from_str(r#"{"from": "2024-01-01", "to": "2024-01-31"}"#).unwrap();
        assert_eq!(params.from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(params.page_request(), PageRequest::new(0, DEFAULT_PAGE_SIZE));
    }
}

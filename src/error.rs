//! Error types for the entry service
//!
//! Provides unified error handling using thiserror. Store-level failures
//! live in [`CacheError`]; everything a caller can observe is an [`AppError`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Failures raised by a cache store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Store could not be reached or refused the operation
    #[error("Cache store unavailable: {0}")]
    Unavailable(String),

    /// Value could not be encoded or decoded
    #[error("Cache serialization failed: {0}")]
    Serialization(String),

    /// Targeted region does not exist
    #[error("Cache region not found: {0}")]
    RegionNotFound(String),
}

impl From<serde_json::Error> for CacheError {
    fn from(err: serde_json::Error) -> Self {
        CacheError::Serialization(err.to_string())
    }
}

// == App Error Enum ==
/// Unified error type for the entry service.
#[derive(Error, Debug)]
pub enum AppError {
    /// Entity absent in persistence
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is neither owner nor admin
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// No acting user on the request
    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    /// Malformed input to a query or mutation
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Named cache region does not exist
    #[error("Cache region not found: {0}")]
    RegionNotFound(String),

    /// Store-level cache failure surfaced by an administrative operation
    #[error(transparent)]
    Cache(#[from] CacheError),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found_entry(id: i64) -> Self {
        AppError::NotFound(format!("Text entry {} does not exist", id))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// HTTP status the error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::AccessDenied(_) => StatusCode::FORBIDDEN,
            AppError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RegionNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Cache(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.to_string()
        }));

        (self.status(), body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the entry service.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::not_found_entry(3).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::AccessDenied("x".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(CacheError::Unavailable("down".into())).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_cache_error_is_transparent() {
        let err = AppError::from(CacheError::RegionNotFound("users".into()));
        assert_eq!(err.to_string(), "Cache region not found: users");
    }

    #[test]
    fn test_serde_error_maps_to_serialization() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(CacheError::from(err), CacheError::Serialization(_)));
    }
}

//! Text entry entity and its cached read projection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// == Text Entry ==
/// A persisted text entry. Owned by the repository; never cached directly.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEntry {
    pub id: i64,
    pub message: String,
    /// Username of the author
    pub owner: String,
    /// Associated user account, if any
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to insert a new entry.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTextEntry {
    pub message: String,
    pub owner: String,
    pub user_id: Option<i64>,
}

// == Response DTO ==
/// Read-only projection of a [`TextEntry`], the value stored in the cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEntryResponse {
    pub id: i64,
    pub message: String,
    pub owner: String,
    pub user_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<TextEntry> for TextEntryResponse {
    fn from(entry: TextEntry) -> Self {
        Self {
            id: entry.id,
            message: entry.message,
            owner: entry.owner,
            user_id: entry.user_id,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

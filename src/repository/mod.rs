//! Persistence Module
//!
//! The repository is the authoritative source for text entries. The cache
//! layer only ever reads through it and never writes entities back.

mod memory;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{NewTextEntry, Page, PageRequest, TextEntry};

pub use memory::InMemoryEntryRepository;

// == Entry Filter ==
/// Selection applied by `find_all` and `count`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryFilter {
    All,
    /// Case-insensitive substring match on the message
    Search(String),
    Owner(String),
    /// Inclusive calendar dates on `created_at` (UTC)
    DateRange { from: NaiveDate, to: NaiveDate },
    User(i64),
}

impl EntryFilter {
    pub fn matches(&self, entry: &TextEntry) -> bool {
        match self {
            EntryFilter::All => true,
            EntryFilter::Search(term) => entry
                .message
                .to_lowercase()
                .contains(&term.to_lowercase()),
            EntryFilter::Owner(owner) => entry.owner == *owner,
            EntryFilter::DateRange { from, to } => {
                let day = entry.created_at.date_naive();
                day >= *from && day <= *to
            }
            EntryFilter::User(user_id) => entry.user_id == Some(*user_id),
        }
    }
}

// == Repository Trait ==
/// Storage contract for text entries.
///
/// Results of `find_all` are ordered newest first (`created_at`, then `id`).
#[async_trait]
pub trait TextEntryRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<TextEntry>>;

    async fn find_all(&self, filter: &EntryFilter, page: PageRequest) -> Result<Page<TextEntry>>;

    async fn count(&self, filter: &EntryFilter) -> Result<u64>;

    /// Persists a new entry, assigning its id and timestamps.
    async fn insert(&self, entry: NewTextEntry) -> Result<TextEntry>;

    /// Replaces an existing entry; fails with NotFound if it is gone.
    async fn update(&self, entry: TextEntry) -> Result<TextEntry>;

    /// Returns whether an entry was removed.
    async fn delete_by_id(&self, id: i64) -> Result<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(message: &str, owner: &str, user_id: Option<i64>) -> TextEntry {
        let created = Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap();
        TextEntry {
            id: 1,
            message: message.to_string(),
            owner: owner.to_string(),
            user_id,
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let e = entry("Admissions Open", "alice", None);
        assert!(EntryFilter::Search("admissions".into()).matches(&e));
        assert!(!EntryFilter::Search("closed".into()).matches(&e));
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let e = entry("m", "alice", None);
        let day = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert!(EntryFilter::DateRange { from: day, to: day }.matches(&e));

        let later = NaiveDate::from_ymd_opt(2024, 3, 16).unwrap();
        assert!(!EntryFilter::DateRange { from: later, to: later }.matches(&e));
    }

    #[test]
    fn test_owner_and_user_filters() {
        let e = entry("m", "alice", Some(9));
        assert!(EntryFilter::Owner("alice".into()).matches(&e));
        assert!(!EntryFilter::Owner("bob".into()).matches(&e));
        assert!(EntryFilter::User(9).matches(&e));
        assert!(!EntryFilter::User(10).matches(&e));
    }
}

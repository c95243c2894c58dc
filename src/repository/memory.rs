//! In-memory repository backed by a map behind an async RwLock.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::{EntryFilter, TextEntryRepository};
use crate::error::{AppError, Result};
use crate::models::{NewTextEntry, Page, PageRequest, TextEntry};

#[derive(Debug)]
pub struct InMemoryEntryRepository {
    entries: RwLock<BTreeMap<i64, TextEntry>>,
    next_id: AtomicI64,
}

impl InMemoryEntryRepository {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Stores an entry under a fixed id, used to seed fixtures.
    ///
    /// Later inserts continue after the highest seeded id.
    pub async fn insert_with_id(
        &self,
        id: i64,
        entry: NewTextEntry,
        created_at: DateTime<Utc>,
    ) -> TextEntry {
        let stored = TextEntry {
            id,
            message: entry.message,
            owner: entry.owner,
            user_id: entry.user_id,
            created_at,
            updated_at: created_at,
        };
        self.entries.write().await.insert(id, stored.clone());
        self.next_id.fetch_max(id + 1, Ordering::SeqCst);
        stored
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for InMemoryEntryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextEntryRepository for InMemoryEntryRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<TextEntry>> {
        Ok(self.entries.read().await.get(&id).cloned())
    }

    async fn find_all(&self, filter: &EntryFilter, page: PageRequest) -> Result<Page<TextEntry>> {
        let entries = self.entries.read().await;
        let mut matching: Vec<&TextEntry> = entries.values().filter(|e| filter.matches(e)).collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = matching.len() as u64;
        let content = matching
            .into_iter()
            .skip(page.offset())
            .take(page.size as usize)
            .cloned()
            .collect();

        Ok(Page::new(content, page, total))
    }

    async fn count(&self, filter: &EntryFilter) -> Result<u64> {
        let entries = self.entries.read().await;
        Ok(entries.values().filter(|e| filter.matches(e)).count() as u64)
    }

    async fn insert(&self, entry: NewTextEntry) -> Result<TextEntry> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let stored = TextEntry {
            id,
            message: entry.message,
            owner: entry.owner,
            user_id: entry.user_id,
            created_at: now,
            updated_at: now,
        };
        self.entries.write().await.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, mut entry: TextEntry) -> Result<TextEntry> {
        let mut entries = self.entries.write().await;
        if !entries.contains_key(&entry.id) {
            return Err(AppError::not_found_entry(entry.id));
        }
        entry.updated_at = Utc::now();
        entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool> {
        Ok(self.entries.write().await.remove(&id).is_some())
    }
}

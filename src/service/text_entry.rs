//! Text entry service.
//!
//! Every read goes through one of two caching strategies chosen per call
//! from the shared [`StrategyFlag`]. Both strategies write into the same
//! region under different key prefixes, so switching strategies starts
//! cold but a region clear covers both.
//!
//! Writes persist first and only then touch the cache. Any write evicts
//! the whole region (a new or changed entry can appear in any list, search
//! or count) and then writes the single-entry key through.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::auth::Principal;
use crate::cache::{
    CacheBackend, CacheRule, CacheStrategy, EntryQuery, Fetched, Interceptor, ReadThrough,
    RegionCache, StrategyFlag,
};
use crate::error::{AppError, Result};
use crate::models::{
    CreateEntryRequest, NewTextEntry, Page, PageRequest, TextEntryResponse, UpdateEntryRequest,
};
use crate::repository::TextEntryRepository;

type EntryPage = Page<TextEntryResponse>;

// == Declarative Rules ==
fn entry_rule() -> CacheRule<i64, TextEntryResponse> {
    CacheRule::new("find_by_id", |id: &i64| {
        EntryQuery::ById(*id).auto_key_unchecked()
    })
    .condition(|id: &i64| *id > 0)
}

fn page_rule() -> CacheRule<EntryQuery, EntryPage> {
    CacheRule::new("find_page", |query: &EntryQuery| query.auto_key_unchecked())
        .condition(|query: &EntryQuery| query.validate().is_ok())
        .unless(|page: &EntryPage| page.is_empty())
}

fn count_rule() -> CacheRule<EntryQuery, u64> {
    CacheRule::new("count", |query: &EntryQuery| query.auto_key_unchecked())
        .condition(|query: &EntryQuery| query.validate().is_ok())
}

// == Service ==
pub struct TextEntryService {
    repo: Arc<dyn TextEntryRepository>,
    manual: ReadThrough,
    auto: Interceptor,
    strategy: StrategyFlag,
}

impl TextEntryService {
    pub fn new(
        repo: Arc<dyn TextEntryRepository>,
        store: Arc<dyn CacheBackend>,
        region: impl Into<String>,
        strategy: StrategyFlag,
    ) -> Self {
        let region = region.into();
        Self {
            repo,
            manual: ReadThrough::new(RegionCache::new(store.clone(), region.clone())),
            auto: Interceptor::new(RegionCache::new(store, region)),
            strategy,
        }
    }

    pub fn strategy(&self) -> &StrategyFlag {
        &self.strategy
    }

    pub fn region(&self) -> &str {
        self.manual.cache().region()
    }

    /// Cache handle and counters of the given strategy.
    pub fn cache_for(&self, strategy: CacheStrategy) -> &RegionCache {
        match strategy {
            CacheStrategy::Manual => self.manual.cache(),
            CacheStrategy::Auto => self.auto.cache(),
        }
    }

    // == Dispatch ==
    /// Looks up one entry under the strategy active at call time.
    pub async fn fetch_by_id(&self, id: i64) -> Result<Fetched<TextEntryResponse>> {
        match self.strategy.current() {
            CacheStrategy::Manual => self.fetch_by_id_manual(id).await,
            CacheStrategy::Auto => self.fetch_by_id_auto(id).await,
        }
    }

    /// Runs a list query under the strategy active at call time.
    pub async fn fetch_page(&self, query: &EntryQuery) -> Result<Fetched<EntryPage>> {
        match self.strategy.current() {
            CacheStrategy::Manual => self.fetch_page_manual(query).await,
            CacheStrategy::Auto => self.fetch_page_auto(query).await,
        }
    }

    /// Runs a count query under the strategy active at call time.
    pub async fn fetch_count(&self, query: &EntryQuery) -> Result<Fetched<u64>> {
        match self.strategy.current() {
            CacheStrategy::Manual => self.fetch_count_manual(query).await,
            CacheStrategy::Auto => self.fetch_count_auto(query).await,
        }
    }

    // == Manual Strategy ==
    pub async fn fetch_by_id_manual(&self, id: i64) -> Result<Fetched<TextEntryResponse>> {
        let key = EntryQuery::ById(id).manual_key()?;
        self.manual.fetch(&key, || self.load_entry(id)).await
    }

    pub async fn fetch_page_manual(&self, query: &EntryQuery) -> Result<Fetched<EntryPage>> {
        let key = query.manual_key()?;
        self.manual.fetch(&key, || self.load_page(query)).await
    }

    pub async fn fetch_count_manual(&self, query: &EntryQuery) -> Result<Fetched<u64>> {
        let key = query.manual_key()?;
        self.manual.fetch(&key, || self.load_count(query)).await
    }

    // == Declarative Strategy ==
    pub async fn fetch_by_id_auto(&self, id: i64) -> Result<Fetched<TextEntryResponse>> {
        EntryQuery::ById(id).validate()?;
        self.auto
            .cacheable(&entry_rule(), &id, || self.load_entry(id))
            .await
    }

    pub async fn fetch_page_auto(&self, query: &EntryQuery) -> Result<Fetched<EntryPage>> {
        query.validate()?;
        self.auto
            .cacheable(&page_rule(), query, || self.load_page(query))
            .await
    }

    pub async fn fetch_count_auto(&self, query: &EntryQuery) -> Result<Fetched<u64>> {
        query.validate()?;
        self.auto
            .cacheable(&count_rule(), query, || self.load_count(query))
            .await
    }

    // == Queries ==
    pub async fn find_by_id(&self, id: i64) -> Result<TextEntryResponse> {
        Ok(self.fetch_by_id(id).await?.value)
    }

    pub async fn find_all(&self, page: PageRequest) -> Result<EntryPage> {
        Ok(self.fetch_page(&EntryQuery::All(page)).await?.value)
    }

    pub async fn search(&self, term: &str, page: PageRequest) -> Result<EntryPage> {
        let query = EntryQuery::Search {
            term: term.to_string(),
            page,
        };
        Ok(self.fetch_page(&query).await?.value)
    }

    pub async fn find_by_owner(&self, owner: &str, page: PageRequest) -> Result<EntryPage> {
        let query = EntryQuery::Owner {
            owner: owner.to_string(),
            page,
        };
        Ok(self.fetch_page(&query).await?.value)
    }

    pub async fn find_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    ) -> Result<EntryPage> {
        let query = EntryQuery::DateRange { from, to, page };
        Ok(self.fetch_page(&query).await?.value)
    }

    pub async fn find_by_user(&self, user_id: i64, page: PageRequest) -> Result<EntryPage> {
        let query = EntryQuery::User { user_id, page };
        Ok(self.fetch_page(&query).await?.value)
    }

    pub async fn count_total(&self) -> Result<u64> {
        Ok(self.fetch_count(&EntryQuery::TotalCount).await?.value)
    }

    pub async fn count_by_owner(&self, owner: &str) -> Result<u64> {
        let query = EntryQuery::CountByOwner(owner.to_string());
        Ok(self.fetch_count(&query).await?.value)
    }

    // == Mutations ==
    /// Persists a new entry owned by `principal`.
    pub async fn create(
        &self,
        principal: &Principal,
        request: CreateEntryRequest,
    ) -> Result<TextEntryResponse> {
        if let Some(message) = request.validate() {
            return Err(AppError::Validation(message));
        }

        let saved = self
            .repo
            .insert(NewTextEntry {
                message: request.message,
                owner: principal.username.clone(),
                user_id: principal.user_id,
            })
            .await?;
        let response = TextEntryResponse::from(saved);
        info!(id = response.id, owner = %response.owner, "text entry created");

        self.invalidate_region().await;
        self.write_through(&response).await;
        Ok(response)
    }

    /// Replaces the message of an entry the principal owns (or any, for admins).
    pub async fn update(
        &self,
        principal: &Principal,
        id: i64,
        request: UpdateEntryRequest,
    ) -> Result<TextEntryResponse> {
        if let Some(message) = request.validate() {
            return Err(AppError::Validation(message));
        }

        let mut entry = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_entry(id))?;
        principal.ensure_can_modify(&entry)?;

        entry.message = request.message;
        let saved = self.repo.update(entry).await?;
        let response = TextEntryResponse::from(saved);
        info!(id, by = %principal.username, "text entry updated");

        self.invalidate_region().await;
        self.write_through(&response).await;
        Ok(response)
    }

    pub async fn delete(&self, principal: &Principal, id: i64) -> Result<()> {
        let entry = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found_entry(id))?;
        principal.ensure_can_modify(&entry)?;

        if !self.repo.delete_by_id(id).await? {
            return Err(AppError::not_found_entry(id));
        }
        info!(id, by = %principal.username, "text entry deleted");

        self.evict_entry(id).await;
        self.invalidate_region().await;
        Ok(())
    }

    // == Loaders ==
    async fn load_entry(&self, id: i64) -> Result<TextEntryResponse> {
        self.repo
            .find_by_id(id)
            .await?
            .map(TextEntryResponse::from)
            .ok_or_else(|| AppError::not_found_entry(id))
    }

    async fn load_page(&self, query: &EntryQuery) -> Result<EntryPage> {
        let filter = query
            .filter()
            .ok_or_else(|| AppError::Internal(format!("{} is not a list query", query.tag())))?;
        let page = query.page().unwrap_or_default();
        Ok(self
            .repo
            .find_all(&filter, page)
            .await?
            .map(TextEntryResponse::from))
    }

    async fn load_count(&self, query: &EntryQuery) -> Result<u64> {
        let filter = query
            .filter()
            .ok_or_else(|| AppError::Internal(format!("{} is not a count query", query.tag())))?;
        self.repo.count(&filter).await
    }

    // == Invalidation ==
    async fn invalidate_region(&self) {
        match self.manual.cache().evict_all().await {
            Ok(removed) => info!(region = self.region(), removed, "cache region invalidated"),
            Err(err) => warn!(region = self.region(), error = %err, "cache region invalidation failed"),
        }
    }

    async fn evict_entry(&self, id: i64) {
        let query = EntryQuery::ById(id);
        for (cache, key) in [
            (self.manual.cache(), query.key_unchecked()),
            (self.auto.cache(), query.auto_key_unchecked()),
        ] {
            if let Err(err) = cache.evict(&key).await {
                warn!(key = %key, error = %err, "cache eviction failed");
            }
        }
    }

    async fn write_through(&self, response: &TextEntryResponse) {
        let query = EntryQuery::ById(response.id);
        let (cache, key) = match self.strategy.current() {
            CacheStrategy::Manual => (self.manual.cache(), query.key_unchecked()),
            CacheStrategy::Auto => (self.auto.cache(), query.auto_key_unchecked()),
        };
        if let Err(err) = cache.put(&key, response).await {
            warn!(key = %key, error = %err, "cache write-through failed");
        }
    }
}

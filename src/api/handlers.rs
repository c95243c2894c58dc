//! API Handlers
//!
//! HTTP request handlers for each entry service endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::auth::Principal;
use crate::cache::{CacheBackend, InMemoryCacheStore, StrategyFlag};
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{
    CacheOperationResult, CacheStatsReport, ClearCacheRequest, CountResponse,
    CreateEntryRequest, DateRangeParams, DeleteResponse, HealthResponse, Page, PageParams,
    SearchParams, TextEntryResponse, ToggleStrategyRequest, UpdateEntryRequest,
};
use crate::repository::{InMemoryEntryRepository, TextEntryRepository};
use crate::service::{CacheAdminService, TextEntryService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub entries: Arc<TextEntryService>,
    pub admin: Arc<CacheAdminService>,
}

impl AppState {
    /// Wires the services over the given repository and cache store.
    pub fn new(
        repo: Arc<dyn TextEntryRepository>,
        store: Arc<dyn CacheBackend>,
        region: impl Into<String>,
        strategy: StrategyFlag,
    ) -> Self {
        let entries = Arc::new(TextEntryService::new(repo, store.clone(), region, strategy));
        let admin = Arc::new(CacheAdminService::new(entries.clone(), store));
        Self { entries, admin }
    }

    /// Creates in-memory state from configuration.
    ///
    /// The concrete store is returned as well so the caller can run the
    /// expiry sweep against it.
    pub fn from_config(config: &Config) -> (Self, Arc<InMemoryCacheStore>) {
        let store = Arc::new(InMemoryCacheStore::new(
            [config.cache_region.clone()],
            config.default_ttl(),
        ));
        let state = Self::new(
            Arc::new(InMemoryEntryRepository::new()),
            store.clone(),
            config.cache_region.clone(),
            StrategyFlag::new(config.use_auto_cache),
        );
        (state, store)
    }
}

// == Entry Handlers ==

/// Handler for GET /api/entries
pub async fn list_entries_handler(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TextEntryResponse>>> {
    Ok(Json(state.entries.find_all(params.page_request()).await?))
}

/// Handler for GET /api/entries/:id
pub async fn get_entry_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TextEntryResponse>> {
    Ok(Json(state.entries.find_by_id(id).await?))
}

/// Handler for POST /api/entries
pub async fn create_entry_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(req): Json<CreateEntryRequest>,
) -> Result<(StatusCode, Json<TextEntryResponse>)> {
    let created = state.entries.create(&principal, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT /api/entries/:id
pub async fn update_entry_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
    Json(req): Json<UpdateEntryRequest>,
) -> Result<Json<TextEntryResponse>> {
    Ok(Json(state.entries.update(&principal, id, req).await?))
}

/// Handler for DELETE /api/entries/:id
pub async fn delete_entry_handler(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<i64>,
) -> Result<Json<DeleteResponse>> {
    state.entries.delete(&principal, id).await?;
    Ok(Json(DeleteResponse::new(id)))
}

/// Handler for GET /api/search?term=
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Page<TextEntryResponse>>> {
    let page = params.page_request();
    Ok(Json(state.entries.search(&params.term, page).await?))
}

/// Handler for GET /api/owners/:owner/entries
pub async fn owner_entries_handler(
    State(state): State<AppState>,
    Path(owner): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TextEntryResponse>>> {
    Ok(Json(
        state
            .entries
            .find_by_owner(&owner, params.page_request())
            .await?,
    ))
}

/// Handler for GET /api/owners/:owner/count
pub async fn owner_count_handler(
    State(state): State<AppState>,
    Path(owner): Path<String>,
) -> Result<Json<CountResponse>> {
    let count = state.entries.count_by_owner(&owner).await?;
    Ok(Json(CountResponse { count }))
}

/// Handler for GET /api/users/:user_id/entries
pub async fn user_entries_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<TextEntryResponse>>> {
    Ok(Json(
        state
            .entries
            .find_by_user(user_id, params.page_request())
            .await?,
    ))
}

/// Handler for GET /api/range?from=&to=
pub async fn date_range_handler(
    State(state): State<AppState>,
    Query(params): Query<DateRangeParams>,
) -> Result<Json<Page<TextEntryResponse>>> {
    Ok(Json(
        state
            .entries
            .find_by_date_range(params.from, params.to, params.page_request())
            .await?,
    ))
}

/// Handler for GET /api/count
pub async fn count_handler(State(state): State<AppState>) -> Result<Json<CountResponse>> {
    let count = state.entries.count_total().await?;
    Ok(Json(CountResponse { count }))
}

// == Admin Handlers ==

/// Reports an administrative failure as a failed operation result.
fn admin_failure(summary: &str, err: AppError) -> Response {
    let status = err.status();
    (
        status,
        Json(CacheOperationResult::failed(summary, err.to_string())),
    )
        .into_response()
}

/// Handler for GET /api/admin/cache/stats
pub async fn cache_stats_handler(
    State(state): State<AppState>,
    principal: Principal,
) -> std::result::Result<Json<CacheStatsReport>, Response> {
    state
        .admin
        .stats(&principal)
        .await
        .map(Json)
        .map_err(|err| admin_failure("Failed to collect cache statistics", err))
}

/// Handler for POST /api/admin/cache/clear
pub async fn clear_cache_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(req): Json<ClearCacheRequest>,
) -> std::result::Result<Json<CacheOperationResult>, Response> {
    state
        .admin
        .clear(&principal, req)
        .await
        .map(Json)
        .map_err(|err| admin_failure("Failed to clear cache", err))
}

/// Handler for POST /api/admin/cache/strategy
pub async fn toggle_strategy_handler(
    State(state): State<AppState>,
    principal: Principal,
    Json(req): Json<ToggleStrategyRequest>,
) -> std::result::Result<Json<CacheOperationResult>, Response> {
    state
        .admin
        .toggle_strategy(&principal, req.use_auto)
        .await
        .map(Json)
        .map_err(|err| admin_failure("Failed to switch cache strategy", err))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

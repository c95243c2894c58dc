//! API Routes
//!
//! Configures the Axum router with all entry service endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, count_handler, create_entry_handler,
    date_range_handler, delete_entry_handler, get_entry_handler, health_handler,
    list_entries_handler, owner_count_handler, owner_entries_handler, search_handler,
    toggle_strategy_handler, update_entry_handler, user_entries_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/entries`, `POST /api/entries`
/// - `GET|PUT|DELETE /api/entries/:id`
/// - `GET /api/search?term=`
/// - `GET /api/owners/:owner/entries`, `GET /api/owners/:owner/count`
/// - `GET /api/users/:user_id/entries`
/// - `GET /api/range?from=&to=`
/// - `GET /api/count`
/// - `GET /api/admin/cache/stats`, `POST /api/admin/cache/clear`,
///   `POST /api/admin/cache/strategy`
/// - `GET /health`
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/entries",
            get(list_entries_handler).post(create_entry_handler),
        )
        .route(
            "/api/entries/:id",
            get(get_entry_handler)
                .put(update_entry_handler)
                .delete(delete_entry_handler),
        )
        .route("/api/search", get(search_handler))
        .route("/api/owners/:owner/entries", get(owner_entries_handler))
        .route("/api/owners/:owner/count", get(owner_count_handler))
        .route("/api/users/:user_id/entries", get(user_entries_handler))
        .route("/api/range", get(date_range_handler))
        .route("/api/count", get(count_handler))
        .route("/api/admin/cache/stats", get(cache_stats_handler))
        .route("/api/admin/cache/clear", post(clear_cache_handler))
        .route("/api/admin/cache/strategy", post(toggle_strategy_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

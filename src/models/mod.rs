//! Domain entities and DTOs
//!
//! Entities are owned by the repository; the cache only ever holds the
//! serializable response projections defined here.

pub mod entry;
pub mod page;
pub mod requests;
pub mod responses;

pub use entry::{NewTextEntry, TextEntry, TextEntryResponse};
pub use page::{Page, PageRequest};
pub use requests::{
    ClearCacheRequest, CreateEntryRequest, DateRangeParams, PageParams, SearchParams,
    ToggleStrategyRequest, UpdateEntryRequest,
};
pub use responses::{
    CacheOperationResult, CacheStatsReport, CountResponse, DeleteResponse, HealthResponse,
};

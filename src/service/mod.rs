//! Service Module
//!
//! Business operations on text entries and the administrative surface of
//! their cache.

mod cache_admin;
mod text_entry;

pub use cache_admin::CacheAdminService;
pub use text_entry::TextEntryService;

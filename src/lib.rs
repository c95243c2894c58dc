//! Entry Cache - text entry service with a read-through cache
//!
//! Reads are served through one of two interchangeable caching strategies
//! selected at runtime; writes evict the whole cache region.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{AppError, CacheError};
pub use tasks::{spawn_cleanup_task, spawn_warm_up_task};

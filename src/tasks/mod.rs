//! Background Tasks Module
//!
//! # Tasks
//! - Cache sweep: removes expired entries at configured intervals
//! - Warm-up: optional one-shot pre-population at startup

mod cleanup;
mod warm_up;

pub use cleanup::spawn_cleanup_task;
pub use warm_up::spawn_warm_up_task;

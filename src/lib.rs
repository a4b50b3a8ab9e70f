//! Policy Cache - an in-process object cache with per-type eviction policies
//!
//! Values are grouped by type tag; each type has a size budget and a maximum
//! age. Limits are enforced lazily by two separate passes, `reduce_pressure`
//! and `clean`, never on the write path.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::MemoryCache;
pub use config::{CacheConfig, Config};
pub use error::{CacheError, Result};
pub use tasks::{spawn_maintenance_task, MaintenanceSchedule};

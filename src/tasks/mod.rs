//! Background Tasks Module
//!
//! Contains background tasks that run periodically during daemon operation.
//!
//! # Tasks
//! - Maintenance: runs `clean` and `reduce_pressure` on their own intervals

mod maintenance;

pub use maintenance::{spawn_maintenance_task, MaintenanceSchedule};

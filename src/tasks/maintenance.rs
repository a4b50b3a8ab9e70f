//! Cache Maintenance Task
//!
//! Background task that periodically runs the two eviction passes.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use crate::cache::{Cacheable, Clock, MemoryCache};
use crate::config::Config;

/// Shortest period either pass can run at
const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// How often each eviction pass runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaintenanceSchedule {
    /// Period of `clean` (hard expiry)
    pub clean_interval: Duration,
    /// Period of `reduce_pressure` (age-gated shrink)
    pub pressure_interval: Duration,
}

impl MaintenanceSchedule {
    pub fn from_config(config: &Config) -> Self {
        Self {
            clean_interval: Duration::from_secs(config.clean_interval),
            pressure_interval: Duration::from_secs(config.pressure_interval),
        }
    }
}

/// Spawns a background task that keeps the cache within its policies.
///
/// The first run of each pass happens one full interval after spawning.
/// Each pass takes the cache's write lock for its whole run, so callers
/// never see it half done.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(MemoryCache::<Document>::new());
/// let handle = spawn_maintenance_task(cache.clone(), schedule);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_maintenance_task<V, C>(
    cache: Arc<MemoryCache<V, C>>,
    schedule: MaintenanceSchedule,
) -> JoinHandle<()>
where
    V: Cacheable,
    C: Clock,
{
    let clean_every = schedule.clean_interval.max(MIN_INTERVAL);
    let pressure_every = schedule.pressure_interval.max(MIN_INTERVAL);

    tokio::spawn(async move {
        info!(
            clean_ms = clean_every.as_millis() as u64,
            pressure_ms = pressure_every.as_millis() as u64,
            "Starting cache maintenance task"
        );

        let start = Instant::now();
        let mut clean_tick = interval_at(start + clean_every, clean_every);
        let mut pressure_tick = interval_at(start + pressure_every, pressure_every);
        clean_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        pressure_tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = clean_tick.tick() => {
                    let removed = cache.clean();
                    if removed > 0 {
                        info!(removed, remaining = cache.size(), "Clean: removed expired entries");
                    } else {
                        debug!("Clean: no expired entries found");
                    }
                }
                _ = pressure_tick.tick() => {
                    let removed = cache.reduce_pressure();
                    if removed > 0 {
                        info!(removed, remaining = cache.size(), "Reduce pressure: evicted entries");
                    } else {
                        debug!("Reduce pressure: nothing to evict");
                    }
                }
            }
        }
    })
}

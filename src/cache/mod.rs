//! Cache Module
//!
//! Provides an in-process object cache with per-type size and age policies.
//! Eviction is lazy: `reduce_pressure` and `clean` are separate passes that
//! callers (or the maintenance task) run periodically.

mod clock;
mod entry;
mod global;
mod memory;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{CacheEntry, CacheKey, Cacheable, TypeTag};
pub use global::current;
pub use memory::MemoryCache;
pub use policy::{PolicyTable, TypePolicy, DEFAULT_MAX_AGE, DEFAULT_MAX_SIZE};
pub use stats::{CacheStats, StatsRecorder};
pub use store::CacheStore;

// == Public Constants ==
/// Initial age below which `reduce_pressure` never evicts an entry
pub const DEFAULT_MIN_AGE: std::time::Duration = std::time::Duration::from_secs(30);

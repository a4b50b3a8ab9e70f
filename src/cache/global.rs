//! Process-wide cache instance
//!
//! Hosts that want a single shared cache use `current()`; everything else can
//! construct its own `MemoryCache`.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tracing::debug;

use crate::cache::MemoryCache;
use crate::models::Document;

static CURRENT: Lazy<Arc<MemoryCache<Document>>> = Lazy::new(|| {
    debug!("Initializing process-wide document cache");
    Arc::new(MemoryCache::new())
});

/// Returns the process-wide document cache, creating it on first use.
pub fn current() -> Arc<MemoryCache<Document>> {
    Arc::clone(&CURRENT)
}

//! Memory Cache Module
//!
//! Thread-safe front of `CacheStore`: one coarse reader/writer lock around the
//! whole store plus the clock that stamps writes and ages entries.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::cache::{
    CacheKey, CacheStats, CacheStore, Cacheable, Clock, SystemClock, TypePolicy, TypeTag,
};
use crate::config::CacheConfig;
use crate::error::Result;

// == Memory Cache ==
/// Shared cache of `V` values keyed by their own identity.
///
/// Writers and eviction passes hold the write guard for their whole run, so
/// readers never see an entry half removed. Lookups share the read guard.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use policy_cache::cache::{CacheKey, Cacheable, MemoryCache, TypeTag};
/// use uuid::Uuid;
///
/// struct Customer { id: Uuid }
///
/// impl Cacheable for Customer {
///     fn cache_key(&self) -> CacheKey { self.id }
///     fn type_tag(&self) -> TypeTag { TypeTag::from("customer") }
/// }
///
/// let cache = MemoryCache::new();
/// cache.register_cache_type("customer", 10, Some(Duration::from_secs(60)));
///
/// let id = Uuid::new_v4();
/// cache.add_update_entry(Customer { id }).unwrap();
/// assert!(cache.try_get_entry(&id).is_some());
/// assert_eq!(cache.size(), 1);
/// ```
#[derive(Debug)]
pub struct MemoryCache<V, C = SystemClock> {
    store: RwLock<CacheStore<V>>,
    clock: C,
}

impl<V: Cacheable> MemoryCache<V, SystemClock> {
    // == Constructor ==
    /// Creates an empty cache on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V: Cacheable> Default for MemoryCache<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Cacheable, C: Clock> MemoryCache<V, C> {
    /// Creates an empty cache that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        Self {
            store: RwLock::new(CacheStore::new()),
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // == Registration ==
    /// Inserts or replaces the policy for `tag`.
    ///
    /// `max_age` of `None` means the default of one day.
    pub fn register_cache_type(
        &self,
        tag: impl Into<TypeTag>,
        max_size: usize,
        max_age: Option<Duration>,
    ) {
        self.register_policy(tag, TypePolicy::new(max_size, max_age));
    }

    pub fn register_policy(&self, tag: impl Into<TypeTag>, policy: TypePolicy) {
        self.store.write().register(tag.into(), policy);
    }

    /// Registers every configured type and adopts the auto-register flag.
    pub fn apply_config(&self, config: &CacheConfig) {
        let mut store = self.store.write();
        store.set_auto_register(config.auto_register);
        for (tag, policy) in config.policies() {
            store.register(tag, policy);
        }
        debug!(
            types = config.types.len(),
            auto_register = config.auto_register,
            "Applied cache configuration"
        );
    }

    pub fn policy(&self, tag: &str) -> Option<TypePolicy> {
        self.store.read().policy(tag)
    }

    /// All registered policies ordered by tag.
    pub fn policies(&self) -> Vec<(TypeTag, TypePolicy)> {
        self.store.read().policies()
    }

    pub fn set_auto_register(&self, enabled: bool) {
        self.store.write().set_auto_register(enabled);
    }

    // == Add / Update ==
    /// Stores `value` under its own key, restarting its age.
    ///
    /// Never evicts; a type may exceed its `max_size` until the next
    /// `reduce_pressure`.
    pub fn add_update_entry(&self, value: V) -> Result<()> {
        let now = self.clock.now();
        self.store.write().add_update(value, now).map_err(|error| {
            warn!(%error, "Rejected cache write");
            error
        })
    }

    // == Lookup ==
    /// Returns the value stored under `key`, if any. Does not refresh its age.
    pub fn try_get_entry(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.store.read().get(key)
    }

    /// Total number of entries across all types.
    pub fn size(&self) -> usize {
        self.store.read().len()
    }

    pub fn size_of_type(&self, tag: &str) -> usize {
        self.store.read().len_of_type(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.store.read().is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.store.read().stats()
    }

    // == Eviction ==
    /// Age-gated shrink of every over-budget type. Returns entries removed.
    pub fn reduce_pressure(&self) -> usize {
        let now = self.clock.now();
        self.store.write().reduce_pressure(now)
    }

    /// Removes every entry past its type's `max_age`. Returns entries removed.
    pub fn clean(&self) -> usize {
        let now = self.clock.now();
        self.store.write().clean(now)
    }

    /// Empties the entry store. Policies and settings are kept.
    pub fn clear(&self) {
        let removed = self.store.write().clear();
        debug!(removed, "Cleared cache");
    }

    // == Min Age ==
    pub fn min_age(&self) -> Duration {
        self.store.read().min_age()
    }

    /// Sets the age below which `reduce_pressure` leaves entries alone.
    pub fn set_min_age(&self, min_age: Duration) {
        self.store.write().set_min_age(min_age);
    }
}

//! Cache Store Module
//!
//! Main cache engine: the keyed entry map, the per-type policy table and the
//! two eviction passes. Not synchronized; `MemoryCache` wraps it in a lock.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::cache::{
    CacheEntry, CacheKey, CacheStats, Cacheable, PolicyTable, StatsRecorder, TypePolicy, TypeTag,
    DEFAULT_MIN_AGE,
};
use crate::error::{CacheError, Result};

// == Cache Store ==
/// Entry storage with per-type size and age policies.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry<V>>,
    /// Policy per type tag
    policies: PolicyTable,
    /// Performance statistics
    stats: StatsRecorder,
    /// Entries younger than this survive `reduce_pressure`
    min_age: Duration,
    /// Register unknown types with the default policy on first write
    auto_register: bool,
    /// Next write sequence number
    next_sequence: u64,
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store with no registered types.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            policies: PolicyTable::new(),
            stats: StatsRecorder::new(),
            min_age: DEFAULT_MIN_AGE,
            auto_register: true,
            next_sequence: 0,
        }
    }

    // == Register ==
    /// Inserts or replaces the policy for `tag`.
    pub fn register(&mut self, tag: TypeTag, policy: TypePolicy) {
        debug!(
            type_tag = %tag,
            max_size = policy.max_size,
            max_age_secs = policy.max_age.as_secs(),
            "Registering cache type"
        );
        if let Some(previous) = self.policies.register(tag, policy) {
            debug!(?previous, "Replaced existing policy");
        }
    }

    pub fn policy(&self, tag: &str) -> Option<TypePolicy> {
        self.policies.get(tag).copied()
    }

    /// All registered policies ordered by tag.
    pub fn policies(&self) -> Vec<(TypeTag, TypePolicy)> {
        let mut policies: Vec<_> = self
            .policies
            .iter()
            .map(|(tag, policy)| (tag.clone(), *policy))
            .collect();
        policies.sort_by(|a, b| a.0.cmp(&b.0));
        policies
    }

    // == Get ==
    /// Returns the value stored under `key`.
    ///
    /// Lookups never change an entry's age.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<V>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Some(Arc::clone(&entry.value))
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Reduce Pressure ==
    /// Shrinks every over-budget type toward its `max_size`.
    ///
    /// Only entries at least `min_age` old are candidates, oldest first. A
    /// type whose surplus is made of young entries stays over budget until a
    /// later pass.
    ///
    /// Returns the number of entries removed.
    pub fn reduce_pressure(&mut self, now: Instant) -> usize {
        let min_age = self.min_age;

        let mut by_type: HashMap<&TypeTag, Vec<(&CacheKey, &CacheEntry<V>)>> = HashMap::new();
        for (key, entry) in &self.entries {
            by_type.entry(&entry.type_tag).or_default().push((key, entry));
        }

        let mut doomed: Vec<CacheKey> = Vec::new();
        for (tag, members) in by_type {
            let Some(policy) = self.policies.get(tag.as_str()) else {
                continue;
            };
            if members.len() <= policy.max_size {
                continue;
            }

            let excess = members.len() - policy.max_size;
            let mut eligible: Vec<_> = members
                .into_iter()
                .filter(|(_, entry)| entry.is_older_than(min_age, now))
                .collect();
            eligible.sort_by_key(|(_, entry)| entry.write_order());

            let evict = excess.min(eligible.len());
            debug!(
                type_tag = %tag,
                excess,
                eligible = eligible.len(),
                evict,
                "Type over budget"
            );
            doomed.extend(eligible.into_iter().take(evict).map(|(key, _)| *key));
        }

        for key in &doomed {
            self.entries.remove(key);
        }

        self.stats.record_pressure_evictions(doomed.len());
        doomed.len()
    }

    // == Clean ==
    /// Removes every entry at least as old as its type's `max_age`.
    ///
    /// Ignores both `max_size` and `min_age`.
    ///
    /// Returns the number of entries removed.
    pub fn clean(&mut self, now: Instant) -> usize {
        let policies = &self.policies;
        let before = self.entries.len();

        self.entries
            .retain(|_, entry| match policies.get(entry.type_tag.as_str()) {
                Some(policy) => !entry.is_older_than(policy.max_age, now),
                None => true,
            });

        let removed = before - self.entries.len();
        self.stats.record_expirations(removed);
        removed
    }

    // == Clear ==
    /// Removes all entries, keeping policies and settings.
    ///
    /// Returns the number of entries removed.
    pub fn clear(&mut self) -> usize {
        let removed = self.entries.len();
        self.entries.clear();
        removed
    }

    // == Settings ==
    pub fn min_age(&self) -> Duration {
        self.min_age
    }

    pub fn set_min_age(&mut self, min_age: Duration) {
        self.min_age = min_age;
    }

    pub fn auto_register(&self) -> bool {
        self.auto_register
    }

    pub fn set_auto_register(&mut self, enabled: bool) {
        self.auto_register = enabled;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.snapshot();
        stats.total_entries = self.entries.len();

        let mut by_type: BTreeMap<String, usize> = BTreeMap::new();
        for entry in self.entries.values() {
            *by_type.entry(entry.type_tag.to_string()).or_default() += 1;
        }
        stats.entries_by_type = by_type;
        stats
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of entries of one type.
    pub fn len_of_type(&self, tag: &str) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.type_tag.as_str() == tag)
            .count()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Cacheable> CacheStore<V> {
    // == Add / Update ==
    /// Stores `value` under its own key, stamped with `now`.
    ///
    /// An existing entry with the same key is replaced and its age restarts.
    /// No capacity check happens here; limits are enforced by the eviction
    /// passes only.
    ///
    /// # Errors
    /// - `InvalidKey` for the nil key
    /// - `InvalidRequest` for an empty type tag
    /// - `UnregisteredType` when the type has no policy and auto-registration is off
    pub fn add_update(&mut self, value: V, now: Instant) -> Result<()> {
        let key = value.cache_key();
        if key.is_nil() {
            return Err(CacheError::InvalidKey(
                "The nil key cannot be cached".to_string(),
            ));
        }

        let tag = value.type_tag();
        if tag.is_empty() {
            return Err(CacheError::InvalidRequest(
                "Type tag cannot be empty".to_string(),
            ));
        }

        if !self.policies.contains(tag.as_str()) {
            if !self.auto_register {
                return Err(CacheError::UnregisteredType(tag.to_string()));
            }
            debug!(type_tag = %tag, "Auto-registering cache type with default policy");
            self.policies.register(tag.clone(), TypePolicy::default());
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        self.entries
            .insert(key, CacheEntry::new(value, tag, now, sequence));
        Ok(())
    }
}

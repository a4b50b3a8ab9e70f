//! Cache Entry Module
//!
//! Defines keys, type tags and the stored entry with its write timestamp.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// == Cache Key ==
/// Identity of a cached object.
pub type CacheKey = Uuid;

// == Type Tag ==
/// Names the cache target type a value belongs to.
///
/// Policies are looked up by tag, so every value of the same logical type
/// must report the same tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl std::borrow::Borrow<str> for TypeTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// == Cacheable ==
/// A value that carries its own identity and type.
pub trait Cacheable: Send + Sync + 'static {
    /// Unique key of this object.
    fn cache_key(&self) -> CacheKey;

    /// Tag used to resolve the eviction policy.
    fn type_tag(&self) -> TypeTag;
}

// == Cache Entry ==
/// A stored value with the metadata the eviction passes need.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// Shared with every caller that looked the entry up
    pub value: Arc<V>,
    /// Tag captured at write time
    pub type_tag: TypeTag,
    /// Time of the last add or update
    pub updated_at: Instant,
    /// Write order, breaks ties between equal timestamps
    pub sequence: u64,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with `now`.
    pub fn new(value: V, type_tag: TypeTag, now: Instant, sequence: u64) -> Self {
        Self {
            value: Arc::new(value),
            type_tag,
            updated_at: now,
            sequence,
        }
    }

    // == Age ==
    /// Time elapsed since the last write, saturating at zero.
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.updated_at)
    }

    /// Returns true once the entry has been alive for at least `limit`.
    ///
    /// The boundary is inclusive: an entry exactly `limit` old qualifies.
    pub fn is_older_than(&self, limit: Duration, now: Instant) -> bool {
        self.age(now) >= limit
    }

    /// Ordering key for oldest-first eviction.
    pub fn write_order(&self) -> (Instant, u64) {
        (self.updated_at, self.sequence)
    }
}

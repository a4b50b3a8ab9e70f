//! Policy Module
//!
//! Per-type capacity and age limits.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::TypeTag;

// == Defaults ==
/// Entries of a type allowed to survive a pressure pass when unspecified
pub const DEFAULT_MAX_SIZE: usize = 50;

/// Maximum entry age when unspecified (one day)
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(24 * 60 * 60);

// == Type Policy ==
/// Eviction limits for one cache target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypePolicy {
    /// Entries allowed to survive `reduce_pressure`
    pub max_size: usize,
    /// Entries at least this old are removed by `clean`
    pub max_age: Duration,
}

impl TypePolicy {
    pub fn new(max_size: usize, max_age: Option<Duration>) -> Self {
        Self {
            max_size,
            max_age: max_age.unwrap_or(DEFAULT_MAX_AGE),
        }
    }
}

impl Default for TypePolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SIZE, None)
    }
}

// == Policy Table ==
/// One policy per type tag.
#[derive(Debug, Default)]
pub struct PolicyTable {
    policies: HashMap<TypeTag, TypePolicy>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    // == Register ==
    /// Inserts or replaces the policy for `tag`.
    ///
    /// Returns the policy it replaced, if any.
    pub fn register(&mut self, tag: TypeTag, policy: TypePolicy) -> Option<TypePolicy> {
        self.policies.insert(tag, policy)
    }

    pub fn get(&self, tag: &str) -> Option<&TypePolicy> {
        self.policies.get(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.policies.contains_key(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeTag, &TypePolicy)> {
        self.policies.iter()
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

//! Document Model
//!
//! The opaque JSON object the daemon caches.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::cache::{CacheKey, Cacheable, TypeTag};

/// A JSON body tagged with its identity and cache target type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub key: Uuid,
    #[serde(rename = "type")]
    pub kind: TypeTag,
    #[serde(default)]
    pub body: Value,
}

impl Document {
    pub fn new(key: Uuid, kind: impl Into<TypeTag>, body: Value) -> Self {
        Self {
            key,
            kind: kind.into(),
            body,
        }
    }
}

impl Cacheable for Document {
    fn cache_key(&self) -> CacheKey {
        self.key
    }

    fn type_tag(&self) -> TypeTag {
        self.kind.clone()
    }
}

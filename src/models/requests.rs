//! Request DTOs for the cache daemon API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::cache::DEFAULT_MAX_SIZE;
use crate::models::Document;

/// Request body for storing a document (PUT /entries)
#[derive(Debug, Clone, Deserialize)]
pub struct PutEntryRequest {
    /// Identity of the document
    pub key: Uuid,
    /// Cache target type
    #[serde(rename = "type")]
    pub type_name: String,
    /// Opaque JSON payload
    #[serde(default)]
    pub body: Value,
}

impl PutEntryRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_nil() {
            return Some("Key cannot be the nil UUID".to_string());
        }
        if self.type_name.trim().is_empty() {
            return Some("Type cannot be empty".to_string());
        }
        None
    }

    pub fn into_document(self) -> Document {
        Document::new(self.key, self.type_name, self.body)
    }
}

/// Request body for registering a cache type (PUT /types/:type)
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterTypeRequest {
    /// Entries allowed to survive a pressure pass
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    /// Maximum age in seconds (default: one day)
    #[serde(default)]
    pub max_age_secs: Option<u64>,
}

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}

/// Request body for changing the minimum age (PUT /min-age)
#[derive(Debug, Clone, Deserialize)]
pub struct MinAgeRequest {
    /// New minimum age in milliseconds
    pub millis: u64,
}

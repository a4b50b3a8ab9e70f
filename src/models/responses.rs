//! Response DTOs for the cache daemon API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use uuid::Uuid;

use crate::cache::{CacheStats, TypePolicy, TypeTag};

/// Response body for storing a document (PUT /entries)
#[derive(Debug, Clone, Serialize)]
pub struct PutEntryResponse {
    /// Success message
    pub message: String,
    /// The key that was stored
    pub key: Uuid,
}

impl PutEntryResponse {
    pub fn new(key: Uuid) -> Self {
        Self {
            message: format!("Key '{}' stored successfully", key),
            key,
        }
    }
}

/// Response body for the eviction passes (POST /maintenance/*)
#[derive(Debug, Clone, Serialize)]
pub struct SweepResponse {
    /// Entries removed by this pass
    pub removed: usize,
    /// Entries left in the cache
    pub total_entries: usize,
}

/// Response body for clearing the cache (DELETE /entries)
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    pub total_entries: usize,
}

impl ClearResponse {
    pub fn new(total_entries: usize) -> Self {
        Self {
            message: "Cache cleared".to_string(),
            total_entries,
        }
    }
}

/// One registered policy as exposed over HTTP
#[derive(Debug, Clone, Serialize)]
pub struct PolicyView {
    #[serde(rename = "type")]
    pub type_name: String,
    pub max_size: usize,
    pub max_age_secs: u64,
}

impl PolicyView {
    pub fn new(tag: &TypeTag, policy: &TypePolicy) -> Self {
        Self {
            type_name: tag.to_string(),
            max_size: policy.max_size,
            max_age_secs: policy.max_age.as_secs(),
        }
    }
}

/// Response body for the policy listing (GET /types)
#[derive(Debug, Clone, Serialize)]
pub struct PoliciesResponse {
    pub policies: Vec<PolicyView>,
}

/// Response body for the min-age endpoint (PUT /min-age)
#[derive(Debug, Clone, Serialize)]
pub struct MinAgeResponse {
    pub min_age_millis: u64,
}

impl MinAgeResponse {
    pub fn new(min_age: Duration) -> Self {
        Self {
            min_age_millis: min_age.as_millis() as u64,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of lookup hits
    pub hits: u64,
    /// Number of lookup misses
    pub misses: u64,
    /// Entries removed by pressure passes
    pub pressure_evictions: u64,
    /// Entries removed by clean passes
    pub expirations: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Current entries per type
    pub entries_by_type: BTreeMap<String, usize>,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Current minimum age in milliseconds
    pub min_age_millis: u64,
}

impl StatsResponse {
    /// Creates a new StatsResponse from cache statistics
    pub fn new(stats: CacheStats, min_age: Duration) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            pressure_evictions: stats.pressure_evictions,
            expirations: stats.expirations,
            total_entries: stats.total_entries,
            entries_by_type: stats.entries_by_type,
            min_age_millis: min_age.as_millis() as u64,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_entry_response_serialize() {
        let key = Uuid::new_v4();
        let json = serde_json::to_string(&PutEntryResponse::new(key)).unwrap();
        assert!(json.contains(&key.to_string()));
        assert!(json.contains("successfully"));
    }

    #[test]
    fn test_policy_view_serialize() {
        let view = PolicyView::new(
            &TypeTag::from("customer"),
            &TypePolicy::new(10, Some(Duration::from_secs(5))),
        );
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["type"], "customer");
        assert_eq!(json["max_size"], 10);
        assert_eq!(json["max_age_secs"], 5);
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            ..CacheStats::default()
        };
        let resp = StatsResponse::new(stats, Duration::from_secs(30));
        assert!((resp.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.min_age_millis, 30_000);
    }

    #[test]
    fn test_stats_response_zero_requests() {
        let resp = StatsResponse::new(CacheStats::default(), Duration::ZERO);
        assert_eq!(resp.hit_rate, 0.0);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}

//! Configuration Module
//!
//! Loads the daemon settings from environment variables and the cache policy
//! table from an optional JSON file.

use std::env;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::cache::{TypePolicy, TypeTag, DEFAULT_MAX_SIZE};

/// Daemon configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Seconds between `clean` passes
    pub clean_interval: u64,
    /// Seconds between `reduce_pressure` passes
    pub pressure_interval: u64,
    /// Initial minimum age in seconds
    pub min_age: u64,
    /// Path of the JSON policy file, if any
    pub policies_file: Option<String>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEAN_INTERVAL` - Seconds between expiry sweeps (default: 60)
    /// - `PRESSURE_INTERVAL` - Seconds between pressure passes (default: 30)
    /// - `MIN_AGE` - Initial minimum age in seconds (default: 30)
    /// - `CACHE_POLICIES` - Path of a JSON policy file (default: none)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            clean_interval: parse_var("CLEAN_INTERVAL").unwrap_or(defaults.clean_interval),
            pressure_interval: parse_var("PRESSURE_INTERVAL")
                .unwrap_or(defaults.pressure_interval),
            min_age: parse_var("MIN_AGE").unwrap_or(defaults.min_age),
            policies_file: env::var("CACHE_POLICIES").ok().filter(|p| !p.is_empty()),
        }
    }

    /// Loads the policy table named by `policies_file`, or the empty default.
    pub fn load_cache_config(&self) -> anyhow::Result<CacheConfig> {
        match &self.policies_file {
            Some(path) => CacheConfig::from_file(path),
            None => Ok(CacheConfig::default()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            clean_interval: 60,
            pressure_interval: 30,
            min_age: 30,
            policies_file: None,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

// == Cache Policy Configuration ==
/// Resolved policy table handed to the cache at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Register unknown types with the default policy on first write
    #[serde(default = "default_auto_register")]
    pub auto_register: bool,
    /// Configured cache target types
    #[serde(default)]
    pub types: Vec<CacheTypeConfig>,
}

/// One configured cache target type.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheTypeConfig {
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default = "default_max_size")]
    pub max_size: usize,
    #[serde(default)]
    pub max_age_secs: Option<u64>,
    /// Warm-up queries for the loader; the cache never runs them
    #[serde(default)]
    pub seed_queries: Vec<String>,
}

fn default_auto_register() -> bool {
    true
}

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            auto_register: default_auto_register(),
            types: Vec::new(),
        }
    }
}

impl CacheConfig {
    /// Reads and parses a JSON policy file.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("Failed to parse policy file {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        if let Some(blank) = config.types.iter().find(|t| t.type_name.trim().is_empty()) {
            anyhow::bail!("Cache type name cannot be empty (max_size {})", blank.max_size);
        }
        Ok(config)
    }

    /// The `(type, policy)` pairs the cache registers.
    pub fn policies(&self) -> Vec<(TypeTag, TypePolicy)> {
        self.types
            .iter()
            .map(|t| {
                (
                    TypeTag::from(t.type_name.as_str()),
                    TypePolicy::new(t.max_size, t.max_age_secs.map(Duration::from_secs)),
                )
            })
            .collect()
    }
}

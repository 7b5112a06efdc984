//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (FUZZCACHE_*)
//! 2. TOML config file (if FUZZCACHE_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::resolve::{MatchConfig, ResolverConfig};

mod validation;

pub use validation::ConfigError;

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (FUZZCACHE_*), nested fields separated by `__`
/// 2. TOML config file (if FUZZCACHE_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to SQLite cache database.
    ///
    /// Set via FUZZCACHE_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Namespace prefix for every cache key (`<prefix>:search:<variant>`).
    ///
    /// Set via FUZZCACHE_KEY_PREFIX environment variable.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Lifetime of a cached search result in seconds.
    ///
    /// Set via FUZZCACHE_CACHE_TTL_SECS environment variable.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Upper bound on stored entries kept by `fuzzcache purge`.
    ///
    /// Set via FUZZCACHE_MAX_ENTRIES environment variable.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    /// Base URL of the upstream search API.
    ///
    /// Set via FUZZCACHE_UPSTREAM_URL environment variable.
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,

    /// Number of results requested from the upstream API.
    ///
    /// Set via FUZZCACHE_RESULT_LIMIT environment variable.
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via FUZZCACHE_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via FUZZCACHE_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Fuzzy matching thresholds.
    ///
    /// Set via FUZZCACHE_MATCHING__* environment variables.
    #[serde(default)]
    pub matching: MatchConfig,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./fuzzcache.sqlite")
}

fn default_key_prefix() -> String {
    "fuzzcache".into()
}

fn default_cache_ttl_secs() -> u64 {
    1800 // 30 minutes
}

fn default_max_entries() -> usize {
    1000
}

fn default_upstream_url() -> String {
    "https://openlibrary.org".into()
}

fn default_result_limit() -> usize {
    3
}

fn default_user_agent() -> String {
    "fuzzcache/0.1".into()
}

fn default_timeout_ms() -> u64 {
    10_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            key_prefix: default_key_prefix(),
            cache_ttl_secs: default_cache_ttl_secs(),
            max_entries: default_max_entries(),
            upstream_url: default_upstream_url(),
            result_limit: default_result_limit(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            matching: MatchConfig::default(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Cache TTL as Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Resolver settings derived from this configuration.
    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig { key_prefix: self.key_prefix.clone(), ttl: self.cache_ttl(), matching: self.matching.clone() }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `FUZZCACHE_`
    /// 2. TOML file from `FUZZCACHE_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("FUZZCACHE_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("FUZZCACHE_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}

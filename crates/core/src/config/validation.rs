//! Post-load checks for `AppConfig`.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

fn ensure(ok: bool, field: &'static str, reason: &'static str) -> Result<(), ConfigError> {
    if ok { Ok(()) } else { Err(ConfigError::Invalid { field, reason }) }
}

impl AppConfig {
    /// Reject values the resolver, store or client cannot work with.
    ///
    /// Checks run in field order and the first failure is returned.
    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure(!self.key_prefix.trim().is_empty(), "key_prefix", "must not be empty")?;
        ensure(self.cache_ttl_secs > 0, "cache_ttl_secs", "must be greater than 0")?;
        ensure(self.max_entries > 0, "max_entries", "must be greater than 0")?;
        ensure((1..=100).contains(&self.result_limit), "result_limit", "must be between 1 and 100")?;
        ensure((100..=300_000).contains(&self.timeout_ms), "timeout_ms", "must be between 100 and 300000")?;
        ensure(!self.user_agent.is_empty(), "user_agent", "must not be empty")?;

        let matching = &self.matching;
        ensure(
            matching.min_word_overlap > 0.0 && matching.min_word_overlap <= 1.0,
            "matching.min_word_overlap",
            "must be in (0, 1]",
        )?;
        ensure(matching.max_candidates > 0, "matching.max_candidates", "must be greater than 0")?;

        if matching.max_word_distance > matching.max_edit_distance {
            tracing::warn!(
                max_word_distance = matching.max_word_distance,
                max_edit_distance = matching.max_edit_distance,
                "per-word distance exceeds whole-query distance"
            );
        }

        Ok(())
    }
}

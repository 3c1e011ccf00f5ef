//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound on status queries per job.
const MAX_POLL_ATTEMPTS: u32 = 500;

/// Upper bound on the delay between status queries (1 minute).
const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `poll_max_attempts` is 0 or exceeds 500
    /// - `poll_interval_ms` exceeds 1 minute
    /// - `user_agent` is empty
    /// - `base_url` is not an absolute http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.poll_max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "poll_max_attempts".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.poll_max_attempts > MAX_POLL_ATTEMPTS {
            return Err(ConfigError::Invalid {
                field: "poll_max_attempts".into(),
                reason: format!("must not exceed {MAX_POLL_ATTEMPTS}"),
            });
        }

        if self.poll_interval_ms > MAX_POLL_INTERVAL_MS {
            return Err(ConfigError::Invalid {
                field: "poll_interval_ms".into(),
                reason: "must not exceed 1 minute (60000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        match url::Url::parse(&self.base_url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
            Ok(parsed) => {
                return Err(ConfigError::Invalid {
                    field: "base_url".into(),
                    reason: format!("unsupported scheme: {}", parsed.scheme()),
                });
            }
            Err(e) => {
                return Err(ConfigError::Invalid { field: "base_url".into(), reason: e.to_string() });
            }
        }

        if self.key.is_some() != self.secret.is_some() {
            tracing::warn!(
                has_key = self.key.is_some(),
                has_secret = self.secret.is_some(),
                "only one of key/secret is set; submissions will be rejected until both are present"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_timeout_too_small() {
        let config = AppConfig { timeout_ms: 50, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_timeout_exceeds_limit() {
        let config = AppConfig { timeout_ms: 301_000, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "timeout_ms"));
    }

    #[test]
    fn test_validate_zero_attempts() {
        let config = AppConfig { poll_max_attempts: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "poll_max_attempts"));
    }

    #[test]
    fn test_validate_too_many_attempts() {
        let config = AppConfig { poll_max_attempts: 501, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "poll_max_attempts"));
    }

    #[test]
    fn test_validate_interval_exceeds_limit() {
        let config = AppConfig { poll_interval_ms: 60_001, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "poll_interval_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "user_agent"));
    }

    #[test]
    fn test_validate_bad_base_url() {
        let config = AppConfig { base_url: "ftp://web.archive.org".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "base_url"));

        let config = AppConfig { base_url: "not a url".into(), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "base_url"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig { timeout_ms: 100, poll_max_attempts: 1, poll_interval_ms: 0, ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_values() {
        let config =
            AppConfig { timeout_ms: 300_000, poll_max_attempts: 500, poll_interval_ms: 60_000, ..Default::default() };
        assert!(config.validate().is_ok());
    }
}

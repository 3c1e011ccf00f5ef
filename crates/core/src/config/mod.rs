//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (WAYBACK_*)
//! 2. TOML config file (if WAYBACK_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Environment variable prefix for every setting.
pub const ENV_PREFIX: &str = "WAYBACK_";

/// Environment variable naming an optional TOML config file.
pub const CONFIG_FILE_ENV: &str = "WAYBACK_CONFIG_FILE";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (WAYBACK_*)
/// 2. TOML config file (if WAYBACK_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Save Page Now access key.
    ///
    /// Set via WAYBACK_KEY environment variable.
    #[serde(default)]
    pub key: Option<String>,

    /// Save Page Now secret.
    ///
    /// Set via WAYBACK_SECRET environment variable.
    #[serde(default)]
    pub secret: Option<String>,

    /// Base URL of the archiving service.
    ///
    /// Set via WAYBACK_BASE_URL environment variable.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via WAYBACK_USER_AGENT environment variable.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request HTTP timeout in milliseconds.
    ///
    /// Set via WAYBACK_TIMEOUT_MS environment variable.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum number of job status queries before giving up.
    ///
    /// Set via WAYBACK_POLL_MAX_ATTEMPTS environment variable.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Delay between two job status queries, in milliseconds.
    ///
    /// Set via WAYBACK_POLL_INTERVAL_MS environment variable.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://web.archive.org".into()
}

fn default_user_agent() -> String {
    "wayback-archive/0.1".into()
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_poll_max_attempts() -> u32 {
    30
}

fn default_poll_interval_ms() -> u64 {
    3_000
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            key: None,
            secret: None,
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

/// Access key and secret pair for the `LOW` authorization scheme.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub key: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self { key: key.into(), secret: secret.into() }
    }

    /// Value of the `Authorization` header.
    pub fn authorization(&self) -> String {
        format!("LOW {}:{}", self.key, self.secret)
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials").field("key", &self.key).field("secret", &"***").finish()
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as Duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `WAYBACK_`
    /// 2. TOML file from `WAYBACK_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var(CONFIG_FILE_ENV) {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed(ENV_PREFIX)
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        )
    }

    /// Extract and validate a configuration from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the credentials, failing when either half is missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the absent field.
    pub fn require_credentials(&self) -> Result<Credentials, ConfigError> {
        let key = self.key.as_deref().filter(|k| !k.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "key".into(),
            hint: "Set WAYBACK_KEY environment variable".into(),
        })?;
        let secret = self.secret.as_deref().filter(|s| !s.is_empty()).ok_or_else(|| ConfigError::Missing {
            field: "secret".into(),
            hint: "Set WAYBACK_SECRET environment variable".into(),
        })?;

        Ok(Credentials::new(key, secret))
    }
}

//! Process-wide configuration, built once at startup and passed down.
//!
//! Precedence: defaults → optional TOML file → environment variables.
//! Nothing else in the crate reads the environment.

use crate::auth::normalize_optional;
use crate::client::retry::{DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY};
use crate::client::{DEFAULT_RATE_LIMIT_WARNING_THRESHOLD, DEFAULT_TIMEOUT, RetryPolicy};
use crate::error::config::ConfigError;
use crate::{APP_NAME, GITHUB_API_BASE_URL, USER_AGENT};

use common::{ErrorLocation, RedactedToken};

use std::env;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;

const CONFIG_FILE_NAME: &str = "config.toml";

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";
pub const DEBUG_ENV: &str = "GH_AGENT_DEBUG";
pub const API_URL_ENV: &str = "GITHUB_API_URL";

// ============================================
// CONFIG STRUCTS
// ============================================

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_rate_limit_warning_threshold")]
    pub rate_limit_warning_threshold: u32,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub debug: bool,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Only ever populated from the environment, never from the file.
    #[serde(skip)]
    pub token: Option<RedactedToken>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            rate_limit_warning_threshold: default_rate_limit_warning_threshold(),
            retry: RetryConfig::default(),
            debug: false,
            log_file: None,
            token: None,
        }
    }
}

// ============================================
// DEFAULT FUNCTIONS
// ============================================

fn default_api_base_url() -> String {
    GITHUB_API_BASE_URL.to_string()
}
fn default_user_agent() -> String {
    USER_AGENT.to_string()
}
fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT.as_millis() as u64
}
fn default_rate_limit_warning_threshold() -> u32 {
    DEFAULT_RATE_LIMIT_WARNING_THRESHOLD
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_base_delay_ms() -> u64 {
    DEFAULT_BASE_DELAY.as_millis() as u64
}
fn default_max_delay_ms() -> u64 {
    DEFAULT_MAX_DELAY.as_millis() as u64
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ============================================
// IMPLEMENTATION
// ============================================

impl AppConfig {
    /// Build the configuration for this process.
    ///
    /// Loads `.env` (if any), then the config file (`config_path`, or the
    /// default location when it exists), then applies environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an explicitly given file is missing, a file
    /// exists but cannot be read or parsed, or the result fails validation.
    #[track_caller]
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        try_load_dotenv();

        let mut config = match config_path {
            Some(path) => Self::load_from_path(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_path(&path)?,
                Some(path) => {
                    debug!("Config file not found at {}, using defaults", path.display());
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_env(|key| env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// `{config_dir}/gh-agent/config.toml`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from a specific TOML file.
    #[track_caller]
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let location = ErrorLocation::from(Location::caller());

        let contents = std::fs::read_to_string(path).map_err(|e| {
            warn!("Failed to read config file {}: {}", path.display(), e);
            ConfigError::ReadError {
                location,
                path: path.to_path_buf(),
                source: e,
            }
        })?;

        let config: AppConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            location,
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = normalize_optional(lookup(TOKEN_ENV).as_deref()) {
            self.token = Some(token);
        }

        if let Some(debug) = lookup(DEBUG_ENV) {
            self.debug = is_truthy(&debug);
        }

        if let Some(url) = lookup(API_URL_ENV).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.retry.max_attempts,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
        }
    }

    /// Validate config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!("Invalid API base URL: {}", self.api_base_url),
            });
        }

        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "user_agent cannot be empty".to_string(),
            });
        }

        if self.timeout_ms == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "timeout_ms must be greater than 0".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: "retry.max_attempts must be at least 1".to_string(),
            });
        }

        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::ValidationError {
                location: ErrorLocation::from(Location::caller()),
                reason: format!(
                    "retry.base_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                    self.retry.base_delay_ms, self.retry.max_delay_ms
                ),
            });
        }

        Ok(())
    }
}

/// Load `.env` from the working directory, if there is one.
fn try_load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => info!("Loaded .env from: {:?}", path),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to parse .env: {}", e),
    }
}

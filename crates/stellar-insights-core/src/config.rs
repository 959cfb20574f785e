//! Configuration management for Stellar Insights

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Prefix for environment overrides, e.g. `STELLAR_INSIGHTS_SERVER__PORT`
pub const ENV_PREFIX: &str = "STELLAR_INSIGHTS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct Config {
    /// Web server configuration
    #[serde(default)]
    #[validate(nested)]
    pub server: ServerConfig,

    /// Analytics source configuration
    #[serde(default)]
    #[validate(nested)]
    pub source: SourceConfig,

    /// Logging configuration
    #[serde(default)]
    #[validate(nested)]
    pub logging: LoggingConfig,
}

/// Web server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    #[validate(length(min = 1, message = "host must not be empty"))]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where and how to fetch the dashboard snapshot
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SourceConfig {
    /// Base URL of the analytics service
    #[serde(default = "default_base_url")]
    #[validate(url(message = "base_url must be an absolute URL"))]
    pub base_url: String,

    /// Path of the dashboard endpoint, appended to `base_url`
    #[serde(default = "default_dashboard_path")]
    #[validate(length(min = 1, message = "dashboard_path must not be empty"))]
    pub dashboard_path: String,

    /// API key sent as `X-API-Key`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Upper bound for a single fetch, in milliseconds
    #[serde(default = "default_request_timeout_ms")]
    #[validate(range(
        min = 1,
        max = 600_000,
        message = "request_timeout_ms must be between 1 and 600000"
    ))]
    pub request_timeout_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    #[validate(length(min = 1, message = "level must not be empty"))]
    pub level: String,

    /// Log format (json or text)
    #[serde(default = "default_log_format")]
    #[validate(custom(function = "validate_log_format"))]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    3000
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_dashboard_path() -> String {
    "/api/analytics/dashboard".to_string()
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

fn validate_log_format(format: &str) -> Result<(), validator::ValidationError> {
    match format {
        "json" | "text" => Ok(()),
        _ => {
            let mut error = validator::ValidationError::new("log_format");
            error.message = Some("format must be \"json\" or \"text\"".into());
            Err(error)
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            dashboard_path: default_dashboard_path(),
            api_key: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SourceConfig {
    /// Full URL of the dashboard endpoint
    pub fn dashboard_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.dashboard_path.starts_with('/') {
            format!("{base}{}", self.dashboard_path)
        } else {
            format!("{base}/{}", self.dashboard_path)
        }
    }

    /// Fetch timeout as a [`std::time::Duration`]
    pub const fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout_ms)
    }
}

impl Config {
    /// Load configuration from an optional `config` file in the working
    /// directory and `STELLAR_INSIGHTS_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded, parsed or validated.
    pub fn load() -> crate::Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the default `config` file
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is missing or invalid, or if the merged
    /// configuration fails validation.
    pub fn load_from(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}

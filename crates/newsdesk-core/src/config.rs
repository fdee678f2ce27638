//! Configuration management for the NewsDesk admin console

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend API configuration
    pub api: ApiConfig,

    /// Session persistence configuration
    #[serde(default)]
    pub session: SessionConfig,

    /// Console behavior configuration
    #[serde(default)]
    pub console: ConsoleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the publishing backend, including the API prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Page size used for every collection listing
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

/// Session persistence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Path of the JSON file holding the auth token between runs
    #[serde(default = "default_session_file")]
    pub file: PathBuf,
}

/// Console behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Quiet period applied to filter keystrokes before a fetch, in
    /// milliseconds
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// How long a successful edit stays on screen before the editor
    /// closes, in milliseconds
    #[serde(default = "default_success_display_ms")]
    pub success_display_ms: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path; the terminal belongs to the UI, so logs never go to
    /// stdout
    #[serde(default = "default_log_file")]
    pub file: PathBuf,
}

fn default_base_url() -> String {
    "http://localhost:3000/api/v1".to_string()
}

const fn default_timeout() -> u64 {
    30
}

const fn default_page_size() -> u32 {
    10
}

fn default_session_file() -> PathBuf {
    PathBuf::from("newsdesk-session.json")
}

const fn default_debounce_ms() -> u64 {
    400
}

const fn default_success_display_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> PathBuf {
    PathBuf::from("newsdesk.log")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            page_size: default_page_size(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            success_display_ms: default_success_display_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        // Base URL may come from the environment even when no config file
        // is present
        let base_url =
            std::env::var("NEWSDESK_API_BASE_URL").unwrap_or_else(|_| default_base_url());

        Self {
            api: ApiConfig {
                base_url,
                timeout_secs: default_timeout(),
                page_size: default_page_size(),
            },
            session: SessionConfig::default(),
            console: ConsoleConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment and files
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or parsed.
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("newsdesk").required(false))
            .add_source(config::Environment::with_prefix("NEWSDESK").separator("_"))
            .build()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })?;

        config
            .try_deserialize()
            .map_err(|e| crate::Error::Configuration {
                message: e.to_string(),
            })
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api.page_size, 10);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.console.debounce_ms, 400);
        assert_eq!(config.console.success_display_ms, 2000);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let serialized = serde_json::to_string(&config).unwrap();
        let deserialized: Config = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized.api.base_url, config.api.base_url);
        assert_eq!(deserialized.console.debounce_ms, config.console.debounce_ms);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"api": {"base_url": "https://api.example.org/v1"}}"#)
                .unwrap();
        assert_eq!(config.api.base_url, "https://api.example.org/v1");
        assert_eq!(config.api.page_size, 10);
        assert_eq!(config.console.debounce_ms, 400);
    }
}

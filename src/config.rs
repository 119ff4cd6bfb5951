//! Notifier configuration
//!
//! Loaded from YAML, then overridden by `NOTIFIER_BASE_URL` and
//! `NOTIFIER_LOG_LEVEL` when set.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

pub const BASE_URL_ENV: &str = "NOTIFIER_BASE_URL";
pub const LOG_LEVEL_ENV: &str = "NOTIFIER_LOG_LEVEL";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Notification listener configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotifierConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub reconnect: ReconnectConfig,
    #[serde(default)]
    pub notifications: NotificationsConfig,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Where the push endpoint lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Backend origin, `http(s)://` or `ws(s)://`
    pub base_url: String,
    #[serde(default = "default_path")]
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectConfig {
    pub base_delay_ms: u64,
    pub max_attempts: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub auto_close_ms: u64,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_path() -> String {
    "/ws/notifications".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            path: default_path(),
        }
    }
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 3000,
            max_attempts: 5,
        }
    }
}

impl Default for NotificationsConfig {
    fn default() -> Self {
        Self {
            auto_close_ms: 5000,
        }
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            reconnect: ReconnectConfig::default(),
            notifications: NotificationsConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl ReconnectConfig {
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }
}

impl NotificationsConfig {
    pub fn auto_close(&self) -> Duration {
        Duration::from_millis(self.auto_close_ms)
    }
}

impl NotifierConfig {
    /// Load configuration from a YAML file, apply env overrides and validate
    pub fn load(config_path: impl AsRef<Path>) -> Result<Self> {
        let yaml_content = std::fs::read_to_string(config_path)?;
        let config: NotifierConfig = serde_yaml::from_str(&yaml_content)?;
        config.finish()
    }

    /// Like [`load`](Self::load), but falls back to defaults when the file is missing
    pub fn load_or_default(config_path: impl AsRef<Path>) -> Result<Self> {
        let config_path = config_path.as_ref();
        if config_path.exists() {
            Self::load(config_path)
        } else {
            Self::default().finish()
        }
    }

    fn finish(mut self) -> Result<Self> {
        self.apply_overrides(
            std::env::var(BASE_URL_ENV).ok(),
            std::env::var(LOG_LEVEL_ENV).ok(),
        );
        self.validate()?;
        Ok(self)
    }

    /// Replace file values with explicitly provided ones
    pub fn apply_overrides(&mut self, base_url: Option<String>, log_level: Option<String>) {
        if let Some(base_url) = base_url.filter(|v| !v.trim().is_empty()) {
            self.server.base_url = base_url;
        }
        if let Some(log_level) = log_level.filter(|v| !v.trim().is_empty()) {
            self.log_level = log_level;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let base = self.server.base_url.trim();
        if base.is_empty() {
            return Err(ConfigError::ValidationError(
                "server.base_url must not be empty".to_string(),
            ));
        }
        if websocket_origin(base).is_none() {
            return Err(ConfigError::ValidationError(format!(
                "server.base_url must start with http://, https://, ws:// or wss://, got '{}'",
                base
            )));
        }

        if !self.server.path.starts_with('/') {
            return Err(ConfigError::ValidationError(
                "server.path must start with '/'".to_string(),
            ));
        }

        if self.reconnect.base_delay_ms == 0 {
            return Err(ConfigError::ValidationError(
                "reconnect.base_delay_ms must be greater than 0".to_string(),
            ));
        }

        if self.reconnect.max_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "reconnect.max_attempts must be greater than 0".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "log_level must be one of {:?}, got '{}'",
                LOG_LEVELS, self.log_level
            )));
        }

        Ok(())
    }

    /// WebSocket URL of the push endpoint
    ///
    /// An `http`/`https` origin maps to `ws`/`wss`, the same way a browser
    /// resolves a same-origin socket.
    pub fn endpoint_url(&self) -> String {
        let base = self.server.base_url.trim().trim_end_matches('/');
        let origin = websocket_origin(base).unwrap_or_else(|| base.to_string());
        format!("{}{}", origin, self.server.path)
    }

    /// Log the effective configuration
    pub fn log(&self) {
        info!("Notifier configuration:");
        info!("  Endpoint: {}", self.endpoint_url());
        info!(
            "  Reconnect: {}ms linear steps, {} attempts",
            self.reconnect.base_delay_ms, self.reconnect.max_attempts
        );
        info!("  Notification auto-close: {}ms", self.notifications.auto_close_ms);
        info!("  Log level: {}", self.log_level);
    }
}

fn websocket_origin(base: &str) -> Option<String> {
    [
        ("https://", "wss://"),
        ("http://", "ws://"),
        ("wss://", "wss://"),
        ("ws://", "ws://"),
    ]
    .iter()
    .find_map(|&(from, to)| base.strip_prefix(from).map(|rest| format!("{}{}", to, rest)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = NotifierConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reconnect.base_delay(), Duration::from_secs(3));
        assert_eq!(config.reconnect.max_attempts, 5);
        assert_eq!(config.notifications.auto_close(), Duration::from_secs(5));
        assert_eq!(config.endpoint_url(), "ws://localhost:8000/ws/notifications");
    }

    #[test]
    fn test_endpoint_url_scheme_mapping() {
        let mut config = NotifierConfig::default();

        config.server.base_url = "https://shelf.example.com/".to_string();
        assert_eq!(config.endpoint_url(), "wss://shelf.example.com/ws/notifications");

        config.server.base_url = "ws://10.0.0.2:9000".to_string();
        config.server.path = "/push".to_string();
        assert_eq!(config.endpoint_url(), "ws://10.0.0.2:9000/push");
    }

    #[test]
    fn test_overrides_replace_file_values() {
        let mut config = NotifierConfig::default();
        config.apply_overrides(Some("https://prod.example.com".to_string()), None);
        assert_eq!(config.server.base_url, "https://prod.example.com");
        assert_eq!(config.log_level, "info");

        config.apply_overrides(Some("  ".to_string()), Some("debug".to_string()));
        assert_eq!(config.server.base_url, "https://prod.example.com");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = NotifierConfig::default();
        config.server.base_url = "ftp://example.com".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));

        let mut config = NotifierConfig::default();
        config.server.path = "ws/notifications".to_string();
        assert!(config.validate().is_err());

        let mut config = NotifierConfig::default();
        config.reconnect.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = NotifierConfig::default();
        config.reconnect.base_delay_ms = 0;
        assert!(config.validate().is_err());

        let mut config = NotifierConfig::default();
        config.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "server:\n  base_url: \"https://shelf.example.com\"\n";
        let config: NotifierConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.server.path, "/ws/notifications");
        assert_eq!(config.reconnect, ReconnectConfig::default());
        assert_eq!(config.log_level, "info");
    }
}

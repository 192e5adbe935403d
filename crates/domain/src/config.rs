//! Configuration structures
//!
//! Plain serde structs; loading lives in `trainhub-infra::config`.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_MAX_CREDENTIAL_REFRESHES,
    DEFAULT_READ_TIMEOUT_SECS, DEFAULT_STORE_FILE, DEFAULT_USER_AGENT, DEFAULT_WRITE_TIMEOUT_SECS,
};

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API settings shared by every transport client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL every endpoint path is resolved against. Must end with `/`
    /// for relative paths to nest under it.
    pub base_url: String,
    pub connect_timeout_secs: u64,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
    /// How many silent token refreshes a single `send` may perform.
    pub max_credential_refreshes: u32,
    pub user_agent: String,
}

impl ApiConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            read_timeout_secs: DEFAULT_READ_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_WRITE_TIMEOUT_SECS,
            max_credential_refreshes: DEFAULT_MAX_CREDENTIAL_REFRESHES,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Encrypted local store settings
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    /// Inline SQLCipher key. When absent the key comes from the OS keyring.
    pub encryption_key: Option<String>,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("path", &self.path)
            .field("encryption_key", &self.encryption_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { path: PathBuf::from(DEFAULT_STORE_FILE), encryption_key: None }
    }
}

/// Log output format options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON lines for log shipping
    Json,
    /// Human readable, multi-field output
    #[default]
    Pretty,
    /// Single-line output
    Compact,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `info` or `trainhub_infra=debug`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: LogFormat::Pretty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_defaults_use_thirty_second_timeouts() {
        let api = ApiConfig::default();
        assert_eq!(api.connect_timeout(), Duration::from_secs(30));
        assert_eq!(api.read_timeout(), Duration::from_secs(30));
        assert_eq!(api.write_timeout(), Duration::from_secs(30));
        assert_eq!(api.max_credential_refreshes, 1);
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config: Config = serde_json::from_str(r#"{"api":{"base_url":"http://localhost/"}}"#)
            .expect("partial config parses");
        assert_eq!(config.api.base_url, "http://localhost/");
        assert_eq!(config.api.read_timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn storage_debug_hides_key() {
        let storage =
            StorageConfig { path: PathBuf::from("x.db"), encryption_key: Some("secret".into()) };
        let rendered = format!("{storage:?}");
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}

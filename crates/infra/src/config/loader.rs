//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Environment variables, when `TRAINHUB_API_BASE_URL` is set
//! 2. Otherwise the first config file found by [`probe_config_paths`]
//! 3. Otherwise built-in defaults
//!
//! ## Environment Variables
//! - `TRAINHUB_API_BASE_URL`: backend base URL (required for env loading)
//! - `TRAINHUB_API_CONNECT_TIMEOUT`: connect timeout in seconds
//! - `TRAINHUB_API_READ_TIMEOUT`: read timeout in seconds
//! - `TRAINHUB_API_WRITE_TIMEOUT`: write timeout in seconds
//! - `TRAINHUB_API_MAX_REFRESHES`: silent token refreshes allowed per request
//! - `TRAINHUB_STORE_PATH`: encrypted store file
//! - `TRAINHUB_STORE_KEY`: inline store key (skips the OS keyring)
//! - `TRAINHUB_LOG_LEVEL`: tracing filter directive
//! - `TRAINHUB_LOG_FORMAT`: `pretty`, `compact` or `json`
//!
//! ## File Locations
//! `trainhub.toml`, `trainhub.json`, `config.toml`, `config.json` in the
//! working directory, then its parent and grandparent, then next to the
//! executable.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use trainhub_domain::{ApiConfig, Config, LogFormat, LoggingConfig, Result, StorageConfig, TrainHubError};

const CONFIG_FILE_NAMES: [&str; 4] = ["trainhub.toml", "trainhub.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `TrainHubError::Config` if a source is present but invalid.
pub fn load() -> Result<Config> {
    if std::env::var_os("TRAINHUB_API_BASE_URL").is_some() {
        let config = load_from_env()?;
        tracing::info!("Configuration loaded from environment variables");
        return Ok(config);
    }

    match probe_config_paths() {
        Some(path) => load_from_file(Some(path)),
        None => {
            tracing::info!("No configuration found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Load configuration from environment variables
///
/// `TRAINHUB_API_BASE_URL` is required; everything else falls back to its
/// default.
///
/// # Errors
/// Returns `TrainHubError::Config` if the base URL is missing or a value
/// does not parse.
pub fn load_from_env() -> Result<Config> {
    let defaults = ApiConfig::default();

    let api = ApiConfig {
        base_url: env_var("TRAINHUB_API_BASE_URL")?,
        connect_timeout_secs: env_parse("TRAINHUB_API_CONNECT_TIMEOUT")?
            .unwrap_or(defaults.connect_timeout_secs),
        read_timeout_secs: env_parse("TRAINHUB_API_READ_TIMEOUT")?
            .unwrap_or(defaults.read_timeout_secs),
        write_timeout_secs: env_parse("TRAINHUB_API_WRITE_TIMEOUT")?
            .unwrap_or(defaults.write_timeout_secs),
        max_credential_refreshes: env_parse("TRAINHUB_API_MAX_REFRESHES")?
            .unwrap_or(defaults.max_credential_refreshes),
        user_agent: defaults.user_agent,
    };

    let storage_defaults = StorageConfig::default();
    let storage = StorageConfig {
        path: std::env::var("TRAINHUB_STORE_PATH")
            .map(PathBuf::from)
            .unwrap_or(storage_defaults.path),
        encryption_key: std::env::var("TRAINHUB_STORE_KEY").ok().filter(|k| !k.is_empty()),
    };

    let logging_defaults = LoggingConfig::default();
    let logging = LoggingConfig {
        level: std::env::var("TRAINHUB_LOG_LEVEL").unwrap_or(logging_defaults.level),
        format: match std::env::var("TRAINHUB_LOG_FORMAT") {
            Ok(raw) => LogFormat::from_str(&raw).map_err(TrainHubError::Config)?,
            Err(_) => logging_defaults.format,
        },
    };

    Ok(Config { api, storage, logging })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `TrainHubError::Config` if the file is missing, unreadable or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(TrainHubError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            TrainHubError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| TrainHubError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Format is picked by extension: `.toml` or `.json`.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| TrainHubError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| TrainHubError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(TrainHubError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// First existing config file, or `None`.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        dirs.extend(cwd.ancestors().take(3).map(Path::to_path_buf));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            dirs.push(exe_dir.to_path_buf());
        }
    }

    probe_dirs(&dirs)
}

fn probe_dirs(dirs: &[PathBuf]) -> Option<PathBuf> {
    dirs.iter()
        .flat_map(|dir| CONFIG_FILE_NAMES.iter().map(move |name| dir.join(name)))
        .find(|path| path.is_file())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| TrainHubError::Config(format!("Missing required environment variable: {key}")))
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| TrainHubError::Config(format!("Invalid value for {key}: {e}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::Duration;

    use tempfile::TempDir;

    use super::*;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ENV_KEYS: [&str; 9] = [
        "TRAINHUB_API_BASE_URL",
        "TRAINHUB_API_CONNECT_TIMEOUT",
        "TRAINHUB_API_READ_TIMEOUT",
        "TRAINHUB_API_WRITE_TIMEOUT",
        "TRAINHUB_API_MAX_REFRESHES",
        "TRAINHUB_STORE_PATH",
        "TRAINHUB_STORE_KEY",
        "TRAINHUB_LOG_LEVEL",
        "TRAINHUB_LOG_FORMAT",
    ];

    fn clear_env() {
        for key in ENV_KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn env_overrides_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        std::env::set_var("TRAINHUB_API_BASE_URL", "http://localhost:8080/api/");
        std::env::set_var("TRAINHUB_API_READ_TIMEOUT", "12");
        std::env::set_var("TRAINHUB_API_MAX_REFRESHES", "2");
        std::env::set_var("TRAINHUB_STORE_PATH", "/tmp/trainhub-test.db");
        std::env::set_var("TRAINHUB_STORE_KEY", "inline-key");
        std::env::set_var("TRAINHUB_LOG_FORMAT", "json");

        let config = load_from_env().unwrap();
        clear_env();

        assert_eq!(config.api.base_url, "http://localhost:8080/api/");
        assert_eq!(config.api.read_timeout(), Duration::from_secs(12));
        assert_eq!(config.api.connect_timeout_secs, 30);
        assert_eq!(config.api.max_credential_refreshes, 2);
        assert_eq!(config.storage.path, PathBuf::from("/tmp/trainhub-test.db"));
        assert_eq!(config.storage.encryption_key.as_deref(), Some("inline-key"));
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn env_requires_base_url() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        let err = load_from_env().unwrap_err();
        assert!(matches!(err, TrainHubError::Config(_)));
    }

    #[test]
    fn env_rejects_bad_numbers() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        std::env::set_var("TRAINHUB_API_BASE_URL", "http://localhost/");
        std::env::set_var("TRAINHUB_API_CONNECT_TIMEOUT", "soon");
        let result = load_from_env();
        clear_env();

        match result {
            Err(TrainHubError::Config(msg)) => assert!(msg.contains("TRAINHUB_API_CONNECT_TIMEOUT")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn env_rejects_unknown_log_format() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();

        std::env::set_var("TRAINHUB_API_BASE_URL", "http://localhost/");
        std::env::set_var("TRAINHUB_LOG_FORMAT", "xml");
        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(TrainHubError::Config(_))));
    }

    #[test]
    fn parses_toml_by_extension() {
        let contents = r#"
[api]
base_url = "https://staging.trainhub.app/api/"
max_credential_refreshes = 0

[logging]
format = "compact"
"#;
        let config = parse_config(contents, Path::new("trainhub.toml")).unwrap();
        assert_eq!(config.api.base_url, "https://staging.trainhub.app/api/");
        assert_eq!(config.api.max_credential_refreshes, 0);
        assert_eq!(config.api.write_timeout_secs, 30);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn rejects_unsupported_extension() {
        let err = parse_config("", Path::new("config.yaml")).unwrap_err();
        assert!(matches!(err, TrainHubError::Config(msg) if msg.contains("yaml")));
    }

    #[test]
    fn probe_prefers_trainhub_toml() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        std::fs::write(dir.path().join("trainhub.toml"), "").unwrap();

        let found = probe_dirs(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(found.file_name().unwrap(), "trainhub.toml");
    }

    #[test]
    fn probe_walks_directories_in_order() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        std::fs::write(second.path().join("config.json"), "{}").unwrap();

        let found =
            probe_dirs(&[first.path().to_path_buf(), second.path().to_path_buf()]).unwrap();
        assert_eq!(found, second.path().join("config.json"));
    }
}

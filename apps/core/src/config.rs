use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hotkey::parse_hotkey;
use crate::query_dsl::QueryOptions;

const APP_DIR_NAME: &str = "docseek";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid toml config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("invalid json5 config: {0}")]
    Json5(#[from] json5::Error),
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    pub index: String,
    pub debounce_ms: u64,
    pub max_results: u16,
    pub metadata_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,
    pub hotkey: String,
    #[serde(skip)]
    pub config_path: PathBuf,
    #[serde(skip)]
    pub log_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:9200".to_string(),
            index: "test".to_string(),
            debounce_ms: 500,
            max_results: 20,
            metadata_match: true,
            request_timeout_ms: None,
            hotkey: "Ctrl+Shift+/".to_string(),
            config_path: default_config_path(),
            log_dir: stable_app_data_dir().join("logs"),
        }
    }
}

impl Config {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            size: self.max_results as usize,
            metadata_match: self.metadata_match,
        }
    }
}

pub fn stable_app_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

/// Missing file means defaults; a present file is parsed by extension
/// (`.json`/`.json5` via json5, anything else as TOML) and validated.
pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(default_config_path);

    if !config_path.exists() {
        return Ok(Config {
            config_path,
            ..Config::default()
        });
    }

    let raw = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Io {
        path: config_path.clone(),
        source,
    })?;

    let mut config: Config = match extension_of(&config_path).as_deref() {
        Some("json") | Some("json5") => json5::from_str(&raw)?,
        _ => toml::from_str(&raw)?,
    };
    config.config_path = config_path;
    validate(&config)?;
    Ok(config)
}

pub fn save(config: &Config) -> Result<(), ConfigError> {
    validate(config)?;
    if let Some(parent) = config.config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let encoded = toml::to_string_pretty(config)?;
    std::fs::write(&config.config_path, encoded).map_err(|source| ConfigError::Io {
        path: config.config_path.clone(),
        source,
    })
}

pub fn validate(cfg: &Config) -> Result<(), ConfigError> {
    let endpoint = Url::parse(&cfg.endpoint)
        .map_err(|error| invalid(format!("endpoint '{}' is not a url: {error}", cfg.endpoint)))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "endpoint scheme must be http or https, got '{}'",
            endpoint.scheme()
        )));
    }

    if cfg.index.trim().is_empty() || cfg.index.contains('/') {
        return Err(invalid("index must be a non-empty name without '/'"));
    }

    if cfg.debounce_ms > 5_000 {
        return Err(invalid("debounce_ms out of range"));
    }

    if !(5..=100).contains(&cfg.max_results) {
        return Err(invalid("max_results out of range"));
    }

    if let Some(timeout) = cfg.request_timeout_ms {
        if !(100..=120_000).contains(&timeout) {
            return Err(invalid("request_timeout_ms out of range"));
        }
    }

    parse_hotkey(&cfg.hotkey).map_err(|error| invalid(format!("hotkey: {error}")))?;

    if cfg.config_path.as_os_str().is_empty() {
        return Err(invalid("config_path is required"));
    }

    Ok(())
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid(message.into())
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const API_KEY_ENV: &str = "CLOCKIFY_API_KEY";
pub const WORKSPACE_ID_ENV: &str = "CLOCKIFY_WORKSPACE_ID";
pub const BASE_URL_ENV: &str = "CLOCKIFY_BASE_URL";

const APP_DIR: &str = "clockify-tui";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockifyConfig {
    /// Personal API key from the Clockify profile settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Falls back to the user's active workspace when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// How long projects, tasks and tags are reused before refetching.
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Log filter used when `RUST_LOG` is not set, e.g. "debug".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_base_url() -> String {
    clockify::DEFAULT_BASE_URL.to_string()
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ClockifyConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            workspace_id: None,
            base_url: default_base_url(),
            cache_ttl_secs: default_cache_ttl_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API key configured; set {API_KEY_ENV} or api_key in the config file")]
    MissingApiKey,
    #[error("base_url must not be empty")]
    EmptyBaseUrl,
}

impl ClockifyConfig {
    pub fn config_path() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join(APP_DIR)
            .join("config.toml"))
    }

    pub fn log_dir() -> Result<PathBuf> {
        Ok(dirs::data_local_dir()
            .context("Cannot determine local data directory")?
            .join(APP_DIR))
    }

    /// Load config from disk and apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Returns default config if the file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Self = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        Ok(config)
    }

    /// Non-empty environment values win over the file.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(api_key) = lookup(API_KEY_ENV) {
            self.api_key = Some(api_key);
        }
        if let Some(workspace_id) = lookup(WORKSPACE_ID_ENV) {
            self.workspace_id = Some(workspace_id);
        }
        if let Some(base_url) = lookup(BASE_URL_ENV) {
            self.base_url = base_url;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(()),
            _ => Err(ConfigError::MissingApiKey),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Write the default config to `path` unless a file is already there.
    /// Returns whether a file was written.
    pub fn write_default_if_missing(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(&Self::default())?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config at {}", path.display()))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let config = ClockifyConfig::load_from(&dir.path().join("config.toml")).unwrap();

        assert_eq!(config, ClockifyConfig::default());
        assert_eq!(config.base_url, "https://api.clockify.me/api/v1");
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "api_key = \"abc\"\ncache_ttl_secs = 60\n").unwrap();

        let config = ClockifyConfig::load_from(&path).unwrap();

        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "cache_ttl_secs = \"soon\"").unwrap();

        assert!(ClockifyConfig::load_from(&path).is_err());
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut config = ClockifyConfig {
            api_key: Some("from-file".to_string()),
            ..ClockifyConfig::default()
        };

        config.apply_env(env(&[
            (API_KEY_ENV, "from-env"),
            (WORKSPACE_ID_ENV, "ws-1"),
            (BASE_URL_ENV, ""),
        ]));

        assert_eq!(config.api_key.as_deref(), Some("from-env"));
        assert_eq!(config.workspace_id.as_deref(), Some("ws-1"));
        assert_eq!(config.base_url, clockify::DEFAULT_BASE_URL);
    }

    #[test]
    fn validation_requires_key_and_base_url() {
        let mut config = ClockifyConfig::default();
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));

        config.api_key = Some("  ".to_string());
        assert_eq!(config.validate(), Err(ConfigError::MissingApiKey));

        config.api_key = Some("key".to_string());
        assert_eq!(config.validate(), Ok(()));

        config.base_url = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn default_file_is_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        assert!(ClockifyConfig::write_default_if_missing(&path).unwrap());
        assert!(!ClockifyConfig::write_default_if_missing(&path).unwrap());
        assert_eq!(
            ClockifyConfig::load_from(&path).unwrap(),
            ClockifyConfig::default()
        );
    }
}

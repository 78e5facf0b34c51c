//! Process configuration: backend selection, credentials, timeouts.
//!
//! Loaded once at startup and passed by value to whoever needs it.
//! Nothing here is global.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

/// Name of the config file looked up in the working directory and the
/// user config directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Sub-directory of the user config directory.
pub const APP_DIR_NAME: &str = "scaffold-ai";

/// Environment variable consulted when `gemini.api_key` is empty.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default generation timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Error while loading or validating configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file.
///
/// Unknown sections are ignored, so older files that still carry a
/// `database` block keep loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backend identifier handed to the gateway factory.
    pub backend: String,

    /// Seconds to wait for a generation before giving up. 0 waits forever.
    pub timeout_secs: u64,

    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: "gemini".to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            gemini: GeminiConfig::default(),
        }
    }
}

/// Gemini backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model_name: String,
    pub base_url: String,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model_name: "gemini-2.0-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Explicit path (must exist) → `./config.json` →
    /// `<config dir>/scaffold-ai/config.json` → defaults. The API key
    /// falls back to `GEMINI_API_KEY` when the file leaves it empty.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_from_search_path()?,
        };

        if config.gemini.api_key.is_empty() {
            if let Ok(key) = std::env::var(API_KEY_ENV) {
                info!("using API key from {}", API_KEY_ENV);
                config.gemini.api_key = key;
            }
        }

        Ok(config)
    }

    fn load_from_search_path() -> Result<Self, ConfigError> {
        for candidate in search_path() {
            if candidate.is_file() {
                return Self::load_from_file(&candidate);
            }
        }

        warn!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Parse a single config file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        info!(path = %path.display(), backend = %config.backend, "config loaded");
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// Check the fields a backend needs before anything is dispatched.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.trim().is_empty() {
            return Err(ConfigError::Invalid("backend must not be empty".into()));
        }
        if self.backend == "gemini" {
            if self.gemini.model_name.trim().is_empty() {
                return Err(ConfigError::Invalid("gemini.model_name must not be empty".into()));
            }
            if self.gemini.api_key.trim().is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "gemini.api_key is empty; set it in {} or export {}",
                    CONFIG_FILE_NAME, API_KEY_ENV
                )));
            }
        }
        Ok(())
    }

    /// Generation timeout, `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Config locations tried when no explicit path is given, in order.
pub fn search_path() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME));
    }
    paths
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn valid_config() -> Config {
        Config {
            gemini: GeminiConfig {
                api_key: "secret".into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn parses_reference_shape_and_ignores_database() {
        let json = r#"{
            "database": { "driver": "postgres", "port": 5432 },
            "gemini": { "api_key": "abc", "model_name": "gemini-1.5-pro" }
        }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.gemini.api_key, "abc");
        assert_eq!(config.gemini.model_name, "gemini-1.5-pro");
        assert_eq!(config.backend, "gemini");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.gemini.base_url, GeminiConfig::default().base_url);
    }

    #[test]
    fn empty_object_is_all_defaults() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn timeout_zero_disables() {
        let config = Config {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), None);
        assert_eq!(Config::default().timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn validate_accepts_complete_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_missing_api_key() {
        let err = Config::default().validate().unwrap_err();
        assert!(err.to_string().contains("api_key"));
    }

    #[test]
    fn validate_rejects_empty_model() {
        let mut config = valid_config();
        config.gemini.model_name = " ".into();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn validate_rejects_empty_backend() {
        let mut config = valid_config();
        config.backend = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_from_file_reads_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"timeout_secs": 5, "gemini": {"api_key": "k"}}"#).unwrap();

        let config = Config::load_from_file(&path).unwrap();
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.gemini.api_key, "k");
    }

    #[test]
    fn load_explicit_missing_file_is_read_error() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("missing.json"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn load_malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "{ not json").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn search_path_starts_with_working_directory() {
        assert_eq!(search_path()[0], PathBuf::from(CONFIG_FILE_NAME));
    }
}

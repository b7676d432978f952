#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for the Sentinel Shopfloor journal
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/sentinel/config.toml)
//! - Environment variables (`SENTINEL_*`)
//! - CLI flags (applied by the binary, highest precedence)

use sentinel_errors::{ConfigError, Error};
use sentinel_types::ColorChoice;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Storage key for the access-scan journal
pub const SCAN_HISTORY_KEY: &str = "access_scan_history";

/// Storage key for the safety-alert journal
pub const SAFETY_ALERTS_KEY: &str = "safety_alerts";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub paths: PathConfig,

    #[serde(default)]
    pub history: JournalConfig,

    #[serde(default)]
    pub alerts: JournalConfig,
}

/// General configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GeneralConfig {
    #[serde(default)]
    pub color: ColorChoice,
}

/// Path configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PathConfig {
    /// Data directory holding the journal slots; defaults to the platform
    /// data dir when unset.
    pub data_path: Option<PathBuf>,
}

/// Per-journal retention configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

fn default_capacity() -> usize {
    50
}

impl Config {
    /// Load configuration from a file, or fall back to defaults
    ///
    /// A missing file is not an error when no explicit path was given; an
    /// explicit `--config` path that does not exist is.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed, or when a
    /// value fails validation.
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        let config = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(ConfigError::NotFound {
                        path: explicit.display().to_string(),
                    }
                    .into());
                }
                Self::load_file(explicit).await?
            }
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    Self::load_file(&default_path).await?
                } else {
                    tracing::debug!("no config file found, using defaults");
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config)
    }

    async fn load_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            Error::from(ConfigError::Invalid {
                message: format!("{}: {e}", path.display()),
            })
        })?;
        let config = toml::from_str(&contents).map_err(|e| {
            Error::from(ConfigError::ParseError {
                message: e.to_string(),
            })
        })?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    /// Merge environment variables over the current values
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but does not parse.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        if let Ok(dir) = std::env::var("SENTINEL_DATA_DIR") {
            self.paths.data_path = Some(PathBuf::from(dir));
        }
        if let Ok(value) = std::env::var("SENTINEL_HISTORY_CAPACITY") {
            self.history.capacity = parse_capacity("SENTINEL_HISTORY_CAPACITY", &value)?;
        }
        if let Ok(value) = std::env::var("SENTINEL_ALERT_CAPACITY") {
            self.alerts.capacity = parse_capacity("SENTINEL_ALERT_CAPACITY", &value)?;
        }
        if let Ok(value) = std::env::var("SENTINEL_COLOR") {
            self.general.color = value.parse().map_err(|_| {
                Error::from(ConfigError::InvalidValue {
                    field: "SENTINEL_COLOR".to_string(),
                    value,
                })
            })?;
        }
        self.validate()?;
        Ok(())
    }

    /// Resolved data directory, falling back to the platform default
    #[must_use]
    pub fn data_path(&self) -> PathBuf {
        self.paths
            .data_path
            .clone()
            .unwrap_or_else(default_data_path)
    }

    fn validate(&self) -> Result<(), Error> {
        for (field, capacity) in [
            ("history.capacity", self.history.capacity),
            ("alerts.capacity", self.alerts.capacity),
        ] {
            if capacity == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    value: "0".to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Default config file location (~/.config/sentinel/config.toml)
#[must_use]
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentinel")
        .join("config.toml")
}

/// Default data directory (~/.local/share/sentinel on Linux)
#[must_use]
pub fn default_data_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("sentinel")
}

fn parse_capacity(var: &str, value: &str) -> Result<usize, Error> {
    value
        .parse::<usize>()
        .ok()
        .filter(|cap| *cap > 0)
        .ok_or_else(|| {
            ConfigError::InvalidValue {
                field: var.to_string(),
                value: value.to_string(),
            }
            .into()
        })
}

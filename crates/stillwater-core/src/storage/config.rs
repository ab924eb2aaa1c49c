//! TOML-based application configuration.
//!
//! Stores user preferences for reminder delivery:
//! - Whether local reminders are enabled at all
//! - Fire time for the daily mood check-in
//! - Fire time for the rotating daily quote
//!
//! Configuration is stored at `~/.config/stillwater/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::ConfigError;

/// Reminder delivery configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemindersConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Mood check-in fire hour (local time, 0-23).
    #[serde(default = "default_checkin_hour")]
    pub checkin_hour: u32,
    #[serde(default)]
    pub checkin_minute: u32,
    /// Daily quote fire hour (local time, 0-23).
    #[serde(default = "default_quote_hour")]
    pub quote_hour: u32,
    #[serde(default)]
    pub quote_minute: u32,
}

impl Default for RemindersConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            checkin_hour: default_checkin_hour(),
            checkin_minute: 0,
            quote_hour: default_quote_hour(),
            quote_minute: 0,
        }
    }
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/stillwater/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub reminders: RemindersConfig,
}

// Default functions
fn default_true() -> bool {
    true
}
fn default_checkin_hour() -> u32 {
    20
}
fn default_quote_hour() -> u32 {
    9
}

impl AppConfig {
    fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()
            .map_err(|e| ConfigError::LoadFailed {
                path: PathBuf::from("~/.config/stillwater"),
                message: e.to_string(),
            })?
            .join("config.toml"))
    }

    /// Load the configuration, falling back to defaults if the file is
    /// missing.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path (used by tests).
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Save the configuration.
    ///
    /// # Errors
    /// Returns an error if serialization or the write fails.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Save to an explicit path (used by tests).
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

//! Configuration file support.
//!
//! Settings are stored as JSON. They select the log level and control which
//! adapters the controller loads at startup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::ENTRY_POINT_GROUP;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Install `env_logger` with `level` as the default filter.
///
/// `RUST_LOG` still takes precedence. Calling this more than once is harmless;
/// only the first logger is kept.
pub fn init_logging(level: LogLevel) {
    let env = env_logger::Env::default().default_filter_or(level.to_level_filter().as_str());
    if env_logger::Builder::from_env(env).try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Settings controlling the controller and its adapters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Version of the configuration file format
    pub version: u32,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Adapter discovery settings
    #[serde(default)]
    pub plugins: PluginSettings,
}

/// Adapter discovery section of the settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Adapter names that must not be loaded
    #[serde(default)]
    pub blocked: Vec<String>,

    /// Entry-point group adapters are discovered under
    #[serde(default = "default_entry_point_group")]
    pub entry_point_group: String,
}

fn default_entry_point_group() -> String {
    ENTRY_POINT_GROUP.to_string()
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            blocked: Vec::new(),
            entry_point_group: default_entry_point_group(),
        }
    }
}

impl Settings {
    /// Create settings with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::default(),
            plugins: PluginSettings::default(),
        }
    }

    /// Block an adapter by name (builder style).
    pub fn block_plugin(mut self, name: impl Into<String>) -> Self {
        self.plugins.blocked.push(name.into());
        self
    }

    /// Serialize the settings to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if settings.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: settings.version,
                supported_version: CONFIG_VERSION,
            });
        }

        Ok(settings)
    }

    /// Get the default settings filename.
    pub fn default_filename() -> &'static str {
        "settings.json"
    }

    /// Get the default settings path.
    pub fn default_path() -> Option<PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("bioimage").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("bioimage")
                    .join(Self::default_filename())
            })
        }
    }

    /// Load settings from a file.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {:?}", path);
        Ok(settings)
    }

    /// Save settings to a file, creating parent directories as needed.
    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved settings to {:?}", path);
        Ok(())
    }

    /// Try to load settings from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            log::debug!("No settings file found at {:?}", path);
            return None;
        }

        match Self::load_from_path(&path) {
            Ok(settings) => Some(settings),
            Err(e) => {
                log::warn!("Failed to load settings file {:?}: {}", path, e);
                None
            }
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading settings.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        /// Version found in the file
        file_version: u32,
        /// Newest version this build understands
        supported_version: u32,
    },

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_roundtrip() {
        let settings = Settings::new().block_plugin("raster");
        let json = settings.to_json().unwrap();

        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let settings = Settings::from_json(r#"{ "version": 1 }"#).unwrap();

        assert_eq!(settings.log_level, LogLevel::Info);
        assert!(settings.plugins.blocked.is_empty());
        assert_eq!(settings.plugins.entry_point_group, ENTRY_POINT_GROUP);
    }

    #[test]
    fn test_log_level_parses_lowercase() {
        let settings =
            Settings::from_json(r#"{ "version": 1, "log_level": "debug" }"#).unwrap();
        assert_eq!(settings.log_level.to_level_filter(), log::LevelFilter::Debug);
    }

    #[test]
    fn test_newer_version_rejected() {
        let err = Settings::from_json(r#"{ "version": 99 }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::VersionTooNew {
                file_version: 99,
                supported_version: CONFIG_VERSION
            }
        ));
    }

    #[test]
    fn test_save_and_load_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");
        let settings = Settings::new().block_plugin("npy");

        settings.save_to_path(&path).unwrap();
        assert_eq!(Settings::load_from_path(&path).unwrap(), settings);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from_path(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }

    #[test]
    fn test_init_logging_twice() {
        init_logging(LogLevel::Warn);
        init_logging(LogLevel::Debug);
    }
}

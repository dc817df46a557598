//! Configuration file support for rocklabel.
//!
//! Settings are stored as JSON in the user's config directory and loaded once
//! at startup. Missing fields fall back to their defaults.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_VIEWPORT_FRACTION;
use crate::model::Dimensions;
use crate::transform::{ReferenceFrame, fit_to_viewport};
use crate::undo::UndoConfig;

/// Log level setting for the application.
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

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Application name (for identification)
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Coordinate range of incoming rock geometries
    #[serde(default)]
    pub reference_frame: ReferenceFrame,

    /// Share of the window a canvas may fill on each axis
    #[serde(default = "default_viewport_fraction")]
    pub viewport_fraction: f64,

    /// Label history settings
    #[serde(default)]
    pub undo: UndoConfig,
}

fn default_app_name() -> String {
    "rocklabel".to_string()
}

fn default_viewport_fraction() -> f64 {
    DEFAULT_VIEWPORT_FRACTION
}

impl AppConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            app_name: default_app_name(),
            log_level: LogLevel::default(),
            reference_frame: ReferenceFrame::default(),
            viewport_fraction: default_viewport_fraction(),
            undo: UndoConfig::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;

        // Validate version compatibility
        if config.version > CONFIG_VERSION {
            return Err(ConfigError::VersionTooNew {
                file_version: config.version,
                supported_version: CONFIG_VERSION,
            });
        }

        if !(config.viewport_fraction > 0.0 && config.viewport_fraction <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport_fraction must be in (0, 1], got {}",
                config.viewport_fraction
            )));
        }
        if !config.reference_frame.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "reference_frame must be positive, got {}x{}",
                config.reference_frame.width, config.reference_frame.height
            )));
        }

        Ok(config)
    }

    /// Canvas size for content of `content` size inside a window of `viewport` size.
    pub fn fit(&self, content: Dimensions, viewport: Dimensions) -> Dimensions {
        fit_to_viewport(content, viewport, self.viewport_fraction)
    }

    /// Get the default filename for the config file.
    pub fn default_filename() -> &'static str {
        "rocklabel-config.json"
    }

    /// Get the default config file path.
    pub fn default_path() -> Option<std::path::PathBuf> {
        // Try to use XDG config directory, fall back to home directory
        if let Some(config_dir) = dirs::config_dir() {
            Some(config_dir.join("rocklabel").join(Self::default_filename()))
        } else {
            dirs::home_dir().map(|home_dir| {
                home_dir
                    .join(".config")
                    .join("rocklabel")
                    .join(Self::default_filename())
            })
        }
    }

    /// Try to load configuration from the default path.
    /// Returns None if the file doesn't exist or can't be read.
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    /// Try to load configuration from `path`.
    pub fn load_from(path: &std::path::Path) -> Option<Self> {
        match Self::read_from(path) {
            Ok(Some(config)) => {
                log::info!("Loaded configuration from {:?}", path);
                Some(config)
            }
            Ok(None) => {
                log::debug!("No config file found at {:?}", path);
                None
            }
            Err(e) => {
                log::warn!("Failed to load config file {:?}: {}", path, e);
                None
            }
        }
    }

    /// Read configuration from `path` without logging.
    /// Returns `Ok(None)` if the file doesn't exist.
    pub fn read_from(path: &std::path::Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json).map(Some)
    }

    /// Save configuration to the default path.
    pub fn save_to_default_path(&self) -> Result<(), ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save_to(&path)
    }

    /// Save configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = self.to_json()?;
        std::fs::write(path, json)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Errors that can occur when loading configuration.
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
        file_version: u32,
        supported_version: u32,
    },

    /// A field holds a value outside its range
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// I/O error when reading/writing config
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

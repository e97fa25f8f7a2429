//! Configuration management system for MirrorSync
//!
//! This crate holds two separate kinds of configuration:
//!
//! - **Application settings** ([`AppConfig`]): mirror behavior, logging and
//!   terminal UI options, layered from defaults, a YAML/TOML file and
//!   `MIRRORSYNC__*` environment variables.
//! - **Directory memory** ([`DirectoryConfig`]): the last-used work and home
//!   directories, persisted as a flat JSON document through a
//!   [`DirectoryStore`].
//!
//! # Examples
//!
//! ```rust
//! use mirrorsync_config::{ConfigBuilder, DirectoryStore, MemoryDirectoryStore};
//!
//! let config = ConfigBuilder::new()
//!     .add_defaults()
//!     .add_env_prefix("MIRRORSYNC")
//!     .build()
//!     .expect("Failed to load configuration");
//! assert!(config.mirror.preserve_timestamps);
//!
//! let store = MemoryDirectoryStore::default();
//! let dirs = store.load().unwrap();
//! assert!(dirs.work_dir().is_none());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub mod builder;
pub mod directories;
pub mod error;
pub mod loader;

pub use builder::{ConfigBuilder, SettingsFormat};
pub use directories::{
    DirectoryConfig, DirectoryStore, JsonDirectoryStore, MemoryDirectoryStore,
    DEFAULT_DIRECTORY_CONFIG_FILE,
};
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

/// Main configuration structure for MirrorSync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Mirror engine behavior
    #[serde(default)]
    pub mirror: MirrorConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Terminal front end configuration
    #[serde(default)]
    pub ui: UiConfig,
}

impl AppConfig {
    /// Check every setting against its accepted range
    pub fn validate(&self) -> ConfigResult<()> {
        let buffer = self.mirror.compare_buffer_size;
        let buffer_range = MirrorConfig::MIN_COMPARE_BUFFER..=MirrorConfig::MAX_COMPARE_BUFFER;
        if !buffer_range.contains(&buffer) {
            return Err(ConfigError::validation(
                "mirror.compare_buffer_size",
                format!(
                    "{} is outside {}..={} bytes",
                    buffer,
                    buffer_range.start(),
                    buffer_range.end()
                ),
            ));
        }

        if self.mirror.directory_config_path.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "mirror.directory_config_path",
                "must not be empty",
            ));
        }

        if !LoggingConfig::LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::validation(
                "logging.level",
                format!(
                    "'{}' is not one of {}",
                    self.logging.level,
                    LoggingConfig::LEVELS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

/// Mirror engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Copy source modification times onto copied files
    #[serde(default = "default_preserve_timestamps")]
    pub preserve_timestamps: bool,
    /// Chunk size used when comparing file contents
    #[serde(default = "default_compare_buffer_size")]
    pub compare_buffer_size: usize,
    /// Where the last-used directories are remembered
    #[serde(default = "default_directory_config_path")]
    pub directory_config_path: PathBuf,
}

impl MirrorConfig {
    /// Smallest accepted comparison buffer (4KB)
    pub const MIN_COMPARE_BUFFER: usize = 4 * 1024;
    /// Largest accepted comparison buffer (64MB)
    pub const MAX_COMPARE_BUFFER: usize = 64 * 1024 * 1024;
    /// Default comparison buffer (64KB)
    pub const DEFAULT_COMPARE_BUFFER: usize = 64 * 1024;
}

impl Default for MirrorConfig {
    fn default() -> Self {
        Self {
            preserve_timestamps: default_preserve_timestamps(),
            compare_buffer_size: default_compare_buffer_size(),
            directory_config_path: default_directory_config_path(),
        }
    }
}

fn default_preserve_timestamps() -> bool {
    true
}

fn default_compare_buffer_size() -> usize {
    MirrorConfig::DEFAULT_COMPARE_BUFFER
}

fn default_directory_config_path() -> PathBuf {
    PathBuf::from(DEFAULT_DIRECTORY_CONFIG_FILE)
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatting
    #[serde(default)]
    pub json_format: bool,
    /// Also write logs to this file
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Levels accepted by `level`
    pub const LEVELS: [&'static str; 5] = ["trace", "debug", "info", "warn", "error"];
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
            log_file: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Terminal front end configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiConfig {
    /// Ask before mirroring
    #[serde(default = "default_true")]
    pub confirm: bool,
    /// Draw a progress bar while mirroring
    #[serde(default = "default_true")]
    pub progress_bar: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            confirm: true,
            progress_bar: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.mirror.preserve_timestamps);
        assert_eq!(config.mirror.compare_buffer_size, 64 * 1024);
        assert_eq!(
            config.mirror.directory_config_path,
            PathBuf::from("directory_config.json")
        );
        assert_eq!(config.logging.level, "warn");
        assert!(config.ui.confirm);
    }

    #[test]
    fn test_validate() {
        assert!(AppConfig::default().validate().is_ok());

        let mut config = AppConfig::default();
        config.logging.level = "loud".to_string();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("`logging.level`"));

        let mut config = AppConfig::default();
        config.mirror.compare_buffer_size = MirrorConfig::MAX_COMPARE_BUFFER + 1;
        assert!(config.validate().is_err());

        config.mirror.compare_buffer_size = MirrorConfig::MIN_COMPARE_BUFFER;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config: AppConfig = serde_yaml::from_str("ui:\n  confirm: false\n").unwrap();
        assert!(!config.ui.confirm);
        assert!(config.ui.progress_bar);
        assert_eq!(config.mirror, MirrorConfig::default());
    }
}

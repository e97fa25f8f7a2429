//! Layered settings assembly
//!
//! Layers, lowest first: built-in defaults, settings files in the order they
//! were added, then environment variables. A later layer only overrides the
//! keys it actually sets.

use crate::{AppConfig, ConfigError, ConfigResult};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// On-disk settings format, picked from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsFormat {
    /// `.yaml`, `.yml` and anything unrecognized
    Yaml,
    /// `.toml`
    Toml,
    /// `.json`
    Json,
}

impl SettingsFormat {
    /// Format for `path`
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::Toml,
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }

    fn file_format(self) -> FileFormat {
        match self {
            Self::Yaml => FileFormat::Yaml,
            Self::Toml => FileFormat::Toml,
            Self::Json => FileFormat::Json,
        }
    }

    /// Serialize `config` in this format
    pub fn render(self, config: &AppConfig) -> ConfigResult<String> {
        let rendered = match self {
            Self::Yaml => serde_yaml::to_string(config).map_err(|e| e.to_string()),
            Self::Toml => toml::to_string_pretty(config).map_err(|e| e.to_string()),
            Self::Json => serde_json::to_string_pretty(config).map_err(|e| e.to_string()),
        };
        rendered.map_err(|message| ConfigError::Serialization {
            format: self.name(),
            message,
        })
    }

    /// Display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Yaml => "YAML",
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }
}

/// Builder for [`AppConfig`] on top of the `config` crate
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    with_defaults: bool,
    files: Vec<PathBuf>,
    env_prefix: Option<String>,
    env_separator: String,
}

impl ConfigBuilder {
    /// Create a builder with no layers
    pub fn new() -> Self {
        Self {
            with_defaults: false,
            files: Vec::new(),
            env_prefix: None,
            env_separator: "__".to_string(),
        }
    }

    /// Put the built-in defaults underneath every other layer
    pub fn add_defaults(mut self) -> Self {
        self.with_defaults = true;
        self
    }

    /// Add a settings file; a file that does not exist is skipped
    pub fn add_source_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.files.push(path.as_ref().to_path_buf());
        self
    }

    /// Read overrides from `PREFIX__SECTION__KEY` environment variables
    pub fn add_env_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Change the environment key separator (default: "__")
    pub fn env_separator<S: Into<String>>(mut self, separator: S) -> Self {
        self.env_separator = separator.into();
        self
    }

    /// Merge the layers, then validate the result
    pub fn build(self) -> ConfigResult<AppConfig> {
        let mut layers = Config::builder();

        if self.with_defaults {
            layers = layers.add_source(Config::try_from(&AppConfig::default())?);
        }

        for path in &self.files {
            if !path.is_file() {
                debug!("Skipping missing settings file {}", path.display());
                continue;
            }
            debug!("Loading settings from {}", path.display());
            let format = SettingsFormat::from_path(path).file_format();
            layers = layers.add_source(File::from(path.as_path()).format(format));
        }

        if let Some(prefix) = &self.env_prefix {
            layers = layers.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator(&self.env_separator)
                    .separator(&self.env_separator)
                    .try_parsing(true),
            );
        }

        let config: AppConfig = layers.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Build, falling back to the defaults on any error
    pub fn build_or_default(self) -> AppConfig {
        self.build().unwrap_or_default()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

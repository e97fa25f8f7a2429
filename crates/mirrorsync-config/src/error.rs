//! Error types for configuration management

use mirrorsync_types::SyncError;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A settings or directory file could not be read or written
    #[error("Cannot access '{}': {source}", path.display())]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A file exists but its contents are malformed
    #[error("Invalid contents in '{}': {message}", path.display())]
    Parse {
        /// Offending file
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A setting is outside its accepted range
    #[error("Invalid setting `{key}`: {message}")]
    Validation {
        /// Dotted setting name, e.g. `mirror.compare_buffer_size`
        key: String,
        /// What is wrong with it
        message: String,
    },

    /// Settings could not be written in the requested format
    #[error("Cannot write settings as {format}: {message}")]
    Serialization {
        /// Target format
        format: &'static str,
        /// Serializer message
        message: String,
    },

    /// Merging the layered sources failed
    #[error("Cannot assemble settings: {0}")]
    Layering(#[from] config::ConfigError),
}

impl From<ConfigError> for SyncError {
    fn from(error: ConfigError) -> Self {
        SyncError::config(error.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a new validation error
    pub fn validation<K: Into<String>, S: Into<String>>(key: K, message: S) -> Self {
        Self::Validation {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<P: Into<PathBuf>, S: Into<String>>(path: P, message: S) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new I/O error
    pub fn io<P: Into<PathBuf>>(path: P, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

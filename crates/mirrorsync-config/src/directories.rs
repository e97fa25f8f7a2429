//! Last-used directory memory
//!
//! The remembered work and home directories are the only state kept across
//! runs. They live in a flat JSON object:
//!
//! ```json
//! {
//!     "work_dir": "C:/Users/me/Work",
//!     "home_dir": "D:/Home"
//! }
//! ```
//!
//! A missing file is an empty configuration. Keys this crate does not know
//! about are carried through a load/save cycle unchanged.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// Default file name, relative to the working directory
pub const DEFAULT_DIRECTORY_CONFIG_FILE: &str = "directory_config.json";

/// Last-used directories
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    /// Directory mirrored to the external drive in work mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
    /// Directory mirrored from the external drive in home mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home_dir: Option<PathBuf>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_json::Value>,
}

impl DirectoryConfig {
    /// Remembered work directory, ignoring empty values
    pub fn work_dir(&self) -> Option<&Path> {
        non_empty(self.work_dir.as_deref())
    }

    /// Remembered home directory, ignoring empty values
    pub fn home_dir(&self) -> Option<&Path> {
        non_empty(self.home_dir.as_deref())
    }

    /// Remember a work directory
    pub fn set_work_dir<P: Into<PathBuf>>(&mut self, path: P) {
        self.work_dir = Some(path.into());
    }

    /// Remember a home directory
    pub fn set_home_dir<P: Into<PathBuf>>(&mut self, path: P) {
        self.home_dir = Some(path.into());
    }

    /// Whether nothing is remembered
    pub fn is_empty(&self) -> bool {
        self.work_dir().is_none() && self.home_dir().is_none() && self.extra.is_empty()
    }
}

fn non_empty(path: Option<&Path>) -> Option<&Path> {
    path.filter(|p| !p.as_os_str().is_empty())
}

/// Injected load/save of the directory memory
pub trait DirectoryStore {
    /// Load the remembered directories; a missing store is empty
    fn load(&self) -> ConfigResult<DirectoryConfig>;

    /// Persist the remembered directories
    fn save(&self, config: &DirectoryConfig) -> ConfigResult<()>;
}

/// JSON file backed store
#[derive(Debug, Clone)]
pub struct JsonDirectoryStore {
    path: PathBuf,
}

impl JsonDirectoryStore {
    /// Create a store at `path`
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonDirectoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY_CONFIG_FILE)
    }
}

impl DirectoryStore for JsonDirectoryStore {
    fn load(&self) -> ConfigResult<DirectoryConfig> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No directory config at {}", self.path.display());
                return Ok(DirectoryConfig::default());
            }
            Err(e) => return Err(ConfigError::io(&self.path, e)),
        };

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::parse(self.path.clone(), e.to_string()))
    }

    fn save(&self, config: &DirectoryConfig) -> ConfigResult<()> {
        let mut content = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
        config
            .serialize(&mut serializer)
            .map_err(|e| ConfigError::Serialization {
                format: "JSON",
                message: e.to_string(),
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::io(parent, e))?;
        }

        std::fs::write(&self.path, content).map_err(|e| ConfigError::io(&self.path, e))?;

        debug!("Saved directory config to {}", self.path.display());
        Ok(())
    }
}

/// In-memory store, for callers that must not touch the filesystem
#[derive(Debug, Default)]
pub struct MemoryDirectoryStore {
    config: Mutex<DirectoryConfig>,
}

impl MemoryDirectoryStore {
    /// Create a store holding `config`
    pub fn new(config: DirectoryConfig) -> Self {
        Self {
            config: Mutex::new(config),
        }
    }

    /// Current contents
    pub fn snapshot(&self) -> DirectoryConfig {
        self.config
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DirectoryStore for MemoryDirectoryStore {
    fn load(&self) -> ConfigResult<DirectoryConfig> {
        Ok(self.snapshot())
    }

    fn save(&self, config: &DirectoryConfig) -> ConfigResult<()> {
        *self.config.lock().unwrap_or_else(PoisonError::into_inner) = config.clone();
        Ok(())
    }
}

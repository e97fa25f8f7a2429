//! Settings discovery, loading and saving

use crate::{AppConfig, ConfigBuilder, ConfigError, ConfigResult, SettingsFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable prefix for overrides (`MIRRORSYNC__UI__CONFIRM=false`)
pub const ENV_PREFIX: &str = "MIRRORSYNC";

/// File names looked for in the working directory, in order
const LOCAL_FILES: [&str; 4] = [
    "mirrorsync.yaml",
    "mirrorsync.yml",
    "mirrorsync.toml",
    ".mirrorsync.yaml",
];

/// File names looked for in the per-user `mirrorsync` directory, in order
const USER_FILES: [&str; 3] = ["config.yaml", "config.yml", "config.toml"];

/// Entry points for the common ways of obtaining an [`AppConfig`]
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, the first discovered settings file, then the environment
    pub fn load_default() -> ConfigResult<AppConfig> {
        let mut builder = ConfigBuilder::new().add_defaults();
        if let Some(path) = Self::discover() {
            builder = builder.add_source_file(path);
        }
        builder.add_env_prefix(ENV_PREFIX).build()
    }

    /// Defaults, `path`, then the environment; `path` must exist
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<AppConfig> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "settings file not found"),
            ));
        }

        ConfigBuilder::new()
            .add_defaults()
            .add_source_file(path)
            .add_env_prefix(ENV_PREFIX)
            .build()
    }

    /// [`Self::load_from_file`] when a path is given, else [`Self::load_default`]
    pub fn load(path: Option<&Path>) -> ConfigResult<AppConfig> {
        path.map_or_else(Self::load_default, Self::load_from_file)
    }

    /// Write `config` to `path` in the format its extension names
    pub fn save_to_file<P: AsRef<Path>>(config: &AppConfig, path: P) -> ConfigResult<()> {
        let path = path.as_ref();
        let content = SettingsFormat::from_path(path).render(config)?;
        std::fs::write(path, content).map_err(|e| ConfigError::io(path, e))?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Candidate settings files, most specific first
    pub fn search_paths() -> Vec<PathBuf> {
        let local = LOCAL_FILES.iter().map(PathBuf::from);
        let user = user_config_dir()
            .map(|dir| dir.join("mirrorsync"))
            .into_iter()
            .flat_map(|dir| USER_FILES.iter().map(move |name| dir.join(name)));
        local.chain(user).collect()
    }

    /// First settings file that exists
    pub fn discover() -> Option<PathBuf> {
        Self::search_paths().into_iter().find(|path| path.is_file())
    }
}

/// Per-user configuration directory of the host platform
fn user_config_dir() -> Option<PathBuf> {
    let var = |name: &str| std::env::var_os(name).map(PathBuf::from);

    if cfg!(windows) {
        var("APPDATA")
    } else if cfg!(target_os = "macos") {
        var("HOME").map(|home| home.join("Library").join("Application Support"))
    } else {
        var("XDG_CONFIG_HOME").or_else(|| var("HOME").map(|home| home.join(".config")))
    }
}

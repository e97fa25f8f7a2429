//! Named mirror directions

use mirrorsync_config::DirectoryConfig;
use mirrorsync_types::SyncError;
use std::path::{Path, PathBuf};

/// Shown when work or home mode has no directory to work with
pub const MISSING_DIRECTORIES: &str = "Please select both directories";

/// Direction of a mirror run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorMode {
    /// Work directory to external drive
    Work,
    /// External drive to home directory
    Home,
    /// Explicit source and destination
    Direct,
}

impl MirrorMode {
    /// Subcommand name, used in JSON output
    pub fn name(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Home => "home",
            Self::Direct => "sync",
        }
    }

    /// Labels for the source and destination lines
    pub fn labels(self) -> (&'static str, &'static str) {
        match self {
            Self::Work => ("Work Directory", "External Drive"),
            Self::Home => ("External Drive", "Home Directory"),
            Self::Direct => ("Source", "Destination"),
        }
    }

    /// Sentence shown on the confirmation step
    pub fn direction_message(self) -> &'static str {
        match self {
            Self::Work => "Files will be copied FROM work directory TO external drive.",
            Self::Home => "Files will be copied FROM external drive TO home directory.",
            Self::Direct => "Files will be copied FROM source TO destination.",
        }
    }

    /// Message shown after a successful run
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Work => "Work files successfully synced to external drive!",
            Self::Home => "External drive files successfully synced to home directory!",
            Self::Direct => "Files successfully synced!",
        }
    }
}

/// Resolved source and destination for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorPlan {
    /// Direction
    pub mode: MirrorMode,
    /// Directory read from
    pub source: PathBuf,
    /// Directory written to
    pub destination: PathBuf,
}

impl MirrorPlan {
    /// Explicit source and destination
    pub fn direct(source: PathBuf, destination: PathBuf) -> Self {
        Self {
            mode: MirrorMode::Direct,
            source,
            destination,
        }
    }

    /// Work directory onto the drive; `work_dir` overrides the remembered one
    pub fn work(
        dirs: &DirectoryConfig,
        work_dir: Option<PathBuf>,
        drive: PathBuf,
    ) -> Result<Self, SyncError> {
        let work_dir = pick(work_dir, dirs.work_dir())?;
        Ok(Self {
            mode: MirrorMode::Work,
            source: work_dir,
            destination: require(drive)?,
        })
    }

    /// Drive onto the home directory; `home_dir` overrides the remembered one
    pub fn home(
        dirs: &DirectoryConfig,
        drive: PathBuf,
        home_dir: Option<PathBuf>,
    ) -> Result<Self, SyncError> {
        let home_dir = pick(home_dir, dirs.home_dir())?;
        Ok(Self {
            mode: MirrorMode::Home,
            source: require(drive)?,
            destination: home_dir,
        })
    }

    /// Record this run's local directory in `dirs`; returns whether it changed
    pub fn remember(&self, dirs: &mut DirectoryConfig) -> bool {
        match self.mode {
            MirrorMode::Work if dirs.work_dir() != Some(self.source.as_path()) => {
                dirs.set_work_dir(&self.source);
                true
            }
            MirrorMode::Home if dirs.home_dir() != Some(self.destination.as_path()) => {
                dirs.set_home_dir(&self.destination);
                true
            }
            _ => false,
        }
    }
}

fn pick(given: Option<PathBuf>, remembered: Option<&Path>) -> Result<PathBuf, SyncError> {
    match given {
        Some(path) => require(path),
        None => remembered
            .map(Path::to_path_buf)
            .ok_or_else(|| SyncError::config(MISSING_DIRECTORIES)),
    }
}

fn require(path: PathBuf) -> Result<PathBuf, SyncError> {
    if path.as_os_str().is_empty() {
        Err(SyncError::config(MISSING_DIRECTORIES))
    } else {
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn remembered() -> DirectoryConfig {
        let mut dirs = DirectoryConfig::default();
        dirs.set_work_dir("/saved/work");
        dirs.set_home_dir("/saved/home");
        dirs
    }

    #[test]
    fn test_work_uses_remembered_directory() {
        let plan = MirrorPlan::work(&remembered(), None, PathBuf::from("/drive")).unwrap();

        assert_eq!(plan.mode, MirrorMode::Work);
        assert_eq!(plan.source, PathBuf::from("/saved/work"));
        assert_eq!(plan.destination, PathBuf::from("/drive"));
    }

    #[test]
    fn test_home_direction() {
        let plan = MirrorPlan::home(&remembered(), PathBuf::from("/drive"), None).unwrap();

        assert_eq!(plan.source, PathBuf::from("/drive"));
        assert_eq!(plan.destination, PathBuf::from("/saved/home"));
    }

    #[test]
    fn test_given_directory_wins_and_is_remembered() {
        let mut dirs = remembered();
        let plan = MirrorPlan::work(
            &dirs,
            Some(PathBuf::from("/new/work")),
            PathBuf::from("/drive"),
        )
        .unwrap();

        assert_eq!(plan.source, PathBuf::from("/new/work"));
        assert!(plan.remember(&mut dirs));
        assert_eq!(dirs.work_dir(), Some(Path::new("/new/work")));
        assert_eq!(dirs.home_dir(), Some(Path::new("/saved/home")));
        assert!(!plan.remember(&mut dirs));
    }

    #[test]
    fn test_direct_plan_remembers_nothing() {
        let mut dirs = DirectoryConfig::default();
        let plan = MirrorPlan::direct(PathBuf::from("/a"), PathBuf::from("/b"));
        assert!(!plan.remember(&mut dirs));
        assert!(dirs.is_empty());
    }

    #[rstest]
    #[case(None, "/drive")]
    #[case(Some(""), "/drive")]
    #[case(Some("/work"), "")]
    fn test_missing_directories(#[case] work_dir: Option<&str>, #[case] drive: &str) {
        let error = MirrorPlan::work(
            &DirectoryConfig::default(),
            work_dir.map(PathBuf::from),
            PathBuf::from(drive),
        )
        .unwrap_err();

        assert_eq!(error, SyncError::config(MISSING_DIRECTORIES));
        assert_eq!(error.exit_code(), 2);
    }

    #[rstest]
    #[case(MirrorMode::Work, "FROM work directory TO external drive")]
    #[case(MirrorMode::Home, "FROM external drive TO home directory")]
    fn test_direction_messages(#[case] mode: MirrorMode, #[case] fragment: &str) {
        assert!(mode.direction_message().contains(fragment));
    }
}

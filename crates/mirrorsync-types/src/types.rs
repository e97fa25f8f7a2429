//! Core data types for MirrorSync
//!
//! This module provides the data that flows out of a mirror run: the
//! per-file progress events, the walk entries, the lifecycle phase and the
//! final report.

use chrono::{DateTime, Utc};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Unique identifier for mirror requests
pub type RequestId = uuid::Uuid;

/// A file or directory found while walking the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FileEntry {
    /// Path relative to both roots
    pub relative_path: PathBuf,
    /// Absolute path under the source root
    pub source: PathBuf,
    /// Absolute path under the destination root
    pub destination: PathBuf,
}

impl FileEntry {
    /// Map a relative path onto both roots
    pub fn new<P: Into<PathBuf>>(
        relative_path: P,
        source_root: &Path,
        destination_root: &Path,
    ) -> Self {
        let relative_path = relative_path.into();
        Self {
            source: source_root.join(&relative_path),
            destination: destination_root.join(&relative_path),
            relative_path,
        }
    }

    /// Whether this entry is the root of the walk
    pub fn is_root(&self) -> bool {
        self.relative_path.as_os_str().is_empty()
    }
}

/// Progress information emitted once per file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressEvent {
    /// File about to be compared or copied
    pub current_file: PathBuf,
    /// Files handled so far, including the current one
    pub files_done: u64,
    /// Total files found by the counting pass
    pub files_total: u64,
}

impl ProgressEvent {
    /// Create a new progress event
    pub fn new<P: Into<PathBuf>>(current_file: P, files_done: u64, files_total: u64) -> Self {
        Self {
            current_file: current_file.into(),
            files_done,
            files_total,
        }
    }

    /// Calculate the progress percentage
    pub fn percent(&self) -> f64 {
        if self.files_total > 0 {
            (self.files_done as f64 / self.files_total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// File name of the current file, for short status lines
    pub fn file_name(&self) -> String {
        self.current_file
            .file_name()
            .map_or_else(
                || self.current_file.display().to_string(),
                |name| name.to_string_lossy().into_owned(),
            )
    }
}

/// Lifecycle of a single mirror run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SyncPhase {
    /// No run has started yet
    #[default]
    NotStarted,
    /// Counting or copying
    Walking,
    /// Finished successfully
    Completed,
    /// Aborted with an error
    Failed,
}

impl SyncPhase {
    /// Check if the run reached a terminal state
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Statistics of a successful mirror run
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SyncReport {
    /// Request this report belongs to
    pub request_id: RequestId,
    /// When the run started
    pub started_at: DateTime<Utc>,
    /// Files found by the counting pass
    pub files_total: u64,
    /// Files written to the destination
    pub files_copied: u64,
    /// Files whose destination copy was already identical
    pub files_skipped: u64,
    /// Directories that did not exist before the run
    pub directories_created: u64,
    /// Bytes written to the destination
    pub bytes_copied: u64,
    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl SyncReport {
    /// Create an empty report for a request
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            started_at: Utc::now(),
            files_total: 0,
            files_copied: 0,
            files_skipped: 0,
            directories_created: 0,
            bytes_copied: 0,
            duration: Duration::ZERO,
        }
    }

    /// Files either copied or skipped
    pub fn files_processed(&self) -> u64 {
        self.files_copied + self.files_skipped
    }

    /// Calculate the overall transfer rate in bytes per second
    pub fn transfer_rate(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.bytes_copied as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Whether the run wrote nothing
    pub fn is_noop(&self) -> bool {
        self.files_copied == 0 && self.directories_created == 0
    }
}

//! Core type system and error handling for MirrorSync
//!
//! This crate provides the types shared by the MirrorSync crates:
//!
//! - **Error handling**: the [`SyncError`] taxonomy with exit codes
//! - **Core types**: progress events, walk entries, run phase and report
//!
//! # Features
//!
//! - `serde` (default): Enable serialization support
//!
//! # Examples
//!
//! ```rust
//! use mirrorsync_types::{ProgressEvent, Result, SyncError};
//!
//! fn check(event: &ProgressEvent) -> Result<()> {
//!     if event.files_done > event.files_total {
//!         return Err(SyncError::config("progress overran the counted total"));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check(&ProgressEvent::new("a.txt", 1, 2)).is_ok());
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod result;
pub mod types;

pub use error::{ErrorKind, SyncError};
pub use result::Result;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};
    use std::time::Duration;

    #[test]
    fn test_file_entry_maps_both_roots() {
        let entry = FileEntry::new("sub/b.txt", Path::new("/work"), Path::new("/drive"));

        assert_eq!(entry.source, PathBuf::from("/work/sub/b.txt"));
        assert_eq!(entry.destination, PathBuf::from("/drive/sub/b.txt"));
        assert!(!entry.is_root());
        assert!(FileEntry::new("", Path::new("/work"), Path::new("/drive")).is_root());
    }

    #[test]
    fn test_progress_event_percent() {
        let event = ProgressEvent::new("/work/file.txt", 1, 2);
        assert_eq!(event.percent(), 50.0);
        assert_eq!(event.file_name(), "file.txt");

        let empty = ProgressEvent::new("/work/file.txt", 0, 0);
        assert_eq!(empty.percent(), 0.0);
    }

    #[test]
    fn test_report_counters() {
        let mut report = SyncReport::new(uuid::Uuid::new_v4());
        assert!(report.is_noop());
        assert_eq!(report.transfer_rate(), 0.0);

        report.files_copied = 2;
        report.files_skipped = 3;
        report.bytes_copied = 2048;
        report.duration = Duration::from_secs(2);

        assert_eq!(report.files_processed(), 5);
        assert_eq!(report.transfer_rate(), 1024.0);
        assert!(!report.is_noop());
    }

    #[test]
    fn test_phase_terminal() {
        assert_eq!(SyncPhase::default(), SyncPhase::NotStarted);
        assert!(!SyncPhase::Walking.is_terminal());
        assert!(SyncPhase::Completed.is_terminal());
        assert!(SyncPhase::Failed.is_terminal());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_report_serializes() {
        let report = SyncReport::new(uuid::Uuid::new_v4());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["files_total"], 0);
        assert!(json["started_at"].is_string());
    }
}

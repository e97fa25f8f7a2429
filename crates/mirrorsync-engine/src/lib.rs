//! One-way directory mirroring for MirrorSync
//!
//! This crate mirrors a source directory tree into a destination:
//!
//! - **Tree walking**: deterministic depth-first walk, counted before copying
//! - **Change detection**: byte-for-byte comparison with a size short-circuit
//! - **Copying**: whole-file copy keeping permissions and timestamps
//! - **Progress**: one synchronous event per file, `1..=total`
//! - **Cancellation**: cooperative, checked before each directory and file
//!
//! Nothing is ever deleted from the destination.
//!
//! # Examples
//!
//! ```rust,no_run
//! use mirrorsync_engine::{MirrorEngine, SyncRequest};
//! use mirrorsync_types::ProgressEvent;
//!
//! # fn example() -> mirrorsync_types::Result<()> {
//! let engine = MirrorEngine::new();
//! let request = SyncRequest::new("work", "/media/drive/work");
//! let mut log = |event: &ProgressEvent| {
//!     println!("Copying: {} ({} of {})", event.file_name(), event.files_done, event.files_total);
//! };
//! let report = engine.sync(&request, &mut log)?;
//! println!("Copied {} files, {} bytes", report.files_copied, report.bytes_copied);
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cancel;
pub mod compare;
pub mod copy;
pub mod engine;
pub mod progress;
pub mod walk;

pub use cancel::CancellationToken;
pub use compare::files_identical;
pub use copy::copy_file;
pub use engine::{MirrorEngine, MirrorOptions, SyncRequest};
pub use progress::{LogProgress, NoProgress, ProgressRecorder, ProgressSink};
pub use walk::{count_files, MirrorWalk, WalkItem};

use mirrorsync_types::{ProgressEvent, Result, SyncReport};
use std::path::Path;

/// Mirror `source` into `destination` with default options.
///
/// `on_progress` is called once per file, before the file is compared.
pub fn sync<S, D, F>(source: S, destination: D, mut on_progress: F) -> Result<SyncReport>
where
    S: AsRef<Path>,
    D: AsRef<Path>,
    F: FnMut(&ProgressEvent),
{
    MirrorEngine::new().sync(&SyncRequest::new(source, destination), &mut on_progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrorsync_types::SyncError;
    use std::fs;
    use tempfile::TempDir;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("mirrorsync_engine=debug")
            .with_test_writer()
            .try_init();
    }

    #[test]
    fn test_sync_function() {
        init_tracing();
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        fs::create_dir_all(source.join("sub")).unwrap();
        fs::write(source.join("a.txt"), b"1").unwrap();
        fs::write(source.join("sub").join("b.txt"), b"2").unwrap();
        let destination = temp_dir.path().join("dst");

        let mut seen = Vec::new();
        let report = sync(&source, &destination, |event| {
            seen.push((event.files_done, event.files_total));
        })
        .unwrap();

        assert_eq!(seen, vec![(1, 2), (2, 2)]);
        assert_eq!(report.files_copied, 2);
        assert_eq!(count_files(&destination), 2);
    }

    #[test]
    fn test_sync_function_missing_source() {
        init_tracing();
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("absent");

        let result = sync(&source, temp_dir.path().join("dst"), |_| {});
        assert_eq!(result.unwrap_err(), SyncError::source_not_found(&source));
    }
}

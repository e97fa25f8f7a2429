//! Main mirror engine

use crate::{
    cancel::CancellationToken,
    compare::files_identical,
    copy::copy_file,
    progress::ProgressSink,
    walk::{count_files, MirrorWalk, WalkItem},
};
use mirrorsync_config::MirrorConfig;
use mirrorsync_types::{FileEntry, ProgressEvent, RequestId, Result, SyncError, SyncPhase, SyncReport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Mirror options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorOptions {
    /// Copy access and modification times onto copied files
    pub preserve_timestamps: bool,
    /// Chunk size for byte comparison
    pub compare_buffer_size: usize,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            preserve_timestamps: true,
            compare_buffer_size: MirrorConfig::DEFAULT_COMPARE_BUFFER,
        }
    }
}

impl From<&MirrorConfig> for MirrorOptions {
    fn from(config: &MirrorConfig) -> Self {
        Self {
            preserve_timestamps: config.preserve_timestamps,
            compare_buffer_size: config.compare_buffer_size,
        }
    }
}

/// Mirror request
#[derive(Debug, Clone)]
pub struct SyncRequest {
    /// Source directory, must exist
    pub source: PathBuf,
    /// Destination directory, created if missing
    pub destination: PathBuf,
    /// Mirror options
    pub options: MirrorOptions,
    /// Request ID for tracking
    pub request_id: RequestId,
}

impl SyncRequest {
    /// Create a new mirror request
    pub fn new<S: AsRef<Path>, D: AsRef<Path>>(source: S, destination: D) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            destination: destination.as_ref().to_path_buf(),
            options: MirrorOptions::default(),
            request_id: uuid::Uuid::new_v4(),
        }
    }

    /// Set mirror options
    pub fn with_options(mut self, options: MirrorOptions) -> Self {
        self.options = options;
        self
    }
}

/// One-way directory mirror.
///
/// An engine runs one mirror at a time: a second [`MirrorEngine::sync`] call
/// made while one is in flight fails with [`SyncError::Busy`] without
/// touching either tree.
#[derive(Debug, Default)]
pub struct MirrorEngine {
    in_flight: AtomicBool,
    phase: Mutex<SyncPhase>,
    cancel: Option<CancellationToken>,
}

/// Releases the in-flight flag when a run ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| SyncError::Busy)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl MirrorEngine {
    /// Create an engine without cancellation
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine that stops at the next entry once `token` is cancelled
    pub fn with_cancellation(token: CancellationToken) -> Self {
        Self {
            cancel: Some(token),
            ..Self::default()
        }
    }

    /// Phase of the latest run
    pub fn phase(&self) -> SyncPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_phase(&self, phase: SyncPhase) {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = phase;
    }

    /// Mirror `request.source` into `request.destination`.
    ///
    /// Every file under the source is visited in a fixed depth-first order.
    /// `progress` hears about each file before it is compared; a file is
    /// copied only when the destination copy is missing or its bytes differ.
    /// Files that exist only in the destination are left alone.
    ///
    /// The first error ends the run. Files already copied stay in place.
    pub fn sync(&self, request: &SyncRequest, progress: &mut dyn ProgressSink) -> Result<SyncReport> {
        let _guard = InFlight::acquire(&self.in_flight)?;
        let started = Instant::now();

        info!(
            "Starting mirror {}: {} -> {}",
            request.request_id,
            request.source.display(),
            request.destination.display()
        );

        let result = self.run(request, progress);
        match &result {
            Ok(report) => {
                self.set_phase(SyncPhase::Completed);
                info!(
                    "Mirror {} completed: {} copied, {} unchanged in {:?}",
                    request.request_id,
                    report.files_copied,
                    report.files_skipped,
                    started.elapsed()
                );
            }
            Err(e) => {
                self.set_phase(SyncPhase::Failed);
                warn!("Mirror {} failed: {}", request.request_id, e);
            }
        }
        result
    }

    fn check_cancelled(&self) -> Result<()> {
        self.cancel.as_ref().map_or(Ok(()), CancellationToken::check)
    }

    fn run(&self, request: &SyncRequest, progress: &mut dyn ProgressSink) -> Result<SyncReport> {
        let started = Instant::now();
        let mut report = SyncReport::new(request.request_id);

        // Must be a directory we can list; nothing is touched otherwise
        match fs::metadata(&request.source) {
            Ok(metadata) if metadata.is_dir() => {}
            _ => return Err(SyncError::source_not_found(&request.source)),
        }
        if let Err(e) = fs::read_dir(&request.source) {
            debug!("Source {} is not readable: {}", request.source.display(), e);
            return Err(SyncError::source_not_found(&request.source));
        }

        self.set_phase(SyncPhase::Walking);
        report.files_total = count_files(&request.source);
        debug!("Counted {} files under {}", report.files_total, request.source.display());

        for item in MirrorWalk::new(&request.source, &request.destination) {
            let item = item?;
            self.check_cancelled()?;

            match item {
                WalkItem::Directory(entry) => {
                    if ensure_directory(&entry.destination)? {
                        report.directories_created += 1;
                    }
                }
                WalkItem::File(entry) => {
                    let files_done = report.files_processed() + 1;
                    progress.on_progress(&ProgressEvent::new(
                        &entry.source,
                        files_done,
                        report.files_total,
                    ));
                    self.check_cancelled()?;

                    match mirror_file(&entry, &request.options)? {
                        Some(bytes) => {
                            report.files_copied += 1;
                            report.bytes_copied += bytes;
                        }
                        None => report.files_skipped += 1,
                    }
                }
            }
        }

        report.duration = started.elapsed();
        Ok(report)
    }
}

/// Create `path` and any missing parents; returns whether it was missing
fn ensure_directory(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(path).map_err(|e| SyncError::destination_create_failed(path, e))?;
    debug!("Created directory {}", path.display());
    Ok(true)
}

/// Copy one file if its destination is missing or different.
///
/// Returns the bytes written, or `None` when the destination was identical.
fn mirror_file(entry: &FileEntry, options: &MirrorOptions) -> Result<Option<u64>> {
    match fs::metadata(&entry.destination) {
        Ok(_) => {
            if files_identical(&entry.source, &entry.destination, options.compare_buffer_size)? {
                debug!("Unchanged: {}", entry.relative_path.display());
                return Ok(None);
            }
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(SyncError::comparison_failed(&entry.destination, e)),
    }

    copy_file(&entry.source, &entry.destination, options.preserve_timestamps).map(Some)
}

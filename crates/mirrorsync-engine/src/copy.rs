//! Whole-file copy with timestamp preservation

use filetime::FileTime;
use mirrorsync_types::{Result, SyncError};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// Copy `source` over `destination`, returning the number of bytes written.
///
/// Permissions are copied along with the content. When `preserve_timestamps`
/// is set the access and modification times are copied as well; a
/// filesystem that refuses new timestamps only produces a warning.
pub fn copy_file(source: &Path, destination: &Path, preserve_timestamps: bool) -> Result<u64> {
    let bytes = fs::copy(source, destination).map_err(|e| SyncError::copy_failed(source, e))?;

    if preserve_timestamps {
        let metadata = fs::metadata(source).map_err(|e| SyncError::copy_failed(source, e))?;
        let atime = FileTime::from_last_access_time(&metadata);
        let mtime = FileTime::from_last_modification_time(&metadata);

        if let Err(e) = filetime::set_file_times(destination, atime, mtime) {
            warn!(
                "Could not preserve timestamps on '{}': {}",
                destination.display(),
                e
            );
        }
    }

    debug!("Copied: {} -> {}", source.display(), destination.display());
    Ok(bytes)
}

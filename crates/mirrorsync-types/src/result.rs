//! Result type alias for MirrorSync operations

use crate::SyncError;

/// Result type alias for MirrorSync operations
pub type Result<T> = std::result::Result<T, SyncError>;

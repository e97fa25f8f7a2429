//! Error types and handling for MirrorSync
//!
//! Every failure of a mirror run is reported as a single [`SyncError`] value
//! carrying the first error encountered. The engine never retries and never
//! continues past a failed file.

use std::fmt;
use std::path::{Path, PathBuf};

/// Main error type for MirrorSync operations
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SyncError {
    /// Source root is missing, inaccessible or not a directory
    #[error("Source directory not found: {}", path.display())]
    SourceNotFound {
        /// Source root that was requested
        path: PathBuf,
    },

    /// Destination root or one of its subdirectories could not be created
    #[error("Failed to create directory '{}': {cause}", path.display())]
    DestinationCreateFailed {
        /// Directory that could not be created
        path: PathBuf,
        /// Underlying cause
        cause: String,
    },

    /// A file could not be copied
    #[error("Failed to copy '{}': {cause}", path.display())]
    CopyFailed {
        /// Source file that failed to copy
        path: PathBuf,
        /// Underlying cause
        cause: String,
    },

    /// Reading either side of a byte comparison failed
    #[error("Failed to compare '{}': {cause}", path.display())]
    ComparisonFailed {
        /// File that could not be read
        path: PathBuf,
        /// Underlying cause
        cause: String,
    },

    /// The run was cancelled between two files
    #[error("Operation cancelled")]
    Cancelled,

    /// Another mirror run is already in flight on the same engine
    #[error("A sync is already running on this engine")]
    Busy,

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// Error message describing the configuration issue
        message: String,
    },
}

/// Error kind for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    /// Source root missing
    SourceNotFound,
    /// Directory creation failed
    DestinationCreateFailed,
    /// File copy failed
    CopyFailed,
    /// File comparison failed
    ComparisonFailed,
    /// Cancellation
    Cancelled,
    /// Concurrent run rejected
    Busy,
    /// Configuration errors
    Config,
}

impl ErrorKind {
    /// Process exit code used by non-interactive front ends
    pub fn exit_code(self) -> u8 {
        match self {
            Self::Config => 2,
            Self::SourceNotFound => 3,
            Self::DestinationCreateFailed => 4,
            Self::CopyFailed => 5,
            Self::ComparisonFailed => 6,
            Self::Cancelled => 7,
            Self::Busy => 8,
        }
    }

    /// Stable snake_case name of the kind
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SourceNotFound => "source_not_found",
            Self::DestinationCreateFailed => "destination_create_failed",
            Self::CopyFailed => "copy_failed",
            Self::ComparisonFailed => "comparison_failed",
            Self::Cancelled => "cancelled",
            Self::Busy => "busy",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SyncError {
    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Self::DestinationCreateFailed { .. } => ErrorKind::DestinationCreateFailed,
            Self::CopyFailed { .. } => ErrorKind::CopyFailed,
            Self::ComparisonFailed { .. } => ErrorKind::ComparisonFailed,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Busy => ErrorKind::Busy,
            Self::Config { .. } => ErrorKind::Config,
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }

    /// Path the error refers to, if any
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::SourceNotFound { path }
            | Self::DestinationCreateFailed { path, .. }
            | Self::CopyFailed { path, .. }
            | Self::ComparisonFailed { path, .. } => Some(path),
            Self::Cancelled | Self::Busy | Self::Config { .. } => None,
        }
    }

    /// Whether the destination may have been modified before the error occurred
    pub fn destination_touched(&self) -> bool {
        !matches!(
            self,
            Self::SourceNotFound { .. } | Self::Busy | Self::Config { .. }
        )
    }

    /// Create a new source-not-found error
    pub fn source_not_found<P: Into<PathBuf>>(path: P) -> Self {
        Self::SourceNotFound { path: path.into() }
    }

    /// Create a new destination-create error
    pub fn destination_create_failed<P: Into<PathBuf>, E: fmt::Display>(path: P, cause: E) -> Self {
        Self::DestinationCreateFailed {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a new copy error
    pub fn copy_failed<P: Into<PathBuf>, E: fmt::Display>(path: P, cause: E) -> Self {
        Self::CopyFailed {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a new comparison error
    pub fn comparison_failed<P: Into<PathBuf>, E: fmt::Display>(path: P, cause: E) -> Self {
        Self::ComparisonFailed {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::io;

    proptest! {
        #[test]
        fn test_kind_and_exit_code_agree(cause in ".*", path in "[a-z/]{1,20}") {
            let errors = vec![
                SyncError::source_not_found(&path),
                SyncError::destination_create_failed(&path, &cause),
                SyncError::copy_failed(&path, &cause),
                SyncError::comparison_failed(&path, &cause),
                SyncError::config(cause.clone()),
            ];

            for error in errors {
                prop_assert_eq!(error.exit_code(), error.kind().exit_code());
                prop_assert!(error.exit_code() >= 2);
            }
        }
    }

    #[rstest]
    #[case(ErrorKind::Config, 2)]
    #[case(ErrorKind::SourceNotFound, 3)]
    #[case(ErrorKind::DestinationCreateFailed, 4)]
    #[case(ErrorKind::CopyFailed, 5)]
    #[case(ErrorKind::ComparisonFailed, 6)]
    #[case(ErrorKind::Cancelled, 7)]
    #[case(ErrorKind::Busy, 8)]
    fn test_exit_codes(#[case] kind: ErrorKind, #[case] code: u8) {
        assert_eq!(kind.exit_code(), code);
    }

    #[test]
    fn test_copy_failed_carries_cause() {
        let cause = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error = SyncError::copy_failed("/src/a.txt", cause);

        assert_eq!(error.kind(), ErrorKind::CopyFailed);
        assert_eq!(error.path(), Some(Path::new("/src/a.txt")));
        let message = error.to_string();
        assert!(message.contains("/src/a.txt"));
        assert!(message.contains("access denied"));
    }

    #[test]
    fn test_source_not_found_leaves_destination_alone() {
        let error = SyncError::source_not_found("/does/not/exist");
        assert!(!error.destination_touched());
        assert!(error.to_string().contains("/does/not/exist"));

        assert!(SyncError::Cancelled.destination_touched());
        assert!(!SyncError::Busy.destination_touched());
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(ErrorKind::ComparisonFailed.to_string(), "comparison_failed");
        assert_eq!(SyncError::Busy.kind().as_str(), "busy");
    }
}

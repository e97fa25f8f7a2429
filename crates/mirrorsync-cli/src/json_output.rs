//! JSON output structures for the MirrorSync CLI

use crate::modes::{MirrorMode, MirrorPlan};
use mirrorsync_types::{SyncError, SyncReport};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete JSON output for a mirror run
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncResultJson {
    /// Operation metadata
    pub metadata: OperationMetadata,
    /// Statistics, present when the run completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SyncStatsJson>,
    /// Overall result
    pub result: OperationResult,
}

/// Operation metadata
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// MirrorSync version
    pub version: String,
    /// Operation type
    pub operation: String,
    /// Timestamp when operation started
    pub timestamp: String,
    /// Source path, absent when none was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,
    /// Destination path, absent when none was resolved
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_path: Option<String>,
}

/// Mirror statistics in JSON format
#[derive(Debug, Serialize, Deserialize)]
pub struct SyncStatsJson {
    /// Request identifier
    pub request_id: String,
    /// Files found by the counting pass
    pub files_total: u64,
    /// Files written
    pub files_copied: u64,
    /// Files already identical
    pub files_skipped: u64,
    /// Directories created
    pub directories_created: u64,
    /// Bytes written
    pub bytes_copied: u64,
    /// Duration in seconds
    pub duration_seconds: f64,
    /// Transfer rate in MB/s
    pub transfer_rate_mbps: f64,
}

/// Overall operation result
#[derive(Debug, Serialize, Deserialize)]
pub struct OperationResult {
    /// Whether the operation was successful
    pub success: bool,
    /// Result message
    pub message: String,
    /// Error kind when the run failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
    /// Process exit code
    pub exit_code: u8,
}

impl SyncResultJson {
    /// Result document for a completed run
    pub fn success(plan: &MirrorPlan, report: &SyncReport) -> Self {
        Self {
            metadata: OperationMetadata::new(plan, &report.started_at.to_rfc3339()),
            stats: Some(SyncStatsJson::from_report(report)),
            result: OperationResult {
                success: true,
                message: plan.mode.success_message().to_string(),
                error_kind: None,
                exit_code: 0,
            },
        }
    }

    /// Result document for a failed or declined run
    pub fn failure(plan: &MirrorPlan, error: &SyncError) -> Self {
        Self {
            metadata: OperationMetadata::new(plan, &chrono::Utc::now().to_rfc3339()),
            stats: None,
            result: OperationResult::failed(error),
        }
    }

    /// Result document for a run whose directories could not be resolved
    pub fn unresolved(mode: MirrorMode, error: &SyncError) -> Self {
        Self {
            metadata: OperationMetadata {
                version: env!("CARGO_PKG_VERSION").to_string(),
                operation: mode.name().to_string(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                source_path: None,
                destination_path: None,
            },
            stats: None,
            result: OperationResult::failed(error),
        }
    }
}

impl OperationResult {
    fn failed(error: &SyncError) -> Self {
        Self {
            success: false,
            message: format!("Sync failed: {}", error),
            error_kind: Some(error.kind().to_string()),
            exit_code: error.exit_code(),
        }
    }
}

impl OperationMetadata {
    fn new(plan: &MirrorPlan, timestamp: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            operation: plan.mode.name().to_string(),
            timestamp: timestamp.to_string(),
            source_path: Some(plan.source.display().to_string()),
            destination_path: Some(plan.destination.display().to_string()),
        }
    }
}

impl SyncStatsJson {
    /// Create SyncStatsJson from a report
    pub fn from_report(report: &SyncReport) -> Self {
        Self {
            request_id: report.request_id.to_string(),
            files_total: report.files_total,
            files_copied: report.files_copied,
            files_skipped: report.files_skipped,
            directories_created: report.directories_created,
            bytes_copied: report.bytes_copied,
            duration_seconds: report.duration.as_secs_f64(),
            transfer_rate_mbps: report.transfer_rate() / 1024.0 / 1024.0,
        }
    }
}

/// JSON output for `count`
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResultJson {
    /// Counted directory
    pub path: String,
    /// Files a mirror run would visit
    pub files: u64,
}

impl CountResultJson {
    /// Create a count document
    pub fn new(path: &Path, files: u64) -> Self {
        Self {
            path: path.display().to_string(),
            files,
        }
    }
}

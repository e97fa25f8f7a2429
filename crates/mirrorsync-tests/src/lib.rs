//! MirrorSync Testing Suite
//!
//! This crate provides cross-crate integration tests, property tests and
//! benchmarks for MirrorSync, along with the tree helpers they share.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Unified test utilities
///
/// Tree builders and readers used by the integration tests and benchmarks.
pub mod test_utils;

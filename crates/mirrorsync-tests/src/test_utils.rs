//! Shared helpers for building and inspecting directory trees

use filetime::FileTime;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Scratch source and destination roots inside one temporary directory
pub struct MirrorFixture {
    temp_dir: TempDir,
    /// Source root (created)
    pub source: PathBuf,
    /// Destination root (not created)
    pub destination: PathBuf,
}

impl MirrorFixture {
    /// Create a fixture with an empty source directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let source = temp_dir.path().join("source");
        let destination = temp_dir.path().join("destination");
        fs::create_dir_all(&source).expect("Failed to create source dir");
        Self {
            temp_dir,
            source,
            destination,
        }
    }

    /// Root of the temporary directory
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file under the source root
    pub fn source_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        write_file(&self.source, relative, content)
    }

    /// Write a file under the destination root
    pub fn destination_file(&self, relative: &str, content: &[u8]) -> PathBuf {
        write_file(&self.destination, relative, content)
    }
}

impl Default for MirrorFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `content` to `root/relative`, creating parent directories
pub fn write_file(root: &Path, relative: &str, content: &[u8]) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Create a tree from `(relative path, content)` pairs
pub fn build_tree(root: &Path, files: &[(&str, &[u8])]) {
    for (relative, content) in files {
        write_file(root, relative, content);
    }
}

/// Every file under `root`, keyed by relative path, with its contents
pub fn read_tree(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("Entry outside root")
                .to_path_buf();
            let content = fs::read(entry.path()).expect("Failed to read test file");
            (relative, content)
        })
        .collect()
}

/// Every directory under `root`, relative, excluding the root itself
pub fn read_directories(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect()
}

/// Modification times of every file under `root`
pub fn mtimes(root: &Path) -> BTreeMap<PathBuf, FileTime> {
    WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let metadata = entry.metadata().expect("Failed to stat test file");
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("Entry outside root")
                .to_path_buf();
            (relative, FileTime::from_last_modification_time(&metadata))
        })
        .collect()
}

/// Generate deterministic, non-repeating test data
pub fn generate_test_data(size: usize) -> Vec<u8> {
    (0..size).map(|i| ((i * 7 + 13) % 251) as u8).collect()
}

//! Source tree walking
//!
//! Both passes of a mirror run classify entries the same way so that the
//! counted total always matches the number of progress events:
//!
//! - directories are mirrored and descended into;
//! - regular files, and symlinks resolving to regular files, are mirrored as
//!   files (content is read through the link);
//! - symlinks to directories are not followed, and broken links, sockets and
//!   FIFOs are left out.

use mirrorsync_types::{FileEntry, Result, SyncError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// How a walked entry is mirrored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Recreated as a directory
    Directory,
    /// Compared and copied as a file
    File,
    /// Not mirrored
    Skipped,
}

impl EntryKind {
    fn of(entry: &DirEntry) -> Self {
        let file_type = entry.file_type();
        if file_type.is_dir() {
            Self::Directory
        } else if file_type.is_file() {
            Self::File
        } else if file_type.is_symlink() {
            match fs::metadata(entry.path()) {
                Ok(target) if target.is_file() => Self::File,
                _ => Self::Skipped,
            }
        } else {
            Self::Skipped
        }
    }
}

/// Count every file under `root` that a mirror run would visit.
///
/// A missing root, or a root that is not a directory, counts as 0.
/// Entries that cannot be read are left out of the count.
pub fn count_files<P: AsRef<Path>>(root: P) -> u64 {
    let root = root.as_ref();
    if !root.is_dir() {
        return 0;
    }

    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| EntryKind::of(entry) == EntryKind::File)
        .count() as u64
}

/// A mirrored entry produced by [`MirrorWalk`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkItem {
    /// Directory to recreate; the first item is always the root itself
    Directory(FileEntry),
    /// File to compare and copy
    File(FileEntry),
}

impl WalkItem {
    /// The underlying entry
    pub fn entry(&self) -> &FileEntry {
        match self {
            Self::Directory(entry) | Self::File(entry) => entry,
        }
    }
}

/// Depth-first walk of a source tree mapped onto a destination root.
///
/// Parents come before their children and siblings are sorted by file name,
/// so the order is identical across runs and platforms.
pub struct MirrorWalk {
    source_root: PathBuf,
    destination_root: PathBuf,
    inner: walkdir::IntoIter,
}

impl MirrorWalk {
    /// Walk `source_root`, mapping entries onto `destination_root`
    pub fn new<S: AsRef<Path>, D: AsRef<Path>>(source_root: S, destination_root: D) -> Self {
        let source_root = source_root.as_ref().to_path_buf();
        let inner = WalkDir::new(&source_root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        Self {
            source_root,
            destination_root: destination_root.as_ref().to_path_buf(),
            inner,
        }
    }

    fn entry_for(&self, entry: &DirEntry) -> Result<FileEntry> {
        let relative = entry
            .path()
            .strip_prefix(&self.source_root)
            .map_err(|_| SyncError::copy_failed(entry.path(), "entry is outside the source root"))?;

        Ok(FileEntry::new(
            relative,
            &self.source_root,
            &self.destination_root,
        ))
    }
}

impl Iterator for MirrorWalk {
    type Item = Result<WalkItem>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| self.source_root.clone(), Path::to_path_buf);
                    return Some(Err(SyncError::copy_failed(path, err)));
                }
            };

            let item = match EntryKind::of(&entry) {
                EntryKind::Directory => self.entry_for(&entry).map(WalkItem::Directory),
                EntryKind::File => self.entry_for(&entry).map(WalkItem::File),
                EntryKind::Skipped => {
                    debug!("Not mirroring {}", entry.path().display());
                    continue;
                }
            };
            return Some(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build(root: &Path, files: &[&str]) {
        for file in files {
            let path = root.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, file.as_bytes()).unwrap();
        }
    }

    #[test]
    fn test_count_files() {
        let temp_dir = TempDir::new().unwrap();
        build(
            temp_dir.path(),
            &["a.txt", "b.txt", "sub/c.txt", "sub/deep/d.txt", "e.bin"],
        );
        fs::create_dir_all(temp_dir.path().join("empty/dir")).unwrap();

        assert_eq!(count_files(temp_dir.path()), 5);
    }

    #[test]
    fn test_count_missing_root_is_zero() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(count_files(temp_dir.path().join("absent")), 0);
    }

    #[test]
    fn test_count_file_root_is_zero() {
        let temp_dir = TempDir::new().unwrap();
        build(temp_dir.path(), &["only.txt"]);
        assert_eq!(count_files(temp_dir.path().join("only.txt")), 0);
    }

    #[test]
    fn test_walk_order_is_sorted_depth_first() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        build(&source, &["b.txt", "a/z.txt", "a/y/x.txt", "c/w.txt"]);

        let order: Vec<(bool, PathBuf)> = MirrorWalk::new(&source, temp_dir.path().join("dst"))
            .map(|item| {
                let item = item.unwrap();
                let is_dir = matches!(item, WalkItem::Directory(_));
                (is_dir, item.entry().relative_path.clone())
            })
            .collect();

        let expected: Vec<(bool, PathBuf)> = vec![
            (true, PathBuf::new()),
            (true, PathBuf::from("a")),
            (true, Path::new("a").join("y")),
            (false, Path::new("a").join("y").join("x.txt")),
            (false, Path::new("a").join("z.txt")),
            (false, PathBuf::from("b.txt")),
            (true, PathBuf::from("c")),
            (false, Path::new("c").join("w.txt")),
        ];
        assert_eq!(order, expected);
    }

    #[test]
    fn test_walk_maps_destination() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        let destination = temp_dir.path().join("dst");
        build(&source, &["sub/b.txt"]);

        let file = MirrorWalk::new(&source, &destination)
            .filter_map(|item| match item.unwrap() {
                WalkItem::File(entry) => Some(entry),
                WalkItem::Directory(_) => None,
            })
            .next()
            .unwrap();

        assert_eq!(file.source, source.join("sub").join("b.txt"));
        assert_eq!(file.destination, destination.join("sub").join("b.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("src");
        build(&source, &["real.txt", "dir/inner.txt"]);
        std::os::unix::fs::symlink(source.join("real.txt"), source.join("link.txt")).unwrap();
        std::os::unix::fs::symlink(source.join("dir"), source.join("dirlink")).unwrap();
        std::os::unix::fs::symlink(source.join("gone"), source.join("broken")).unwrap();

        // real.txt, dir/inner.txt and link.txt; dirlink is not followed
        assert_eq!(count_files(&source), 3);

        let files = MirrorWalk::new(&source, temp_dir.path().join("dst"))
            .filter(|item| matches!(item, Ok(WalkItem::File(_))))
            .count();
        assert_eq!(files, 3);
    }
}

//! Byte-for-byte file comparison

use mirrorsync_types::{Result, SyncError};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

/// Smallest chunk used for comparison reads
const MIN_CHUNK: usize = 4 * 1024;

/// Check whether two files have identical contents.
///
/// Files of different lengths differ without being read. Otherwise both
/// files are read in `buffer_size` chunks until the first mismatch. Any read
/// failure is reported as [`SyncError::ComparisonFailed`] against the file
/// that failed.
pub fn files_identical(source: &Path, destination: &Path, buffer_size: usize) -> Result<bool> {
    let source_len = fs::metadata(source)
        .map_err(|e| SyncError::comparison_failed(source, e))?
        .len();
    let destination_len = fs::metadata(destination)
        .map_err(|e| SyncError::comparison_failed(destination, e))?
        .len();
    if source_len != destination_len {
        return Ok(false);
    }

    let mut source_file = File::open(source).map_err(|e| SyncError::comparison_failed(source, e))?;
    let mut destination_file =
        File::open(destination).map_err(|e| SyncError::comparison_failed(destination, e))?;

    let chunk = buffer_size.max(MIN_CHUNK);
    let mut left = vec![0u8; chunk];
    let mut right = vec![0u8; chunk];

    loop {
        let read_left =
            read_chunk(&mut source_file, &mut left).map_err(|e| SyncError::comparison_failed(source, e))?;
        let read_right = read_chunk(&mut destination_file, &mut right)
            .map_err(|e| SyncError::comparison_failed(destination, e))?;

        if read_left != read_right || left[..read_left] != right[..read_right] {
            return Ok(false);
        }
        if read_left == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows; returns the bytes read (0 at EOF)
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mirrorsync_types::ErrorKind;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case(b"".as_slice(), b"".as_slice(), true)]
    #[case(b"1".as_slice(), b"1".as_slice(), true)]
    #[case(b"1".as_slice(), b"2".as_slice(), false)]
    #[case(b"1".as_slice(), b"1-modified".as_slice(), false)]
    #[case(b"abc".as_slice(), b"abd".as_slice(), false)]
    fn test_small_files(#[case] left: &[u8], #[case] right: &[u8], #[case] identical: bool) {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        fs::write(&a, left).unwrap();
        fs::write(&b, right).unwrap();

        assert_eq!(files_identical(&a, &b, MIN_CHUNK).unwrap(), identical);
    }

    #[test]
    fn test_difference_past_first_chunk() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");

        let data: Vec<u8> = (0..3 * MIN_CHUNK + 17).map(|i| (i % 251) as u8).collect();
        let mut changed = data.clone();
        *changed.last_mut().unwrap() ^= 0xFF;
        fs::write(&a, &data).unwrap();
        fs::write(&b, &changed).unwrap();
        assert!(!files_identical(&a, &b, MIN_CHUNK).unwrap());

        fs::write(&b, &data).unwrap();
        assert!(files_identical(&a, &b, MIN_CHUNK).unwrap());
    }

    #[test]
    fn test_same_size_same_mtime_still_compared() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        let b = temp_dir.path().join("b");
        fs::write(&a, b"same-size-1").unwrap();
        fs::write(&b, b"same-size-2").unwrap();

        let mtime = filetime::FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&a, mtime).unwrap();
        filetime::set_file_mtime(&b, mtime).unwrap();

        assert!(!files_identical(&a, &b, 0).unwrap());
    }

    #[test]
    fn test_missing_file_is_comparison_failure() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a");
        fs::write(&a, b"1").unwrap();
        let missing = temp_dir.path().join("missing");

        let error = files_identical(&a, &missing, MIN_CHUNK).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::ComparisonFailed);
        assert_eq!(error.path(), Some(missing.as_path()));
    }
}

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::TransferError;

/// Read granularity for streamed file digests.
const READ_BUF_SIZE: usize = 64 * 1024;

/// Computes SHA-256 of `data` and returns the hex-encoded digest.
///
/// Pure function of the bytes — a retried chunk recomputes the
/// identical checksum for the identical byte range.
pub fn checksum_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Computes SHA-256 of an entire file without loading it into memory.
pub fn checksum_file(path: &Path) -> Result<String, TransferError> {
    checksum_file_with_progress(path, |_| {})
}

/// Streaming file digest with cumulative progress reporting.
///
/// `on_progress` receives `bytes_processed / file_size` after every
/// read, monotonically non-decreasing with a final call at `1.0`.
/// A read error aborts the computation; no partial digest is returned.
pub fn checksum_file_with_progress(
    path: &Path,
    mut on_progress: impl FnMut(f64),
) -> Result<String, TransferError> {
    let mut file = File::open(path)?;
    let total = file.metadata()?.len();

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; READ_BUF_SIZE];
    let mut processed: u64 = 0;

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
        processed += n as u64;
        if total > 0 {
            on_progress(processed as f64 / total as f64);
        }
    }

    // Empty files never enter the read loop; callers still expect the
    // terminal 1.0. A racing writer can also leave us short of the
    // metadata size, so always close out the scale.
    if total == 0 || processed < total {
        on_progress(1.0);
    }

    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut f = File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    #[test]
    fn bytes_digest_is_deterministic() {
        let a = checksum_bytes(b"hello world");
        let b = checksum_bytes(b"hello world");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn bytes_digest_known_vector() {
        // SHA-256 of the empty input.
        assert_eq!(
            checksum_bytes(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn file_digest_matches_bytes_digest() {
        let dir = TempDir::new().unwrap();
        let data = vec![0xa7u8; READ_BUF_SIZE * 2 + 17];
        let path = write_file(&dir, "blob.bin", &data);
        assert_eq!(checksum_file(&path).unwrap(), checksum_bytes(&data));
    }

    #[test]
    fn progress_is_monotonic_and_ends_at_one() {
        let dir = TempDir::new().unwrap();
        let data = vec![1u8; READ_BUF_SIZE * 3 + 5];
        let path = write_file(&dir, "blob.bin", &data);

        let mut seen = Vec::new();
        checksum_file_with_progress(&path, |f| seen.push(f)).unwrap();

        assert!(seen.len() >= 4);
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*seen.last().unwrap(), 1.0);
    }

    #[test]
    fn empty_file_reports_completion() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.bin", b"");

        let mut seen = Vec::new();
        let digest = checksum_file_with_progress(&path, |f| seen.push(f)).unwrap();

        assert_eq!(seen, vec![1.0]);
        assert_eq!(digest, checksum_bytes(b""));
    }

    #[test]
    fn missing_file_propagates_error() {
        let dir = TempDir::new().unwrap();
        let result = checksum_file(&dir.path().join("nope.bin"));
        assert!(matches!(result, Err(TransferError::Io(_))));
    }
}

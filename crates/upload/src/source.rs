//! Local files selected for upload.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use droplink_transfer::ByteRange;

/// An immutable local file queued for upload.
///
/// Size and name are captured at selection time; chunk payloads are
/// re-read from disk by byte range on every attempt, so a retried
/// chunk always re-derives the same bytes.
#[derive(Debug, Clone)]
pub struct LocalFile {
    path: PathBuf,
    name: String,
    size: u64,
    mime_type: String,
}

impl LocalFile {
    /// Captures metadata for the file at `path`.
    ///
    /// The MIME type is guessed from the extension, falling back to
    /// `application/octet-stream`.
    pub fn from_path(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let meta = std::fs::metadata(&path)?;
        if !meta.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a regular file", path.display()),
            ));
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let mime_type = mime_guess::from_path(&path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Ok(Self {
            path,
            name,
            size: meta.len(),
            mime_type,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Reads exactly the bytes of `range` from disk.
    pub fn read_range(&self, range: ByteRange) -> std::io::Result<Vec<u8>> {
        let mut buf = vec![0u8; range.len() as usize];
        if buf.is_empty() {
            return Ok(buf);
        }
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(range.start))?;
        file.read_exact(&mut buf)?;
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        File::create(&path).unwrap().write_all(data).unwrap();
        path
    }

    #[test]
    fn captures_name_size_and_mime() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "notes.txt", b"hello");

        let file = LocalFile::from_path(path).unwrap();
        assert_eq!(file.name(), "notes.txt");
        assert_eq!(file.size(), 5);
        assert_eq!(file.mime_type(), "text/plain");
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "blob.zzz9", b"x");
        let file = LocalFile::from_path(path).unwrap();
        assert_eq!(file.mime_type(), "application/octet-stream");
    }

    #[test]
    fn read_range_returns_exact_slice() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "data.bin", b"0123456789");
        let file = LocalFile::from_path(path).unwrap();

        let bytes = file
            .read_range(ByteRange { start: 3, end: 7 })
            .unwrap();
        assert_eq!(&bytes, b"3456");
    }

    #[test]
    fn read_empty_range_without_touching_disk() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "empty.bin", b"");
        let file = LocalFile::from_path(path).unwrap();

        let bytes = file.read_range(ByteRange { start: 0, end: 0 }).unwrap();
        assert!(bytes.is_empty());
    }

    #[test]
    fn directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert!(LocalFile::from_path(dir.path()).is_err());
    }
}

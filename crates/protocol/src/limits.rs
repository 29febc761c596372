//! Client-side configuration constants for the upload pipeline.

/// Default chunk size: 250 KiB.
///
/// Chunks are independent multipart uploads, so the size trades
/// per-request overhead against retry granularity.
pub const DEFAULT_CHUNK_SIZE: u64 = 250 * 1024;

/// Default worker-pool width for concurrent chunk uploads.
///
/// The bound applies globally across all files of one transfer.
pub const DEFAULT_MAX_CONCURRENT_UPLOADS: usize = 4;

/// Attempts per chunk before the upload is considered failed.
pub const DEFAULT_CHUNK_UPLOAD_RETRIES: u32 = 3;

/// Largest single file accepted client-side: 5 GiB.
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024 * 1024;

/// Largest aggregate transfer accepted client-side: 10 GiB.
pub const MAX_TOTAL_SIZE_BYTES: u64 = 10 * 1024 * 1024 * 1024;

/// Length of a hex-encoded SHA-256 digest.
pub const CHECKSUM_HEX_LEN: usize = 64;

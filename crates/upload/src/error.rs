//! Upload error taxonomy.
//!
//! Variants map to distinct user-facing failure classes: validation
//! aborts before any network call, registration failures mean no chunk
//! was attempted, chunk failures carry the exhausted attempt's error,
//! and finalization failures mean the bytes are stored server-side but
//! the transfer was not sealed.

use droplink_client::ApiError;
use droplink_protocol::ValidationError;
use droplink_transfer::TransferError;

/// Errors produced while orchestrating a transfer upload.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("no files to upload")]
    NoFiles,

    #[error("{name} is {size} bytes, over the {limit}-byte per-file limit")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("transfer is {size} bytes in total, over the {limit}-byte limit")]
    TotalTooLarge { size: u64, limit: u64 },

    #[error("chunk request validation failed: {0}")]
    Schema(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("transfer error: {0}")]
    Transfer(#[from] TransferError),

    #[error("transfer registration failed: {0}")]
    Registration(#[source] ApiError),

    #[error("chunk {chunk_index} of {file_name} failed after {attempts} attempt(s): {source}")]
    Chunk {
        file_name: String,
        chunk_index: u32,
        attempts: u32,
        #[source]
        source: ApiError,
    },

    #[error("transfer finalization failed (uploaded chunks are stored): {0}")]
    Finalize(#[source] ApiError),

    #[error("server registered unknown file {0}")]
    UnknownRemoteFile(String),
}

//! Core primitives of the chunked upload pipeline.
//!
//! Three independent leaves, composed by the `droplink-upload` crate:
//!
//! - [`plan`] — byte-range arithmetic: which slice is chunk `i`?
//! - [`checksum`] — streaming SHA-256 digests for files and chunks
//! - [`queue`] — order-preserving execution with bounded concurrency

pub mod checksum;
pub mod plan;
pub mod queue;

pub use checksum::{checksum_bytes, checksum_file, checksum_file_with_progress};
pub use plan::{ByteRange, ChunkPlan};
pub use queue::run_limited;

/// Errors produced by the transfer primitives.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("chunk size must be non-zero")]
    ZeroChunkSize,

    #[error("{file_size}-byte file at chunk size {chunk_size} exceeds the chunk-count limit")]
    TooManyChunks { file_size: u64, chunk_size: u64 },

    #[error("chunk index {index} out of range 1..={total}")]
    ChunkIndexOutOfRange { index: u32, total: u32 },
}

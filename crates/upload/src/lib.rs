//! Upload orchestration for the droplink client.
//!
//! This crate drives one whole multi-file transfer from registration to
//! finalization. It is a library with no UI dependencies — progress is
//! pushed as typed [`UploadEvent`]s on a channel the caller consumes.
//!
//! # Pipeline
//!
//! 1. **Validate** — client-side size limits, before any network call
//! 2. **Checksum** — per-file digests, sequential in submission order
//! 3. **Register** — `POST /api/transfer`; server ids are authoritative
//! 4. **Upload** — one flat chunk-task list across all files, driven
//!    through the bounded queue with per-chunk retries
//! 5. **Finalize** — seal the transfer only after every chunk succeeded

pub mod api;
mod chunk_task;
pub mod error;
pub mod events;
pub mod orchestrator;
pub mod source;

pub use api::TransferApi;
pub use error::UploadError;
pub use events::{UploadEvent, format_size};
pub use orchestrator::{UploadConfig, UploadOrchestrator};
pub use source::LocalFile;

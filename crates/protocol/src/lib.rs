//! Wire protocol types for the droplink file-transfer service.
//!
//! All request/response DTOs use camelCase field names on the wire to
//! match the server's JSON conventions. This crate carries no I/O —
//! it is shared by the HTTP client, the upload pipeline, and the CLI.

pub mod limits;
pub mod messages;
pub mod types;
pub mod validation;

pub use messages::{
    ChunkRequest, FileRequest, FileResponse, LoginRequest, LoginResponse,
    StartTransferRequest, TransferResponse,
};
pub use types::{Role, SharedLink, StorageInfo, User};
pub use validation::{ValidationError, validate_chunk_request};

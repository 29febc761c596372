use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::types::SharedLink;

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

/// Registers a new transfer with per-file metadata.
///
/// `total_chunks` is the client's own computation; the server echoes the
/// authoritative count back in [`FileResponse`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransferRequest {
    pub start_time: NaiveDateTime,
    pub files: Vec<FileRequest>,
}

/// Per-file metadata sent at transfer registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRequest {
    pub file_name: String,
    pub file_type: String,
    pub file_size: u64,
    pub file_checksum: String,
    pub chunk_size: u64,
    pub total_chunks: u32,
}

/// Metadata fields of one chunk upload.
///
/// The chunk payload itself travels as the `multipartFile` part of the
/// multipart/form-data request and is not part of this struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkRequest {
    pub file_id: i64,
    /// 1-based, dense across `1..=total_chunks`.
    pub chunk_index: u32,
    /// Bytes in this slice; the last chunk of a file may be smaller.
    pub chunk_size: u64,
    /// Hex-encoded SHA-256 of exactly the payload bytes.
    pub chunk_checksum: String,
}

/// Credentials for `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ---------------------------------------------------------------------------
// Response payloads
// ---------------------------------------------------------------------------

/// Token grant returned by the auth endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: crate::types::Role,
}

/// Server-assigned identity and chunk plan for one registered file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileResponse {
    pub id: i64,
    pub file_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_path: String,
    pub file_type: String,
    pub file_size: u64,
    pub file_checksum: String,
    /// Authoritative chunk count the client must honor.
    pub total_chunks: u32,
}

/// The server's read model of a transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferResponse {
    pub id: i64,
    pub start_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<NaiveDateTime>,
    /// Owning account; present on the owner's own read model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<crate::types::User>,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<FileResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shared_link: Option<SharedLink>,
}

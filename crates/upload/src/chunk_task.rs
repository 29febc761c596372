//! One chunk's upload: re-derive, checksum, validate, send, retry.

use std::num::NonZeroU32;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use droplink_client::api::ProgressFn;
use droplink_protocol::messages::{ChunkRequest, FileResponse};
use droplink_protocol::validate_chunk_request;
use droplink_transfer::{ByteRange, ChunkPlan, checksum_bytes};

use crate::api::TransferApi;
use crate::error::UploadError;
use crate::events::{UploadEvent, format_size};
use crate::source::LocalFile;

/// The byte count an acknowledged chunk contributed.
#[derive(Debug)]
pub(crate) struct ChunkOutcome {
    pub size: u64,
}

/// Uploads one chunk with a linear retry loop.
///
/// Every attempt re-reads the byte range from disk and recomputes the
/// checksum, so retries are idempotent with respect to content. The
/// last attempt's error is surfaced verbatim; schema validation errors
/// and non-transient API errors (auth, 4xx) fail immediately without
/// burning attempts.
pub(crate) async fn upload_chunk_with_retry(
    api: &dyn TransferApi,
    local: &LocalFile,
    remote: &FileResponse,
    plan: ChunkPlan,
    chunk_index: u32,
    retries: NonZeroU32,
    events: &mpsc::Sender<UploadEvent>,
) -> Result<ChunkOutcome, UploadError> {
    let range = plan.slice(chunk_index)?;

    let _ = events
        .send(UploadEvent::Status(format!(
            "Uploading chunk {}/{} for {} ({})",
            chunk_index,
            remote.total_chunks,
            remote.file_name,
            format_size(range.len())
        )))
        .await;
    let _ = events
        .send(UploadEvent::ChunkStarted {
            file_name: remote.file_name.clone(),
            chunk_index,
            total_chunks: remote.total_chunks,
            size: range.len(),
        })
        .await;

    // Byte progress comes from inside the transport stream; lossy
    // try_send keeps the stream from blocking on a slow UI.
    let progress: ProgressFn = {
        let tx = events.clone();
        Arc::new(move |bytes| {
            let _ = tx.try_send(UploadEvent::ChunkProgress { bytes });
        })
    };

    let mut attempt = 1u32;
    loop {
        let payload = read_payload(local, range).await?;
        let req = ChunkRequest {
            file_id: remote.id,
            chunk_index,
            chunk_size: range.len(),
            chunk_checksum: checksum_bytes(&payload),
        };
        validate_chunk_request(&req)?;

        match api
            .upload_chunk(
                req,
                Bytes::from(payload),
                remote.file_name.clone(),
                Some(progress.clone()),
            )
            .await
        {
            Ok(_) => {
                debug!(file = %remote.file_name, chunk = chunk_index, attempt, "chunk acknowledged");
                let _ = events
                    .send(UploadEvent::ChunkCompleted {
                        file_name: remote.file_name.clone(),
                        chunk_index,
                    })
                    .await;
                return Ok(ChunkOutcome { size: range.len() });
            }
            Err(err) if attempt < retries.get() && err.is_transient() => {
                warn!(
                    file = %remote.file_name,
                    chunk = chunk_index,
                    attempt,
                    error = %err,
                    "chunk upload attempt failed, retrying"
                );
                attempt += 1;
            }
            Err(err) => {
                return Err(UploadError::Chunk {
                    file_name: remote.file_name.clone(),
                    chunk_index,
                    attempts: attempt,
                    source: err,
                });
            }
        }
    }
}

async fn read_payload(local: &LocalFile, range: ByteRange) -> Result<Vec<u8>, UploadError> {
    let local = local.clone();
    let bytes = tokio::task::spawn_blocking(move || local.read_range(range))
        .await
        .map_err(std::io::Error::other)??;
    Ok(bytes)
}

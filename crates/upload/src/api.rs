//! Abstract transfer API surface.
//!
//! The orchestrator talks to the server through this trait instead of
//! [`ApiClient`] directly, keeping upload logic decoupled from the HTTP
//! stack and testable with mocks.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use droplink_client::{ApiClient, ApiError, api::ProgressFn};
use droplink_protocol::messages::{ChunkRequest, StartTransferRequest, TransferResponse};

type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// The three server operations the upload pipeline needs.
pub trait TransferApi: Send + Sync {
    /// Registers a transfer and returns server-assigned file ids.
    fn start_transfer(&self, req: StartTransferRequest) -> ApiFuture<'_, TransferResponse>;

    /// Uploads one chunk; resolves to the server's ack body.
    fn upload_chunk(
        &self,
        req: ChunkRequest,
        payload: Bytes,
        file_name: String,
        on_progress: Option<ProgressFn>,
    ) -> ApiFuture<'_, serde_json::Value>;

    /// Seals a fully-uploaded transfer.
    fn finish_transfer(&self, id: i64) -> ApiFuture<'_, TransferResponse>;
}

impl TransferApi for ApiClient {
    fn start_transfer(&self, req: StartTransferRequest) -> ApiFuture<'_, TransferResponse> {
        Box::pin(async move { ApiClient::start_transfer(self, &req).await })
    }

    fn upload_chunk(
        &self,
        req: ChunkRequest,
        payload: Bytes,
        file_name: String,
        on_progress: Option<ProgressFn>,
    ) -> ApiFuture<'_, serde_json::Value> {
        Box::pin(async move {
            ApiClient::upload_chunk(self, &req, payload, &file_name, on_progress).await
        })
    }

    fn finish_transfer(&self, id: i64) -> ApiFuture<'_, TransferResponse> {
        Box::pin(async move { ApiClient::finish_transfer(self, id).await })
    }
}

//! REST client for the droplink server.
//!
//! Request-building closures are re-invoked for the refresh-and-retry
//! path, so bodies (including multipart chunk payloads) are rebuilt
//! rather than cloned from a spent request.

use std::pin::Pin;
use std::sync::Arc;

use bytes::Bytes;
use futures_util::Stream;
use reqwest::{StatusCode, multipart};
use tracing::{debug, warn};

use droplink_protocol::messages::{
    ChunkRequest, LoginRequest, LoginResponse, StartTransferRequest, TransferResponse,
};
use droplink_protocol::types::{SharedLinkPatch, StorageInfo};

use crate::error::ApiError;
use crate::session::Session;

/// Byte-progress callback invoked as the request body is streamed out.
pub type ProgressFn = Arc<dyn Fn(u64) + Send + Sync>;

/// Hook for the out-of-band token refresh flow.
///
/// Invoked once when a request comes back 401; the returned token
/// replaces the session token and the request is retried. Without a
/// refresher a 401 surfaces as [`ApiError::AuthRequired`].
pub trait TokenRefresher: Send + Sync {
    fn refresh(&self) -> Pin<Box<dyn Future<Output = Result<String, ApiError>> + Send + '_>>;
}

/// Granularity of streamed multipart chunk bodies.
const BODY_PIECE_SIZE: usize = 16 * 1024;

/// Authenticated client for the droplink HTTP API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<Session>,
    refresher: Option<Box<dyn TokenRefresher>>,
}

impl ApiClient {
    /// Creates a client for the service at `base_url`.
    pub fn new(base_url: impl Into<String>, session: Arc<Session>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: reqwest::Client::new(),
            base_url,
            session,
            refresher: None,
        }
    }

    /// Installs the 401 refresh hook.
    pub fn with_refresher(mut self, refresher: Box<dyn TokenRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Returns the session this client authenticates with.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    // -----------------------------------------------------------------
    // Auth
    // -----------------------------------------------------------------

    /// Signs in and stores the token grant in the session.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.authenticate("/auth/login", email, password).await
    }

    /// Registers a new account and stores the token grant.
    pub async fn register(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        self.authenticate("/auth/register", email, password).await
    }

    async fn authenticate(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<LoginResponse, ApiError> {
        let req = LoginRequest {
            email: email.into(),
            password: password.into(),
        };
        let resp = self.http.post(self.url(path)).json(&req).send().await?;
        let resp = check_status(resp).await?;
        let grant: LoginResponse = resp.json().await?;
        self.session.store_grant(&grant)?;
        debug!(email = %grant.email, "signed in");
        Ok(grant)
    }

    // -----------------------------------------------------------------
    // Transfer lifecycle
    // -----------------------------------------------------------------

    /// Registers a transfer; the response carries server-assigned file
    /// ids and authoritative chunk counts.
    pub async fn start_transfer(
        &self,
        req: &StartTransferRequest,
    ) -> Result<TransferResponse, ApiError> {
        let resp = self
            .send_authorized(&|| Ok(self.http.post(self.url("/api/transfer")).json(req)))
            .await?;
        Ok(resp.json().await?)
    }

    /// Uploads one chunk as `multipart/form-data`.
    ///
    /// `payload` is `Bytes` so the retry path can rebuild the form
    /// without copying the chunk. Returns the server's ack body.
    pub async fn upload_chunk(
        &self,
        req: &ChunkRequest,
        payload: Bytes,
        file_name: &str,
        on_progress: Option<ProgressFn>,
    ) -> Result<serde_json::Value, ApiError> {
        let resp = self
            .send_authorized(&|| {
                let body = progress_body(payload.clone(), on_progress.clone());
                let part = multipart::Part::stream_with_length(body, payload.len() as u64)
                    .file_name(file_name.to_string())
                    .mime_str("application/octet-stream")?;
                let form = multipart::Form::new()
                    .text("fileId", req.file_id.to_string())
                    .text("chunkIndex", req.chunk_index.to_string())
                    .text("chunkSize", req.chunk_size.to_string())
                    .text("chunkChecksum", req.chunk_checksum.clone())
                    .part("multipartFile", part);
                Ok(self.http.post(self.url("/api/upload")).multipart(form))
            })
            .await?;
        Ok(resp.json().await?)
    }

    /// Seals a fully-uploaded transfer and returns its summary
    /// (including the shared link).
    pub async fn finish_transfer(&self, id: i64) -> Result<TransferResponse, ApiError> {
        let url = self.url(&format!("/api/transfer/{id}/finish"));
        let resp = self
            .send_authorized(&|| Ok(self.http.post(&url).json(&serde_json::json!({}))))
            .await?;
        Ok(resp.json().await?)
    }

    // -----------------------------------------------------------------
    // Read model
    // -----------------------------------------------------------------

    pub async fn get_transfer(&self, id: i64) -> Result<TransferResponse, ApiError> {
        let url = self.url(&format!("/api/transfer/{id}"));
        let resp = self.send_authorized(&|| Ok(self.http.get(&url))).await?;
        Ok(resp.json().await?)
    }

    /// Recipient view: resolves a transfer from its shared-link UUID.
    pub async fn get_transfer_by_link(&self, uuid: &str) -> Result<TransferResponse, ApiError> {
        let url = self.url(&format!("/api/transfer/uuid/{uuid}"));
        let resp = self.send_authorized(&|| Ok(self.http.get(&url))).await?;
        Ok(resp.json().await?)
    }

    pub async fn list_transfers(&self) -> Result<Vec<TransferResponse>, ApiError> {
        let url = self.url("/api/transfer");
        let resp = self.send_authorized(&|| Ok(self.http.get(&url))).await?;
        Ok(resp.json().await?)
    }

    pub async fn delete_transfer(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/api/transfer/{id}"));
        self.send_authorized(&|| Ok(self.http.delete(&url))).await?;
        Ok(())
    }

    // -----------------------------------------------------------------
    // Shared links & storage
    // -----------------------------------------------------------------

    /// Edits a shared link's expiry or download limit.
    pub async fn update_shared_link(
        &self,
        id: i64,
        patch: &SharedLinkPatch,
    ) -> Result<(), ApiError> {
        let url = self.url(&format!("/sharedLinks/{id}"));
        self.send_authorized(&|| Ok(self.http.put(&url).json(patch)))
            .await?;
        Ok(())
    }

    pub async fn delete_shared_link(&self, id: i64) -> Result<(), ApiError> {
        let url = self.url(&format!("/sharedLinks/{id}"));
        self.send_authorized(&|| Ok(self.http.delete(&url))).await?;
        Ok(())
    }

    pub async fn storage_info(&self) -> Result<StorageInfo, ApiError> {
        let url = self.url("/storage/info");
        let resp = self.send_authorized(&|| Ok(self.http.get(&url))).await?;
        Ok(resp.json().await?)
    }

    /// Bytes used by the signed-in user.
    pub async fn user_storage_usage(&self) -> Result<u64, ApiError> {
        let url = self.url("/storage/info/current-user");
        let resp = self.send_authorized(&|| Ok(self.http.get(&url))).await?;
        Ok(resp.json().await?)
    }

    // -----------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------

    /// Sends an authorized request, transparently refreshing the token
    /// and retrying once on 401.
    async fn send_authorized(
        &self,
        build: &(dyn Fn() -> Result<reqwest::RequestBuilder, reqwest::Error> + Sync),
    ) -> Result<reqwest::Response, ApiError> {
        let token = self.session.token().ok_or(ApiError::AuthRequired)?;
        let resp = build()?.bearer_auth(&token).send().await?;
        if resp.status() != StatusCode::UNAUTHORIZED {
            return check_status(resp).await;
        }

        debug!("token rejected, refreshing and retrying once");
        let fresh = self.refreshed_token().await?;
        let resp = build()?.bearer_auth(&fresh).send().await?;
        check_status(resp).await
    }

    /// Runs the refresh hook and installs the new token.
    ///
    /// Any refresh failure collapses to [`ApiError::AuthRequired`]: the
    /// caller's request was rejected for auth reasons, and the refresh
    /// hook's own error is an implementation detail of that.
    async fn refreshed_token(&self) -> Result<String, ApiError> {
        let Some(refresher) = &self.refresher else {
            warn!("request rejected with 401 and no refresh hook installed");
            return Err(ApiError::AuthRequired);
        };
        match refresher.refresh().await {
            Ok(token) => {
                self.session.replace_token(token.clone())?;
                Ok(token)
            }
            Err(err) => {
                warn!(error = %err, "token refresh failed");
                Err(ApiError::AuthRequired)
            }
        }
    }
}

/// Maps non-success statuses to [`ApiError::Status`] with the body text.
async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::AuthRequired);
    }
    let message = resp.text().await.unwrap_or_default();
    Err(ApiError::Status { status, message })
}

/// Streams `payload` in fixed-size pieces, reporting each piece to
/// `on_progress` as it is handed to the transport.
fn progress_stream(
    payload: Bytes,
    on_progress: Option<ProgressFn>,
) -> impl Stream<Item = Result<Bytes, std::convert::Infallible>> + Send + 'static {
    futures_util::stream::unfold(payload, move |mut rest| {
        let on_progress = on_progress.clone();
        async move {
            if rest.is_empty() {
                return None;
            }
            let piece = rest.split_to(rest.len().min(BODY_PIECE_SIZE));
            if let Some(cb) = &on_progress {
                cb(piece.len() as u64);
            }
            Some((Ok(piece), rest))
        }
    })
}

fn progress_body(payload: Bytes, on_progress: Option<ProgressFn>) -> reqwest::Body {
    reqwest::Body::wrap_stream(progress_stream(payload, on_progress))
}

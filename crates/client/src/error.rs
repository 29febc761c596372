use reqwest::StatusCode;

/// Errors from the HTTP API client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    #[error("not authenticated (sign in first)")]
    AuthRequired,

    #[error("session error: {0}")]
    Session(#[from] crate::session::SessionError),
}

impl ApiError {
    /// True for failures worth retrying at the chunk level: transport
    /// errors and server-side (5xx) statuses. Client-side statuses mean
    /// the request itself is wrong and will not improve on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Http(_) => true,
            ApiError::Status { status, .. } => status.is_server_error(),
            ApiError::AuthRequired | ApiError::Session(_) => false,
        }
    }
}

//! Authenticated HTTP client for the droplink transfer API.
//!
//! [`ApiClient`] wraps `reqwest` with bearer-token injection from a
//! shared [`Session`] and a single transparent refresh-and-retry on
//! 401 responses. Endpoint methods mirror the server's REST surface;
//! the upload pipeline in `droplink-upload` drives them.

pub mod api;
pub mod error;
pub mod session;

pub use api::{ApiClient, ProgressFn, TokenRefresher};
pub use error::ApiError;
pub use session::{Session, SessionError, default_session_path};

//! Bearer-token session state with optional on-disk persistence.
//!
//! The session replaces ambient browser storage: it is created once,
//! injected into [`crate::ApiClient`], and threaded through the upload
//! pipeline explicitly.

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use droplink_protocol::Role;
use droplink_protocol::messages::LoginResponse;

/// Errors from session persistence.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
}

/// Authenticated-user context: bearer token plus identity.
///
/// State is cached in memory behind an `RwLock` and, when constructed
/// with [`Session::load`], mirrored to a JSON file so the CLI stays
/// signed in across invocations.
pub struct Session {
    path: Option<PathBuf>,
    data: RwLock<SessionData>,
}

impl Session {
    /// Creates a session persisted at `path`, loading existing state.
    pub fn load(path: PathBuf) -> Result<Self, SessionError> {
        let data = read_session(&path)?;
        Ok(Self {
            path: Some(path),
            data: RwLock::new(data),
        })
    }

    /// Creates a memory-only session (used in tests and one-shot flows).
    pub fn in_memory() -> Self {
        Self {
            path: None,
            data: RwLock::new(SessionData::default()),
        }
    }

    /// Returns the current bearer token, if signed in.
    pub fn token(&self) -> Option<String> {
        self.data.read().unwrap().token.clone()
    }

    /// Returns the signed-in email, if any.
    pub fn email(&self) -> Option<String> {
        self.data.read().unwrap().email.clone()
    }

    /// Returns the signed-in role, if any.
    pub fn role(&self) -> Option<Role> {
        self.data.read().unwrap().role
    }

    /// Stores a fresh token grant and persists it.
    pub fn store_grant(&self, grant: &LoginResponse) -> Result<(), SessionError> {
        {
            let mut data = self.data.write().unwrap();
            data.token = Some(grant.token.clone());
            data.email = Some(grant.email.clone());
            data.role = Some(grant.role);
        }
        self.persist()
    }

    /// Replaces only the token, keeping identity fields (refresh flow).
    pub fn replace_token(&self, token: String) -> Result<(), SessionError> {
        self.data.write().unwrap().token = Some(token);
        self.persist()
    }

    /// Signs out: clears state and removes the persisted file.
    pub fn clear(&self) -> Result<(), SessionError> {
        *self.data.write().unwrap() = SessionData::default();
        if let Some(path) = &self.path
            && path.exists()
        {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = self.data.read().unwrap();
        let json = serde_json::to_string_pretty(&*data)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        debug!("persisted session to {:?}", path);
        Ok(())
    }
}

fn read_session(path: &Path) -> Result<SessionData, SessionError> {
    if !path.exists() {
        return Ok(SessionData::default());
    }
    let raw = std::fs::read_to_string(path)?;
    let data: SessionData = serde_json::from_str(&raw)?;
    debug!("loaded session from {:?}", path);
    Ok(data)
}

/// Returns the default session file path.
pub fn default_session_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("droplink").join("session.json"))
}

/// Returns the platform-specific config directory.
fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join(".config"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn grant() -> LoginResponse {
        LoginResponse {
            token: "tok-1".into(),
            email: "a@b.example".into(),
            role: Role::User,
        }
    }

    #[test]
    fn empty_session_has_no_token() {
        let session = Session::in_memory();
        assert!(session.token().is_none());
        assert!(session.email().is_none());
    }

    #[test]
    fn store_grant_then_read_back() {
        let session = Session::in_memory();
        session.store_grant(&grant()).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-1"));
        assert_eq!(session.role(), Some(Role::User));
    }

    #[test]
    fn persists_and_reloads_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let session = Session::load(path.clone()).unwrap();
        session.store_grant(&grant()).unwrap();

        let reloaded = Session::load(path).unwrap();
        assert_eq!(reloaded.token().as_deref(), Some("tok-1"));
        assert_eq!(reloaded.email().as_deref(), Some("a@b.example"));
    }

    #[test]
    fn replace_token_keeps_identity() {
        let session = Session::in_memory();
        session.store_grant(&grant()).unwrap();
        session.replace_token("tok-2".into()).unwrap();
        assert_eq!(session.token().as_deref(), Some("tok-2"));
        assert_eq!(session.email().as_deref(), Some("a@b.example"));
    }

    #[test]
    fn clear_removes_file_and_state() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let session = Session::load(path.clone()).unwrap();
        session.store_grant(&grant()).unwrap();
        assert!(path.exists());

        session.clear().unwrap();
        assert!(!path.exists());
        assert!(session.token().is_none());
    }

    #[test]
    fn corrupt_file_surfaces_json_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(Session::load(path), Err(SessionError::Json(_))));
    }
}

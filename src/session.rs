//! Session context for authenticated function calls.
//!
//! The session token is issued elsewhere (login is not handled here) and
//! persisted locally as JSON. Every remote call takes a [`Session`]
//! explicitly; an absent session surfaces as [`ApiError::NoSession`]
//! before anything is dispatched.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// An authenticated actor.
#[derive(Debug, Clone)]
pub struct Session {
    token: SecretString,
    /// Display name of the signed-in user, when known.
    pub fullname: Option<String>,
    pub user_id: Option<String>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            fullname: None,
            user_id: None,
        }
    }

    pub fn with_fullname(mut self, fullname: impl Into<String>) -> Self {
        self.fullname = Some(fullname.into());
        self
    }

    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Header value for `X-Parse-Session-Token`.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

/// On-disk shape of a stored session.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredSession {
    #[serde(default, rename = "sessionToken")]
    session_token: Option<String>,
    #[serde(default)]
    fullname: Option<String>,
    #[serde(default, rename = "userId")]
    user_id: Option<String>,
    /// When the session was stored (Unix timestamp).
    #[serde(default)]
    stored_at: Option<i64>,
}

/// File-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored session, if any.
    ///
    /// A file without a token (or with a blank one) counts as no session.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read session file: {}", self.path.display()))?;
        let stored: StoredSession = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse session file: {}", self.path.display()))?;

        let Some(token) = stored.session_token.filter(|t| !t.trim().is_empty()) else {
            return Ok(None);
        };

        Ok(Some(Session {
            token: SecretString::from(token),
            fullname: stored.fullname,
            user_id: stored.user_id,
        }))
    }

    /// Load the session or fail with [`ApiError::NoSession`].
    ///
    /// An unreadable session file is logged and treated as absent.
    pub fn require(&self) -> Result<Session, ApiError> {
        match self.load() {
            Ok(Some(session)) => Ok(session),
            Ok(None) => Err(ApiError::NoSession),
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring unreadable session file");
                Err(ApiError::NoSession)
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create session directory: {}", parent.display())
                })?;
            }
        }

        let stored = StoredSession {
            session_token: Some(session.token().to_string()),
            fullname: session.fullname.clone(),
            user_id: session.user_id.clone(),
            stored_at: Some(Utc::now().timestamp()),
        };
        let content =
            serde_json::to_string_pretty(&stored).context("Failed to serialize session")?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        Ok(())
    }

    /// Remove the stored session. Missing files are fine.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).with_context(|| {
                format!("Failed to delete session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_no_session() -> Result<()> {
        let dir = TempDir::new()?;
        let store = SessionStore::new(dir.path().join("session.json"));
        assert!(store.load()?.is_none());
        assert!(matches!(store.require(), Err(ApiError::NoSession)));
        Ok(())
    }

    #[test]
    fn save_then_require_round_trips_token_and_name() -> Result<()> {
        let dir = TempDir::new()?;
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));
        store.save(&Session::new("r:abc123").with_fullname("Ana Souza"))?;

        let session = store.require()?;
        assert_eq!(session.token(), "r:abc123");
        assert_eq!(session.fullname.as_deref(), Some("Ana Souza"));
        Ok(())
    }

    #[test]
    fn blank_token_counts_as_missing() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"sessionToken": "  "}"#)?;
        let store = SessionStore::new(path);
        assert!(store.load()?.is_none());
        Ok(())
    }

    #[test]
    fn clear_removes_the_session() -> Result<()> {
        let dir = TempDir::new()?;
        let store = SessionStore::new(dir.path().join("session.json"));
        store.save(&Session::new("tok"))?;
        store.clear()?;
        store.clear()?;
        assert!(store.load()?.is_none());
        Ok(())
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::new("super-secret");
        assert!(!format!("{session:?}").contains("super-secret"));
    }
}

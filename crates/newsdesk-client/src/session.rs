//! Authenticated session handling
//!
//! The backend issues an opaque token at login; every authenticated call
//! carries it as a bearer credential. The token survives restarts in a
//! small JSON file (the console analog of the original panel's
//! browser-local storage).

use chrono::{DateTime, Utc};
use newsdesk_core::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// An authenticated admin session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    /// Opaque auth token issued by the backend
    pub token: String,

    /// Username the token was issued for
    pub username: String,

    /// When the session was obtained
    pub obtained_at: DateTime<Utc>,
}

impl Session {
    /// Create a session from a freshly issued token
    #[must_use]
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            obtained_at: Utc::now(),
        }
    }
}

/// On-disk persistence for [`Session`]
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Create a store backed by the given file path
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file path this store reads and writes
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if one exists
    ///
    /// A missing file is not an error; a file that exists but cannot be
    /// parsed is.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(&self.path)?;
        let session: Session = serde_json::from_str(&raw)?;
        debug!(username = %session.username, "loaded persisted session");
        Ok(Some(session))
    }

    /// Persist a session, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let raw = serde_json::to_string_pretty(session)?;
        std::fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), "session persisted");
        Ok(())
    }

    /// Remove the persisted session, if any
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used, clippy::uninlined_format_args)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_session_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        assert_eq!(store.load().unwrap(), None);

        let session = Session::new("tok-123", "admin");
        store.save(&session).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, Some(session));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested/deeper/session.json"));
        store.save(&Session::new("tok", "admin")).unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_corrupt_session_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "not json").unwrap();
        let store = SessionStore::new(path);
        assert!(store.load().is_err());
    }
}

//! Session identity: the logged-in username.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected view reads the identity on mount, login sets it and logout
//! clears it. Views receive a [`SessionContext`] explicitly instead of reading
//! ambient storage, and the persistence medium sits behind [`SessionStore`].

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{ClientError, ValidationError};

// =============================================================================
// STORES
// =============================================================================

/// Persistent key-value slot holding the session username.
pub trait SessionStore: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read or decoded.
    fn load(&self) -> Result<Option<String>, ClientError>;

    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn save(&self, username: &str) -> Result<(), ClientError>;

    /// Remove the stored username. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be written.
    fn clear(&self) -> Result<(), ClientError>;
}

#[derive(Serialize, Deserialize)]
struct SessionRecord {
    username: String,
}

/// Session stored as a small JSON document on disk.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record: SessionRecord = serde_json::from_str(&raw).map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(Some(record.username))
    }

    fn save(&self, username: &str) -> Result<(), ClientError> {
        let body = serde_json::to_string(&SessionRecord { username: username.to_owned() })
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        std::fs::write(&self.path, body)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local store for tests and embedders without persistence.
#[derive(Default)]
pub struct MemorySessionStore {
    username: Mutex<Option<String>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>, ClientError> {
        Ok(self.username.lock().unwrap_or_else(PoisonError::into_inner).clone())
    }

    fn save(&self, username: &str) -> Result<(), ClientError> {
        *self.username.lock().unwrap_or_else(PoisonError::into_inner) = Some(username.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), ClientError> {
        *self.username.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// Handle to the session identity, cloned into every view that needs it.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    #[must_use]
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::default()))
    }

    /// Current username. Blank values and unreadable stores count as logged out.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        match self.store.load() {
            Ok(username) => username.filter(|u| !u.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "session store unreadable; treating as logged out");
                None
            }
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.username().is_some()
    }

    /// Current username, or [`ClientError::MissingSession`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingSession`] when nobody is logged in.
    pub fn require(&self) -> Result<String, ClientError> {
        self.username().ok_or(ClientError::MissingSession)
    }

    /// Store `username` as the session identity.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank username, or the store's error.
    pub fn login(&self, username: &str) -> Result<(), ClientError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ValidationError::EmptyUsername.into());
        }
        self.store.save(username)?;
        info!(username, "session started");
        Ok(())
    }

    /// Clear the session identity.
    ///
    /// # Errors
    ///
    /// Returns the store's error if the identity cannot be removed.
    pub fn logout(&self) -> Result<(), ClientError> {
        self.store.clear()?;
        info!("session cleared");
        Ok(())
    }
}

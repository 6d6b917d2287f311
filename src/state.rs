//! Shared application and view state.
//!
//! DESIGN
//! ======
//! `AppContext` is built once at startup and cloned into every view. It holds
//! the backend client, the session identity, the notifier and the config.
//! Each view keeps its own state in [`ViewCell`]s: shared, lock-protected
//! values that background fetches update. Closing a cell on view teardown
//! turns every later update into a no-op, so a fetch that completes after
//! its view is gone cannot touch discarded state.

pub mod connections;
pub mod dropdowns;
pub mod messages;
pub mod profile_form;
pub mod search;
#[cfg(test)]
pub mod test_helpers;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::api::{Backend, HttpBackend};
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::notifier::Notifier;
use crate::session::{FileSessionStore, SessionContext};

// =============================================================================
// APP CONTEXT
// =============================================================================

/// Process-wide collaborators, injected into views at mount.
/// Clone is cheap: every field is Arc-wrapped or small.
#[derive(Clone)]
pub struct AppContext {
    pub backend: Arc<dyn Backend>,
    pub session: SessionContext,
    pub notifier: Arc<Notifier>,
    pub config: ClientConfig,
}

impl AppContext {
    #[must_use]
    pub fn new(backend: Arc<dyn Backend>, session: SessionContext, config: ClientConfig) -> Self {
        Self { backend, session, notifier: Arc::new(Notifier::new()), config }
    }

    /// Wire the production HTTP backend and file-backed session store.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: ClientConfig) -> Result<Self, ClientError> {
        let backend = Arc::new(HttpBackend::new(&config)?);
        let session = SessionContext::new(Arc::new(FileSessionStore::new(config.session_file.clone())));
        Ok(Self::new(backend, session, config))
    }
}

// =============================================================================
// VIEW CELL
// =============================================================================

/// View-owned state shared with the view's background tasks.
pub struct ViewCell<T> {
    inner: Arc<CellInner<T>>,
}

struct CellInner<T> {
    value: Mutex<T>,
    alive: AtomicBool,
}

impl<T> Clone for ViewCell<T> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<T> ViewCell<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self { inner: Arc::new(CellInner { value: Mutex::new(value), alive: AtomicBool::new(true) }) }
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock())
    }

    /// Apply `f` unless the owning view has been torn down.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        let mut value = self.lock();
        if !self.inner.alive.load(Ordering::Acquire) {
            return None;
        }
        Some(f(&mut value))
    }

    /// Mark the owning view as torn down. Takes the lock so no update is
    /// mid-flight once this returns.
    pub fn close(&self) {
        let _value = self.lock();
        self.inner.alive.store(false, Ordering::Release);
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::Acquire)
    }

    fn lock(&self) -> MutexGuard<'_, T> {
        self.inner.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: Clone> ViewCell<T> {
    #[must_use]
    pub fn snapshot(&self) -> T {
        self.lock().clone()
    }
}

impl<T: Default> Default for ViewCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;

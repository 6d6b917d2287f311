//! Connections page for `/connections[/:username]`.
//!
//! Lists the connections of the route's user, or of the session user when the
//! route names nobody. Pending requests are loaded and actionable only on the
//! session user's own page.

#[cfg(test)]
#[path = "connections_test.rs"]
mod connections_test;

use tracing::{debug, warn};

use crate::error::ClientError;
use crate::models::ConnectionAction;
use crate::state::connections::ConnectionsState;
use crate::state::{AppContext, ViewCell};
use crate::sync::OptimisticMutator;

pub struct ConnectionsPage {
    ctx: AppContext,
    session_user: String,
    display_user: String,
    mutator: OptimisticMutator,
    pub state: ViewCell<ConnectionsState>,
    /// First name of the displayed user, for the page title.
    owner_first_name: ViewCell<Option<String>>,
}

impl ConnectionsPage {
    /// # Errors
    ///
    /// Returns [`ClientError::MissingSession`] when nobody is logged in.
    /// Fetch failures are logged and leave the lists empty.
    pub async fn mount(ctx: &AppContext, route_user: Option<&str>) -> Result<Self, ClientError> {
        let session_user = ctx.session.require()?;
        let display_user = route_user.filter(|u| !u.trim().is_empty()).unwrap_or(&session_user).to_owned();
        let page = Self {
            ctx: ctx.clone(),
            mutator: OptimisticMutator::new(ctx),
            session_user,
            display_user,
            state: ViewCell::default(),
            owner_first_name: ViewCell::default(),
        };
        page.reload().await;
        Ok(page)
    }

    /// Refetch everything the page shows.
    pub async fn reload(&self) {
        self.state.update(|s| s.loading = true);
        self.mutator.refresh_connections(&self.state, &self.display_user).await;
        if self.is_own_page() {
            self.mutator.refresh_pending(&self.state, &self.session_user).await;
        }
        match self.ctx.backend.fetch_profile(&self.display_user).await {
            Ok(profile) => {
                let first = Some(profile.first_name).filter(|n| !n.is_empty());
                self.owner_first_name.update(|n| *n = first);
            }
            Err(e) => warn!(error = %e, username = %self.display_user, "profile header fetch failed"),
        }
        self.state.update(|s| s.loading = false);
    }

    #[must_use]
    pub fn is_own_page(&self) -> bool {
        self.display_user == self.session_user
    }

    #[must_use]
    pub fn display_user(&self) -> &str {
        &self.display_user
    }

    #[must_use]
    pub fn title(&self) -> String {
        if self.is_own_page() {
            return "Your Connections".to_owned();
        }
        let name = self.owner_first_name.snapshot().unwrap_or_else(|| self.display_user.clone());
        format!("{name}'s Connections")
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.state.read(|s| s.connections.len())
    }

    /// Pending requests shown on the page; always zero on another user's page.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        if self.is_own_page() { self.state.read(|s| s.pending.len()) } else { 0 }
    }

    /// # Errors
    ///
    /// Returns [`ClientError::ReadOnlyView`] on another user's page, otherwise
    /// the backend error after reconciliation.
    pub async fn respond_to_request(&self, from_username: &str, action: ConnectionAction) -> Result<(), ClientError> {
        self.ensure_own_page()?;
        self.mutator.respond_to_request(&self.state, from_username, action).await
    }

    /// # Errors
    ///
    /// Returns [`ClientError::ReadOnlyView`] on another user's page, otherwise
    /// the backend error after reconciliation.
    pub async fn remove_connection(&self, username: &str) -> Result<(), ClientError> {
        self.ensure_own_page()?;
        self.mutator.remove_connection(&self.state, username).await
    }

    fn ensure_own_page(&self) -> Result<(), ClientError> {
        if self.is_own_page() { Ok(()) } else { Err(ClientError::ReadOnlyView) }
    }

    pub fn unmount(&self) {
        if self.state.is_alive() {
            self.state.close();
            self.owner_first_name.close();
            debug!(username = %self.display_user, "connections page unmounted");
        }
    }
}

impl Drop for ConnectionsPage {
    fn drop(&mut self) {
        self.unmount();
    }
}

//! Optimistic mutations with refetch-on-failure reconciliation.
//!
//! DESIGN
//! ======
//! Every user action follows `Idle -> Applied -> {Confirmed | Reconciling}`:
//! the local [`ViewCell`] changes first, then the backend call fires. On
//! success the matching notifier topic is published. On failure the view
//! re-derives truth from the backend and the action returns to `Idle`;
//! connection actions also put the removed entry back at its old index so
//! the list is right before the refetch lands.
//!
//! ERROR HANDLING
//! ==============
//! Refresh helpers log and swallow fetch failures, keeping the previous
//! state. Mutations return the backend error to the caller after
//! reconciling.

#[cfg(test)]
#[path = "sync_test.rs"]
mod sync_test;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::json;
use tracing::{debug, info, warn};

use crate::api::Backend;
use crate::error::ClientError;
use crate::models::ConnectionAction;
use crate::notifier::{CONNECTIONS_CHANGED, MESSAGES_READ, Notifier};
use crate::session::SessionContext;
use crate::state::connections::ConnectionsState;
use crate::state::messages::MessagesState;
use crate::state::{AppContext, ViewCell};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MutationPhase {
    Idle,
    Applied,
    Confirmed,
    Reconciling,
}

/// Identifies the entity an action targets.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MutationKey {
    Request(String),
    Connection(String),
    Message(i64),
}

pub struct OptimisticMutator {
    backend: Arc<dyn Backend>,
    session: SessionContext,
    notifier: Arc<Notifier>,
    phases: Mutex<Phases>,
}

/// In-flight actions by key, plus the most recently settled one. Settled
/// actions leave the map so a long-lived view does not accumulate keys.
#[derive(Default)]
struct Phases {
    in_flight: HashMap<MutationKey, MutationPhase>,
    last_settled: Option<(MutationKey, MutationPhase)>,
}

impl OptimisticMutator {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            backend: Arc::clone(&ctx.backend),
            session: ctx.session.clone(),
            notifier: Arc::clone(&ctx.notifier),
            phases: Mutex::new(Phases::default()),
        }
    }

    /// Phase of the action on `key`. `Confirmed` is only reported for the
    /// most recently settled action; anything else not in flight is `Idle`.
    #[must_use]
    pub fn phase(&self, key: &MutationKey) -> MutationPhase {
        let phases = self.phases.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(phase) = phases.in_flight.get(key) {
            return *phase;
        }
        match &phases.last_settled {
            Some((settled, phase)) if settled == key => *phase,
            _ => MutationPhase::Idle,
        }
    }

    /// Number of actions applied locally and not yet settled.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.phases.lock().unwrap_or_else(PoisonError::into_inner).in_flight.len()
    }

    fn set_phase(&self, key: &MutationKey, phase: MutationPhase) {
        debug!(?key, ?phase, "mutation phase");
        let mut phases = self.phases.lock().unwrap_or_else(PoisonError::into_inner);
        match phase {
            MutationPhase::Applied | MutationPhase::Reconciling => {
                phases.in_flight.insert(key.clone(), phase);
            }
            MutationPhase::Confirmed | MutationPhase::Idle => {
                phases.in_flight.remove(key);
                phases.last_settled = Some((key.clone(), phase));
            }
        }
    }

    // =========================================================================
    // CONNECTION REQUESTS
    // =========================================================================

    /// Accept or reject the pending request from `from_username`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingSession`] before any change when logged
    /// out, or the backend error after the request has been restored and the
    /// pending list refetched.
    pub async fn respond_to_request(
        &self,
        cell: &ViewCell<ConnectionsState>,
        from_username: &str,
        action: ConnectionAction,
    ) -> Result<(), ClientError> {
        let me = self.session.require()?;
        let key = MutationKey::Request(from_username.to_owned());

        let removed = cell
            .update(|s| {
                s.error = None;
                s.take_request(from_username)
            })
            .flatten();
        self.set_phase(&key, MutationPhase::Applied);

        match self.backend.respond_to_request(action, from_username, &me).await {
            Ok(()) => {
                self.set_phase(&key, MutationPhase::Confirmed);
                info!(from = %from_username, %action, "connection request answered");
                self.notifier
                    .publish(CONNECTIONS_CHANGED, &json!({ "username": from_username, "action": action.as_path() }));
                if action == ConnectionAction::Accept {
                    self.refresh_connections(cell, &me).await;
                }
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), from = %from_username, %action, "connection response failed");
                self.set_phase(&key, MutationPhase::Reconciling);
                cell.update(|s| {
                    if let Some(removed) = removed {
                        s.restore_request(removed);
                    }
                    s.error = Some(format!("Failed to {action} connection request"));
                });
                self.refresh_pending(cell, &me).await;
                self.set_phase(&key, MutationPhase::Idle);
                Err(e)
            }
        }
    }

    // =========================================================================
    // CONNECTIONS
    // =========================================================================

    /// Disconnect the session user from `username`.
    ///
    /// # Errors
    ///
    /// Same contract as [`Self::respond_to_request`], reconciling the
    /// connections list instead.
    pub async fn remove_connection(&self, cell: &ViewCell<ConnectionsState>, username: &str) -> Result<(), ClientError> {
        let me = self.session.require()?;
        let key = MutationKey::Connection(username.to_owned());

        let removed = cell
            .update(|s| {
                s.error = None;
                s.take_connection(username)
            })
            .flatten();
        self.set_phase(&key, MutationPhase::Applied);

        match self.backend.disconnect(&me, username).await {
            Ok(()) => {
                self.set_phase(&key, MutationPhase::Confirmed);
                info!(username = %username, "connection removed");
                self.notifier.publish(CONNECTIONS_CHANGED, &json!({ "username": username, "action": "disconnect" }));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), username = %username, "disconnect failed");
                self.set_phase(&key, MutationPhase::Reconciling);
                cell.update(|s| {
                    if let Some(removed) = removed {
                        s.restore_connection(removed);
                    }
                    s.error = Some("Failed to remove connection".to_owned());
                });
                self.refresh_connections(cell, &me).await;
                self.set_phase(&key, MutationPhase::Idle);
                Err(e)
            }
        }
    }

    // =========================================================================
    // MESSAGES
    // =========================================================================

    /// Mark one message summary read.
    ///
    /// # Errors
    ///
    /// Returns the backend error after the message list has been refetched.
    pub async fn mark_read(&self, cell: &ViewCell<MessagesState>, message_id: i64) -> Result<(), ClientError> {
        let me = self.session.require()?;
        let key = MutationKey::Message(message_id);

        cell.update(|s| s.mark_read_local(message_id));
        self.set_phase(&key, MutationPhase::Applied);

        match self.backend.mark_message_read(message_id, &me).await {
            Ok(()) => {
                self.set_phase(&key, MutationPhase::Confirmed);
                self.notifier.publish(MESSAGES_READ, &json!({ "messageId": message_id }));
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, code = e.error_code(), message_id, "mark read failed");
                self.set_phase(&key, MutationPhase::Reconciling);
                self.refresh_messages(cell, &me).await;
                self.set_phase(&key, MutationPhase::Idle);
                Err(e)
            }
        }
    }

    /// Mark every unread summary from `sender` read, publishing
    /// `messagesRead` once when all confirmations succeed. Nothing is sent
    /// or published when there is nothing unread or the view is closed.
    ///
    /// # Errors
    ///
    /// Returns the first backend error after the message list has been
    /// refetched.
    pub async fn mark_conversation_read(&self, cell: &ViewCell<MessagesState>, sender: &str) -> Result<usize, ClientError> {
        let me = self.session.require()?;
        let ids = cell
            .update(|s| {
                let ids = s.unread_ids_from(sender);
                for id in &ids {
                    s.mark_read_local(*id);
                }
                ids
            })
            .unwrap_or_default();
        if ids.is_empty() {
            return Ok(0);
        }

        let mut failure = None;
        for id in &ids {
            let key = MutationKey::Message(*id);
            self.set_phase(&key, MutationPhase::Applied);
            match self.backend.mark_message_read(*id, &me).await {
                Ok(()) => self.set_phase(&key, MutationPhase::Confirmed),
                Err(e) => {
                    warn!(error = %e, message_id = *id, sender = %sender, "mark read failed");
                    self.set_phase(&key, MutationPhase::Reconciling);
                    if failure.is_none() {
                        failure = Some(e);
                    }
                }
            }
        }

        if let Some(e) = failure {
            self.refresh_messages(cell, &me).await;
            for id in &ids {
                if self.phase(&MutationKey::Message(*id)) == MutationPhase::Reconciling {
                    self.set_phase(&MutationKey::Message(*id), MutationPhase::Idle);
                }
            }
            return Err(e);
        }

        self.notifier.publish(MESSAGES_READ, &json!({ "sender": sender, "count": ids.len() }));
        Ok(ids.len())
    }

    // =========================================================================
    // REFRESH
    // =========================================================================

    /// Replace the message list with a server snapshot. Returns whether the
    /// fetch succeeded.
    pub async fn refresh_messages(&self, cell: &ViewCell<MessagesState>, username: &str) -> bool {
        refresh_messages(self.backend.as_ref(), cell, username).await
    }

    pub async fn refresh_pending(&self, cell: &ViewCell<ConnectionsState>, username: &str) -> bool {
        refresh_pending(self.backend.as_ref(), cell, username).await
    }

    pub async fn refresh_connections(&self, cell: &ViewCell<ConnectionsState>, username: &str) -> bool {
        refresh_connections(self.backend.as_ref(), cell, username).await
    }
}

// =============================================================================
// FREE REFRESH FUNCTIONS
// =============================================================================

// Used by pollers and notifier handlers, which hold only the backend.

pub async fn refresh_messages(backend: &dyn Backend, cell: &ViewCell<MessagesState>, username: &str) -> bool {
    match backend.fetch_recent_messages(username).await {
        Ok(items) => {
            cell.update(|s| s.replace(items));
            true
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "message refresh failed; keeping previous list");
            false
        }
    }
}

pub async fn refresh_pending(backend: &dyn Backend, cell: &ViewCell<ConnectionsState>, username: &str) -> bool {
    match backend.fetch_pending_requests(username).await {
        Ok(pending) => {
            cell.update(|s| s.replace_pending(pending));
            true
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "pending request refresh failed; keeping previous list");
            false
        }
    }
}

pub async fn refresh_connections(backend: &dyn Backend, cell: &ViewCell<ConnectionsState>, username: &str) -> bool {
    match backend.fetch_connections(username).await {
        Ok(connections) => {
            cell.update(|s| s.replace_connections(connections));
            true
        }
        Err(e) => {
            warn!(error = %e, code = e.error_code(), "connections refresh failed; keeping previous list");
            false
        }
    }
}

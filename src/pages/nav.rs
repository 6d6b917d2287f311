//! Navigation bar present on every protected page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Shows the unread-message and pending-request badges, the message,
//! connection-request and user dropdowns, and the user search box. Unread
//! messages are polled on a timer; requests are fetched on mount and when
//! their dropdown opens, plus on a timer when configured. The bar also
//! refreshes on `messagesRead` and `connectionsChanged` so actions taken in
//! other views show up without waiting for the next tick.

#[cfg(test)]
#[path = "nav_test.rs"]
mod nav_test;

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::error::ClientError;
use crate::models::{ConnectionAction, UNIVERSITY_USERNAME, UserSearchResult};
use crate::notifier::{CONNECTIONS_CHANGED, MESSAGES_READ, SubscriptionHandle};
use crate::poller::Poller;
use crate::routes::Route;
use crate::state::connections::ConnectionsState;
use crate::state::dropdowns::{Dropdown, Dropdowns};
use crate::state::messages::MessagesState;
use crate::state::search::SearchState;
use crate::state::{AppContext, ViewCell};
use crate::sync::{self, OptimisticMutator};

pub struct NavBar {
    ctx: AppContext,
    username: String,
    mutator: OptimisticMutator,
    pub messages: ViewCell<MessagesState>,
    /// Only `pending` is used here.
    pub requests: ViewCell<ConnectionsState>,
    pub dropdowns: ViewCell<Dropdowns>,
    pub search: ViewCell<SearchState>,
    pollers: Vec<Poller>,
    subscriptions: Vec<SubscriptionHandle>,
}

impl NavBar {
    /// Fetch initial state, then start pollers and subscriptions.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::MissingSession`] when nobody is logged in.
    /// Fetch failures are logged and leave the lists empty.
    ///
    /// # Panics
    ///
    /// Must be awaited inside a Tokio runtime; pollers and notifier
    /// handlers spawn onto the current one.
    pub async fn mount(ctx: &AppContext) -> Result<Self, ClientError> {
        let username = ctx.session.require()?;
        let mut nav = Self {
            ctx: ctx.clone(),
            mutator: OptimisticMutator::new(ctx),
            username,
            messages: ViewCell::default(),
            requests: ViewCell::default(),
            dropdowns: ViewCell::default(),
            search: ViewCell::default(),
            pollers: Vec::new(),
            subscriptions: Vec::new(),
        };

        nav.mutator.refresh_pending(&nav.requests, &nav.username).await;
        nav.mutator.refresh_messages(&nav.messages, &nav.username).await;

        nav.start_pollers();
        nav.subscribe();
        info!(username = %nav.username, "navigation bar mounted");
        Ok(nav)
    }

    fn start_pollers(&mut self) {
        let backend = Arc::clone(&self.ctx.backend);
        let cell = self.messages.clone();
        let username = self.username.clone();
        self.pollers.push(Poller::start_after_interval("messages", self.ctx.config.message_poll, move || {
            let backend = Arc::clone(&backend);
            let cell = cell.clone();
            let username = username.clone();
            async move {
                sync::refresh_messages(backend.as_ref(), &cell, &username).await;
            }
        }));

        if let Some(interval) = self.ctx.config.request_poll {
            let backend = Arc::clone(&self.ctx.backend);
            let cell = self.requests.clone();
            let username = self.username.clone();
            self.pollers.push(Poller::start_after_interval("requests", interval, move || {
                let backend = Arc::clone(&backend);
                let cell = cell.clone();
                let username = username.clone();
                async move {
                    sync::refresh_pending(backend.as_ref(), &cell, &username).await;
                }
            }));
        }
    }

    /// Refreshes triggered by other views run as detached tasks; the handler
    /// itself only spawns.
    fn subscribe(&mut self) {
        let runtime = Handle::current();
        let notifier = Arc::clone(&self.ctx.notifier);

        let (backend, cell, username, rt) =
            (Arc::clone(&self.ctx.backend), self.messages.clone(), self.username.clone(), runtime.clone());
        self.subscriptions.push(notifier.subscribe(MESSAGES_READ, move |_| {
            let (backend, cell, username) = (Arc::clone(&backend), cell.clone(), username.clone());
            rt.spawn(async move {
                sync::refresh_messages(backend.as_ref(), &cell, &username).await;
            });
        }));

        let (backend, cell, username) = (Arc::clone(&self.ctx.backend), self.requests.clone(), self.username.clone());
        self.subscriptions.push(notifier.subscribe(CONNECTIONS_CHANGED, move |_| {
            let (backend, cell, username) = (Arc::clone(&backend), cell.clone(), username.clone());
            runtime.spawn(async move {
                sync::refresh_pending(backend.as_ref(), &cell, &username).await;
            });
        }));
    }

    /// Stop pollers, drop subscriptions and discard in-flight results.
    /// Idempotent.
    pub fn unmount(&mut self) {
        if !self.messages.is_alive() {
            return;
        }
        for poller in &mut self.pollers {
            poller.stop();
        }
        self.pollers.clear();
        for handle in self.subscriptions.drain(..) {
            self.ctx.notifier.unsubscribe(handle);
        }
        self.messages.close();
        self.requests.close();
        self.dropdowns.close();
        self.search.close();
        debug!(username = %self.username, "navigation bar unmounted");
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    // =========================================================================
    // BADGES
    // =========================================================================

    /// Unread-message badge text; empty when nothing is unread.
    #[must_use]
    pub fn message_badge(&self) -> String {
        self.messages.read(|s| if s.show_badge() { s.badge() } else { String::new() })
    }

    /// Pending-request badge text; empty when there are none.
    #[must_use]
    pub fn request_badge(&self) -> String {
        self.requests.read(|s| if s.pending.is_empty() { String::new() } else { s.pending.len().to_string() })
    }

    // =========================================================================
    // DROPDOWNS
    // =========================================================================

    /// Toggle a dropdown. Opening the message or request dropdown refreshes
    /// its list. Returns whether the dropdown is now open.
    pub async fn toggle_dropdown(&self, dropdown: Dropdown) -> bool {
        let open = self.dropdowns.update(|d| d.toggle(dropdown)).unwrap_or(false);
        if open {
            match dropdown {
                Dropdown::Messages => {
                    self.mutator.refresh_messages(&self.messages, &self.username).await;
                }
                Dropdown::Connections => {
                    self.mutator.refresh_pending(&self.requests, &self.username).await;
                }
                Dropdown::Search | Dropdown::User => {}
            }
        }
        open
    }

    /// Pointer press anywhere on the page; `inside` names the dropdown
    /// region that contains the target.
    pub fn click(&self, inside: Option<Dropdown>) {
        self.dropdowns.update(|d| d.dismiss_outside(inside));
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Accept or reject a request from the request dropdown.
    ///
    /// # Errors
    ///
    /// Returns the backend error after the request has been restored.
    pub async fn respond_to_request(&self, from_username: &str, action: ConnectionAction) -> Result<(), ClientError> {
        self.mutator.respond_to_request(&self.requests, from_username, action).await
    }

    /// Click on a message summary: mark it read and open its conversation.
    /// A failed read confirmation is logged; navigation happens regardless.
    /// Returns `None` for an unknown id.
    pub async fn open_message(&self, message_id: i64) -> Option<Route> {
        let sender = self.messages.read(|s| s.get(message_id).map(|m| m.sender.clone()))?;
        self.dropdowns.update(|d| d.close(Dropdown::Messages));
        if let Err(e) = self.mutator.mark_read(&self.messages, message_id).await {
            warn!(error = %e, message_id, "opening message without read confirmation");
        }
        Some(Route::Messages(Some(sender)))
    }

    /// Run a user search. A blank term clears results and hides the
    /// dropdown without a request; a failure clears results and leaves the
    /// dropdown as it was.
    pub async fn search(&self, term: &str) {
        let Some(seq) = self.search.update(|s| s.begin(term)).flatten() else {
            self.dropdowns.update(|d| d.close(Dropdown::Search));
            return;
        };
        let (results, found) = match self.ctx.backend.search_users(term.trim()).await {
            Ok(results) => (results, true),
            Err(e) => {
                warn!(error = %e, code = e.error_code(), "user search failed");
                (Vec::new(), false)
            }
        };
        let applied = self.search.update(|s| s.finish(seq, results)).unwrap_or(false);
        if applied && found {
            self.dropdowns.update(|d| d.open(Dropdown::Search));
        }
    }

    /// Pick a search result: clear the box and route to the profile.
    pub fn select_search_result(&self, result: &UserSearchResult) -> Route {
        self.search.update(SearchState::clear);
        self.dropdowns.update(|d| d.close(Dropdown::Search));
        if result.is_university() { Route::University } else { Route::Profile(Some(result.username.clone())) }
    }

    /// The session user's own profile; the university account has its own page.
    #[must_use]
    pub fn profile_route(&self) -> Route {
        if self.username == UNIVERSITY_USERNAME { Route::University } else { Route::Profile(None) }
    }

    /// Clear the session and tear the bar down.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store cannot be cleared.
    pub fn logout(&mut self) -> Result<Route, ClientError> {
        self.ctx.session.logout()?;
        self.unmount();
        info!(username = %self.username, "logged out");
        Ok(Route::Login)
    }
}

impl Drop for NavBar {
    fn drop(&mut self) {
        self.unmount();
    }
}

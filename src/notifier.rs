//! In-process publish/subscribe bus between views.
//!
//! DESIGN
//! ======
//! The view that causes a change (a conversation marking its messages read)
//! publishes a topic; views that reflect it (the navigation badge) subscribe.
//! Delivery is synchronous, in registration order, on the publishing task.
//! Events are neither queued nor persisted: a view that is not subscribed at
//! publish time never sees the event.
//!
//! ERROR HANDLING
//! ==============
//! A panicking handler is caught and logged; the remaining handlers still run.
//! Handlers are snapshotted before delivery and the registry lock is released,
//! so a handler may subscribe or unsubscribe without deadlocking. A handler
//! removed mid-publish still receives that one event.

#[cfg(test)]
#[path = "notifier_test.rs"]
mod notifier_test;

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, PoisonError};

use serde_json::Value;
use tracing::{debug, warn};

/// Published when a conversation finishes marking its messages read.
pub const MESSAGES_READ: &str = "messagesRead";
/// Published when a connection request is answered or a connection removed.
pub const CONNECTIONS_CHANGED: &str = "connectionsChanged";

type Handler = Arc<dyn Fn(&Value) + Send + Sync>;

/// Opaque token returned by [`Notifier::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle(u64);

struct Subscription {
    id: u64,
    topic: String,
    handler: Handler,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

/// Constructed once at startup and shared by `Arc` with every view.
#[derive(Default)]
pub struct Notifier {
    registry: Mutex<Registry>,
}

impl Notifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, topic: &str, handler: F) -> SubscriptionHandle
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let mut registry = self.lock();
        registry.next_id += 1;
        let id = registry.next_id;
        registry
            .subscriptions
            .push(Subscription { id, topic: topic.to_owned(), handler: Arc::new(handler) });
        debug!(topic, subscription = id, "subscribed");
        SubscriptionHandle(id)
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, handle: SubscriptionHandle) -> bool {
        let mut registry = self.lock();
        let before = registry.subscriptions.len();
        registry.subscriptions.retain(|s| s.id != handle.0);
        let removed = registry.subscriptions.len() != before;
        if removed {
            debug!(subscription = handle.0, "unsubscribed");
        }
        removed
    }

    /// Invoke every handler subscribed to `topic`. Returns how many ran.
    pub fn publish(&self, topic: &str, payload: &Value) -> usize {
        let handlers: Vec<(u64, Handler)> = self
            .lock()
            .subscriptions
            .iter()
            .filter(|s| s.topic == topic)
            .map(|s| (s.id, Arc::clone(&s.handler)))
            .collect();

        for (id, handler) in &handlers {
            if catch_unwind(AssertUnwindSafe(|| handler(payload))).is_err() {
                warn!(topic, subscription = id, "notification handler panicked");
            }
        }
        debug!(topic, delivered = handlers.len(), "published");
        handlers.len()
    }

    #[must_use]
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock()
            .subscriptions
            .iter()
            .filter(|s| s.topic == topic)
            .count()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

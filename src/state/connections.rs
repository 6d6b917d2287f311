//! Connections and pending requests of one view.
//!
//! Optimistic removals hand back a [`Removed`] record so a failed backend call
//! can put the entry back where it was.

#[cfg(test)]
#[path = "connections_test.rs"]
mod connections_test;

use crate::models::{Connection, ConnectionRequest, UserCard};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConnectionsState {
    pub connections: Vec<Connection>,
    pub pending: Vec<ConnectionRequest>,
    pub loading: bool,
    /// Last user-visible failure, cleared by the next successful action.
    pub error: Option<String>,
}

/// An entry taken out of a list, with the index it occupied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Removed<T> {
    pub index: usize,
    pub item: T,
}

impl ConnectionsState {
    /// Replace pending requests with a server snapshot.
    pub fn replace_pending(&mut self, pending: Vec<ConnectionRequest>) {
        self.pending = pending;
    }

    /// Replace connections with a server snapshot. Requests from users that
    /// are now connections are dropped so the two lists stay disjoint.
    pub fn replace_connections(&mut self, connections: Vec<Connection>) {
        self.connections = connections;
        let connections = &self.connections;
        self.pending.retain(|r| !connections.iter().any(|c| c.username == r.username));
    }

    #[must_use]
    pub fn has_connection(&self, username: &str) -> bool {
        self.connections.iter().any(|c| c.username == username)
    }

    #[must_use]
    pub fn has_request(&self, username: &str) -> bool {
        self.pending.iter().any(|r| r.username == username)
    }

    pub fn take_request(&mut self, username: &str) -> Option<Removed<ConnectionRequest>> {
        take(&mut self.pending, username)
    }

    pub fn restore_request(&mut self, removed: Removed<ConnectionRequest>) {
        restore(&mut self.pending, removed);
    }

    pub fn take_connection(&mut self, username: &str) -> Option<Removed<Connection>> {
        take(&mut self.connections, username)
    }

    pub fn restore_connection(&mut self, removed: Removed<Connection>) {
        restore(&mut self.connections, removed);
    }
}

fn take(list: &mut Vec<UserCard>, username: &str) -> Option<Removed<UserCard>> {
    let index = list.iter().position(|u| u.username == username)?;
    Some(Removed { index, item: list.remove(index) })
}

/// Reinsert at the original index, clamped to the current length. A no-op if
/// a refetch already brought the entry back.
fn restore(list: &mut Vec<UserCard>, removed: Removed<UserCard>) {
    if list.iter().any(|u| u.username == removed.item.username) {
        return;
    }
    let index = removed.index.min(list.len());
    list.insert(index, removed.item);
}

//! Recent-message summaries behind the navigation bar badge.

#[cfg(test)]
#[path = "messages_test.rs"]
mod messages_test;

use crate::models::MessageSummary;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MessagesState {
    pub items: Vec<MessageSummary>,
    /// False until the first successful fetch.
    pub loaded: bool,
}

impl MessagesState {
    /// Replace with a fresh server snapshot.
    pub fn replace(&mut self, items: Vec<MessageSummary>) {
        self.items = items;
        self.loaded = true;
    }

    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|m| m.unread).count()
    }

    /// Badge label as a count, `"0"` included.
    #[must_use]
    pub fn badge(&self) -> String {
        self.unread_count().to_string()
    }

    #[must_use]
    pub fn show_badge(&self) -> bool {
        self.unread_count() > 0
    }

    /// Clear the unread flag of one summary. Returns whether anything changed.
    pub fn mark_read_local(&mut self, id: i64) -> bool {
        match self.items.iter_mut().find(|m| m.id == id) {
            Some(item) if item.unread => {
                item.unread = false;
                true
            }
            _ => false,
        }
    }

    /// Ids of unread summaries from one sender.
    #[must_use]
    pub fn unread_ids_from(&self, sender: &str) -> Vec<i64> {
        self.items.iter().filter(|m| m.unread && m.sender == sender).map(|m| m.id).collect()
    }

    #[must_use]
    pub fn get(&self, id: i64) -> Option<&MessageSummary> {
        self.items.iter().find(|m| m.id == id)
    }
}

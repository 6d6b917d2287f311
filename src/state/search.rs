//! User search box state.
//!
//! Every search bumps a sequence number; a response is applied only if no
//! newer search started meanwhile, so a slow early response cannot overwrite
//! the results of a later term.

#[cfg(test)]
#[path = "search_test.rs"]
mod search_test;

use crate::models::UserSearchResult;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    pub term: String,
    pub results: Vec<UserSearchResult>,
    pub searching: bool,
    seq: u64,
}

impl SearchState {
    /// Record a new term. Returns the sequence number for the request, or
    /// `None` when the trimmed term is blank and results were cleared instead.
    pub fn begin(&mut self, term: &str) -> Option<u64> {
        self.term = term.to_owned();
        self.seq = self.seq.wrapping_add(1);
        if term.trim().is_empty() {
            self.results.clear();
            self.searching = false;
            return None;
        }
        self.searching = true;
        Some(self.seq)
    }

    /// Apply a response. Stale responses are dropped and `false` returned.
    pub fn finish(&mut self, seq: u64, results: Vec<UserSearchResult>) -> bool {
        if seq != self.seq {
            return false;
        }
        self.results = results;
        self.searching = false;
        true
    }

    pub fn clear(&mut self) {
        self.term.clear();
        self.results.clear();
        self.searching = false;
        self.seq = self.seq.wrapping_add(1);
    }

    #[must_use]
    pub fn seq(&self) -> u64 {
        self.seq
    }
}

//! Visited registry: the run-wide record of which URLs have been claimed
//!
//! The registry is the single source of truth for "has this URL been taken".
//! `claim` is an atomic check-and-insert, so any number of concurrent callers
//! can race on the same URL and exactly one of them wins the right to fetch it.

use crate::state::VisitState;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Mapping from resolved URL to its visit state
///
/// Entries are never evicted; memory grows with the number of unique URLs
/// claimed during the run.
#[derive(Debug, Default)]
pub struct VisitedRegistry {
    entries: Mutex<HashMap<String, VisitState>>,
}

impl VisitedRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, VisitState>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims a URL for fetching
    ///
    /// # Returns
    ///
    /// * `true` - The URL was unknown and is now `Claimed`; the caller must fetch it
    /// * `false` - The URL was already claimed; the caller must not fetch it
    pub fn claim(&self, url: &str) -> bool {
        let mut entries = self.entries();
        if entries.contains_key(url) {
            return false;
        }
        entries.insert(url.to_string(), VisitState::Claimed);
        true
    }

    /// Returns true if the URL has been claimed, whatever its outcome
    pub fn contains(&self, url: &str) -> bool {
        self.entries().contains_key(url)
    }

    /// Records the outcome of a claimed URL
    ///
    /// # Returns
    ///
    /// * `true` - The state changed
    /// * `false` - The URL was never claimed or the transition is not allowed
    pub fn mark(&self, url: &str, next: VisitState) -> bool {
        let mut entries = self.entries();
        match entries.get_mut(url) {
            Some(state) if state.can_transition_to(next) => {
                *state = next;
                true
            }
            Some(state) => {
                tracing::debug!("Ignoring transition {} -> {} for {}", state, next, url);
                false
            }
            None => false,
        }
    }

    /// Number of URLs claimed so far
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns true if nothing has been claimed
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// URLs currently in the given state, in lexicographic order
    pub fn urls_in(&self, state: VisitState) -> Vec<String> {
        let mut urls: Vec<String> = self
            .entries()
            .iter()
            .filter(|(_, s)| **s == state)
            .map(|(url, _)| url.clone())
            .collect();
        urls.sort();
        urls
    }
}

//! Debounced, stale-result-safe search state.
//!
//! Each search-as-you-type field owns a [`SearchField`]. Keystrokes are
//! recorded with their wall-clock instant; a request becomes due once the
//! debounce window has elapsed with no further input. Every issued request
//! carries a per-field monotonically increasing sequence number, and a
//! response is applied only if it carries the latest issued number — an
//! earlier in-flight response that resolves late is discarded rather than
//! cancelled.
//!
//! The type is driven by an explicit clock (`Instant` parameters), so tests
//! exercise debounce behaviour without timers.

use std::time::{Duration, Instant};

/// Minimum query length before a search is issued.
pub const MIN_QUERY_CHARS: usize = 2;

/// Quiet period after the last keystroke before a search is issued.
pub const DEBOUNCE: Duration = Duration::from_millis(300);

/// A search request due for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

/// Debounce and staleness tracking for one search field.
#[derive(Debug)]
pub struct SearchField<T> {
    pending: Option<(String, Instant)>,
    next_seq: u64,
    latest_issued: Option<u64>,
    results: Vec<T>,
}

impl<T> SearchField<T> {
    pub fn new() -> Self {
        Self {
            pending: None,
            next_seq: 0,
            latest_issued: None,
            results: Vec::new(),
        }
    }

    /// Records a keystroke. Queries shorter than [`MIN_QUERY_CHARS`] clear
    /// the field: no request will be issued, current suggestions are
    /// dropped, and a response still in flight for the abandoned query is
    /// discarded.
    pub fn input(&mut self, text: &str, now: Instant) {
        let trimmed = text.trim();
        if trimmed.chars().count() < MIN_QUERY_CHARS {
            self.pending = None;
            self.latest_issued = None;
            self.results.clear();
            return;
        }
        self.pending = Some((trimmed.to_owned(), now));
    }

    /// Returns the request to dispatch once the debounce window has elapsed
    /// since the last keystroke, tagging it with a fresh sequence number.
    /// Returns `None` while still within the window or when nothing is
    /// pending.
    pub fn poll(&mut self, now: Instant) -> Option<SearchRequest> {
        let (_, since) = self.pending.as_ref()?;
        if now.duration_since(*since) < DEBOUNCE {
            return None;
        }
        let (query, _) = self.pending.take()?;
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_issued = Some(seq);
        Some(SearchRequest { seq, query })
    }

    /// Applies a response. Returns `true` when the response was current and
    /// the suggestions were replaced; a stale sequence number is discarded
    /// and leaves the current suggestions untouched.
    pub fn apply(&mut self, seq: u64, results: Vec<T>) -> bool {
        if self.latest_issued != Some(seq) {
            return false;
        }
        self.results = results;
        true
    }

    /// Current suggestions.
    pub fn results(&self) -> &[T] {
        &self.results
    }

    /// Drops pending input, issued-request tracking, and suggestions.
    pub fn clear(&mut self) {
        self.pending = None;
        self.latest_issued = None;
        self.results.clear();
    }
}

impl<T> Default for SearchField<T> {
    fn default() -> Self {
        Self::new()
    }
}

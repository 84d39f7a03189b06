//! Debounced global search state.
//!
//! A single pending slot with a deadline, replaced on every keystroke —
//! cooperative debouncing without a timer runtime. The host applies
//! pending terms by calling `poll` from its own loop (or `flush` in
//! tests).

use std::time::{Duration, Instant};

/// Default delay before a typed term takes effect.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct PendingTerm {
    term: String,
    deadline: Instant,
}

/// Global cross-column search with debounce and a minimum-length gate.
#[derive(Debug, Clone)]
pub(crate) struct GlobalSearch {
    /// The applied (effective) term.
    term: String,
    pending: Option<PendingTerm>,
    debounce: Duration,
    min_length: usize,
    /// Column subset to search; `None` searches all columns.
    columns: Option<Vec<String>>,
}

impl Default for GlobalSearch {
    fn default() -> Self {
        Self {
            term: String::new(),
            pending: None,
            debounce: DEFAULT_DEBOUNCE,
            min_length: 0,
            columns: None,
        }
    }
}

impl GlobalSearch {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn columns(&self) -> Option<&[String]> {
        self.columns.as_deref()
    }

    pub fn set_columns(&mut self, columns: Option<Vec<String>>) {
        self.columns = columns;
    }

    pub fn set_debounce(&mut self, debounce: Duration) {
        self.debounce = debounce;
    }

    pub fn set_min_length(&mut self, min_length: usize) {
        self.min_length = min_length;
    }

    /// Stage a new term. The empty term clears the search immediately;
    /// terms below the minimum length are suppressed (the pending slot is
    /// cancelled either way — latest keystroke wins).
    pub fn stage(&mut self, term: &str, now: Instant) {
        self.pending = None;
        if term.is_empty() {
            self.term.clear();
        } else if term.chars().count() >= self.min_length {
            self.pending = Some(PendingTerm {
                term: term.to_string(),
                deadline: now + self.debounce,
            });
        }
    }

    /// Apply the pending term if its deadline has passed. Returns true if
    /// the applied term changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|p| p.deadline <= now);
        if due {
            return self.flush();
        }
        false
    }

    /// Apply the pending term unconditionally.
    pub fn flush(&mut self) -> bool {
        if let Some(pending) = self.pending.take() {
            if pending.term != self.term {
                self.term = pending.term;
                return true;
            }
        }
        false
    }

    /// Directly set the applied term (snapshot import, preset load).
    pub fn apply_term(&mut self, term: &str) {
        self.pending = None;
        self.term = term.to_string();
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    #[test]
    fn test_term_applies_after_deadline() {
        let mut s = GlobalSearch::default();
        let t0 = Instant::now();
        s.stage("ada", t0);
        assert_eq!(s.term(), "");
        assert!(!s.poll(t0));
        assert!(s.poll(t0 + DEFAULT_DEBOUNCE));
        assert_eq!(s.term(), "ada");
    }

    #[test]
    fn test_new_keystroke_replaces_pending() {
        let mut s = GlobalSearch::default();
        let t0 = Instant::now();
        s.stage("a", t0);
        s.stage("ad", t0 + Duration::from_millis(100));
        // First deadline passes, but the slot now holds "ad" with a later
        // deadline.
        assert!(!s.poll(t0 + Duration::from_millis(350)));
        assert!(s.poll(t0 + Duration::from_millis(400)));
        assert_eq!(s.term(), "ad");
    }

    #[test]
    fn test_empty_term_clears_immediately() {
        let mut s = GlobalSearch::default();
        let t0 = Instant::now();
        s.stage("ada", t0);
        s.flush();
        assert_eq!(s.term(), "ada");
        s.stage("", t0);
        assert_eq!(s.term(), "");
        assert!(!s.flush());
    }

    #[test]
    fn test_short_term_suppressed() {
        let mut s = GlobalSearch::default();
        s.set_min_length(3);
        let t0 = Instant::now();
        s.stage("ad", t0);
        assert!(!s.poll(t0 + DEFAULT_DEBOUNCE));
        assert_eq!(s.term(), "");
        s.stage("ada", t0);
        assert!(s.poll(t0 + DEFAULT_DEBOUNCE));
        assert_eq!(s.term(), "ada");
    }
}

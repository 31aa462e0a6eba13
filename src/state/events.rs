//! Cached row count for the `events` table.
//!
//! DESIGN
//! ======
//! The count is a write-only increasing approximation: an absolute baseline
//! from the count query, plus one per insert notification. Deletes are not
//! observed, so no decrement path exists. Inserts that arrive before the
//! baseline fetch resolves are buffered in `pending` and folded into the
//! baseline, so an early notification is never overwritten by a later
//! fetch result.

#[cfg(test)]
#[path = "events_test.rs"]
mod events_test;

/// Cached count state for the events table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventsCountState {
    /// Baseline-resolved count, if the fetch has completed.
    pub count: Option<u64>,
    /// Inserts observed before the baseline resolved.
    pub pending: u64,
    /// True while the baseline fetch is outstanding.
    pub loading: bool,
    /// Last fetch error message; the view keeps its loading placeholder.
    pub error: Option<String>,
}

impl EventsCountState {
    /// Apply one insert notification.
    pub fn record_insert(&mut self) {
        match self.count {
            Some(n) => self.count = Some(n + 1),
            None => self.pending += 1,
        }
    }

    /// Apply the baseline count fetch, folding in buffered inserts.
    pub fn resolve_fetch(&mut self, count: u64) {
        self.count = Some(count + self.pending);
        self.pending = 0;
        self.loading = false;
        self.error = None;
    }

    /// Record a failed baseline fetch. The cached value is untouched.
    pub fn fail_fetch(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    /// Value to render, if a baseline exists yet.
    pub fn displayed(&self) -> Option<u64> {
        self.count
    }
}

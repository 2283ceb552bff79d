//! Dispatch counters.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters updated by the bus and the executor.
#[derive(Debug, Default)]
pub struct DispatchStats {
    events_published: AtomicU64,
    listeners_completed: AtomicU64,
    listeners_failed: AtomicU64,
    listeners_skipped: AtomicU64,
    predicate_errors: AtomicU64,
    submissions_rejected: AtomicU64,
}

/// Point-in-time copy of [`DispatchStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStatsSnapshot {
    /// Calls to `publish`, including events with no listeners.
    pub events_published: u64,
    pub listeners_completed: u64,
    /// Returned errors, panics and timeouts.
    pub listeners_failed: u64,
    /// Predicate evaluated to false.
    pub listeners_skipped: u64,
    pub predicate_errors: u64,
    /// Async submissions refused by the executor.
    pub submissions_rejected: u64,
}

impl DispatchStats {
    pub(crate) fn record_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_completed(&self) {
        self.listeners_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.listeners_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_skipped(&self) {
        self.listeners_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_predicate_error(&self) {
        self.predicate_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_rejected(&self) {
        self.submissions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatchStatsSnapshot {
        DispatchStatsSnapshot {
            events_published: self.events_published.load(Ordering::Relaxed),
            listeners_completed: self.listeners_completed.load(Ordering::Relaxed),
            listeners_failed: self.listeners_failed.load(Ordering::Relaxed),
            listeners_skipped: self.listeners_skipped.load(Ordering::Relaxed),
            predicate_errors: self.predicate_errors.load(Ordering::Relaxed),
            submissions_rejected: self.submissions_rejected.load(Ordering::Relaxed),
        }
    }
}

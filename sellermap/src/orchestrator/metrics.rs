//! Fetch counters.
//!
//! Lock-free counters updated by the event loop and read from any thread
//! through [`FetchMetrics::snapshot`].

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one orchestrator instance.
#[derive(Debug, Default)]
pub struct FetchMetrics {
    viewport_changes: AtomicU64,
    debounce_collapsed: AtomicU64,
    fetches_issued: AtomicU64,
    fetches_applied: AtomicU64,
    fetches_stale: AtomicU64,
    fetches_failed: AtomicU64,
}

impl FetchMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport_changed(&self) {
        self.viewport_changes.fetch_add(1, Ordering::Relaxed);
    }

    /// A pending viewport was replaced before its timer fired.
    pub fn debounce_collapsed(&self) {
        self.debounce_collapsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_issued(&self) {
        self.fetches_issued.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_applied(&self) {
        self.fetches_applied.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_stale(&self) {
        self.fetches_stale.fetch_add(1, Ordering::Relaxed);
    }

    pub fn fetch_failed(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> FetchMetricsSnapshot {
        FetchMetricsSnapshot {
            viewport_changes: self.viewport_changes.load(Ordering::Relaxed),
            debounce_collapsed: self.debounce_collapsed.load(Ordering::Relaxed),
            fetches_issued: self.fetches_issued.load(Ordering::Relaxed),
            fetches_applied: self.fetches_applied.load(Ordering::Relaxed),
            fetches_stale: self.fetches_stale.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`FetchMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchMetricsSnapshot {
    pub viewport_changes: u64,
    pub debounce_collapsed: u64,
    pub fetches_issued: u64,
    pub fetches_applied: u64,
    pub fetches_stale: u64,
    pub fetches_failed: u64,
}

impl FetchMetricsSnapshot {
    /// Fetches that have not resolved yet.
    pub fn in_flight(&self) -> u64 {
        self.fetches_issued
            .saturating_sub(self.fetches_applied + self.fetches_stale + self.fetches_failed)
    }
}

impl fmt::Display for FetchMetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "viewports={} collapsed={} fetches={} applied={} stale={} failed={}",
            self.viewport_changes,
            self.debounce_collapsed,
            self.fetches_issued,
            self.fetches_applied,
            self.fetches_stale,
            self.fetches_failed
        )
    }
}

//! Probe failure statistics.
//!
//! Failures are absorbed by the probe, so these counters are the only place
//! they remain visible after a run.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use strum::IntoEnumIterator;

use super::types::{ProbeError, ProbeFailureKind};

/// Thread-safe probe failure tracker.
///
/// Every [`ProbeFailureKind`] is initialized to zero on creation, so lookups
/// never miss. Share across tasks with `Arc`.
pub struct ProbeStats {
    failures: HashMap<ProbeFailureKind, AtomicUsize>,
}

impl ProbeStats {
    /// Creates a tracker with every counter at zero.
    pub fn new() -> Self {
        let mut failures = HashMap::new();
        for kind in ProbeFailureKind::iter() {
            failures.insert(kind, AtomicUsize::new(0));
        }
        ProbeStats { failures }
    }

    /// Records an absorbed error under its category.
    pub fn record(&self, error: &ProbeError) {
        self.increment(ProbeFailureKind::from(error));
    }

    /// Increments the counter for `kind`.
    pub fn increment(&self, kind: ProbeFailureKind) {
        if let Some(counter) = self.failures.get(&kind) {
            counter.fetch_add(1, Ordering::Relaxed);
        } else {
            log::error!(
                "Attempted to increment probe failure counter for {:?} which is not in the map",
                kind
            );
        }
    }

    /// Current count for `kind`.
    pub fn get_count(&self, kind: ProbeFailureKind) -> usize {
        self.failures
            .get(&kind)
            .map(|c| c.load(Ordering::SeqCst))
            .unwrap_or(0)
    }

    /// Sum of all counters.
    pub fn total(&self) -> usize {
        self.failures
            .values()
            .map(|c| c.load(Ordering::SeqCst))
            .sum()
    }
}

impl Default for ProbeStats {
    fn default() -> Self {
        Self::new()
    }
}

//! Scan statistics
//!
//! Counters are atomic so detail fetches running concurrently can record
//! into the same instance.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters collected while scanning a collection
#[derive(Debug, Default)]
pub struct ScanMetrics {
    pub items: AtomicU64,
    pub successful_fetches: AtomicU64,
    pub failed_fetches: AtomicU64,
    pub retries_attempted: AtomicU64,
    pub mod_candidates: AtomicU64,
    pub map_candidates: AtomicU64,
}

impl ScanMetrics {
    pub fn record_item_started(&self) {
        self.items.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_completed(&self) {
        self.successful_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failed(&self) {
        self.failed_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_retry(&self) {
        self.retries_attempted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_candidates(&self, mods: usize, maps: usize) {
        self.mod_candidates.fetch_add(mods as u64, Ordering::Relaxed);
        self.map_candidates.fetch_add(maps as u64, Ordering::Relaxed);
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> ScanMetricsSnapshot {
        ScanMetricsSnapshot {
            items: self.items.load(Ordering::Relaxed),
            successful_fetches: self.successful_fetches.load(Ordering::Relaxed),
            failed_fetches: self.failed_fetches.load(Ordering::Relaxed),
            retries_attempted: self.retries_attempted.load(Ordering::Relaxed),
            mod_candidates: self.mod_candidates.load(Ordering::Relaxed),
            map_candidates: self.map_candidates.load(Ordering::Relaxed),
        }
    }
}

/// Immutable snapshot of metrics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanMetricsSnapshot {
    pub items: u64,
    pub successful_fetches: u64,
    pub failed_fetches: u64,
    pub retries_attempted: u64,
    pub mod_candidates: u64,
    pub map_candidates: u64,
}

impl ScanMetricsSnapshot {
    pub fn success_rate(&self) -> f64 {
        let attempted = self.successful_fetches + self.failed_fetches;
        if attempted == 0 {
            0.0
        } else {
            self.successful_fetches as f64 / attempted as f64
        }
    }
}

//! Per-cache operation counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters recorded by a cache when statistics are enabled
#[derive(Debug, Default)]
pub struct CacheStatistics {
    puts: AtomicU64,
    retrievals: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
    removals: AtomicU64,
}

/// Point-in-time copy of [`CacheStatistics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatisticsSnapshot {
    pub puts: u64,
    pub retrievals: u64,
    pub hits: u64,
    pub misses: u64,
    pub removals: u64,
}

impl CacheStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_put(&self) {
        self.puts.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_hit(&self) {
        self.retrievals.fetch_add(1, Ordering::Relaxed);
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.retrievals.fetch_add(1, Ordering::Relaxed);
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removal(&self) {
        self.removals.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatisticsSnapshot {
        CacheStatisticsSnapshot {
            puts: self.puts.load(Ordering::Relaxed),
            retrievals: self.retrievals.load(Ordering::Relaxed),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            removals: self.removals.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.puts.store(0, Ordering::Relaxed);
        self.retrievals.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.removals.store(0, Ordering::Relaxed);
    }
}

impl CacheStatisticsSnapshot {
    /// Fraction of retrievals that were hits, `0.0` before the first retrieval
    pub fn hit_ratio(&self) -> f64 {
        if self.retrievals == 0 {
            0.0
        } else {
            self.hits as f64 / self.retrievals as f64
        }
    }
}

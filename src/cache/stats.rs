//! Cache Statistics Module
//!
//! Counts how facade lookups resolved. `unavailable` is kept apart from
//! `misses` so a dead backend shows up in the numbers even though callers
//! cannot tell the two apart.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Stats Counters ==
/// Lock-free counters shared by every clone of the facade.
#[derive(Debug, Default)]
pub struct StatsCounters {
    hits: AtomicU64,
    misses: AtomicU64,
    unavailable: AtomicU64,
    invalidations: AtomicU64,
}

impl StatsCounters {
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unavailable(&self) {
        self.unavailable.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of the counters.
    pub fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            unavailable: self.unavailable.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

// == Cache Stats ==
/// Snapshot of the lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Lookups that fell through because the key was absent
    pub misses: u64,
    /// Lookups that fell through because the backend failed or is disabled
    pub unavailable: u64,
    /// Keys deleted by write paths
    pub invalidations: u64,
}

impl CacheStats {
    // == Hit Rate ==
    /// hits / all lookups, or 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses + self.unavailable;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_start_at_zero() {
        let counters = StatsCounters::default();
        assert_eq!(counters.snapshot(), CacheStats::default());
        assert_eq!(counters.snapshot().hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_counts_unavailable_as_lookups() {
        let counters = StatsCounters::default();
        counters.record_hit();
        counters.record_miss();
        counters.record_unavailable();
        counters.record_hit();

        let stats = counters.snapshot();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.unavailable, 1);
        assert_eq!(stats.hit_rate(), 0.5);
    }

    #[test]
    fn test_invalidations_do_not_affect_hit_rate() {
        let counters = StatsCounters::default();
        counters.record_hit();
        counters.record_invalidation();
        counters.record_invalidation();

        let stats = counters.snapshot();
        assert_eq!(stats.invalidations, 2);
        assert_eq!(stats.hit_rate(), 1.0);
    }
}

//! Core data types for the cache manager.

use serde::{Deserialize, Serialize};
use std::time::Instant;

/// A resident cache entry.
#[derive(Debug, Clone)]
pub(crate) struct CacheEntry<T> {
    /// The cached payload.
    pub value: T,
    /// Instant after which the entry is logically gone.
    pub expires_at: Instant,
    /// Insertion sequence number; overwriting a key keeps its original number.
    pub inserted_seq: u64,
}

impl<T> CacheEntry<T> {
    /// Whether the entry has expired as of `now`.
    pub fn is_expired(&self, now: Instant) -> bool {
        now > self.expires_at
    }
}

/// Cache statistics for observability.
///
/// `hits` and `misses` accumulate over the lifetime of the manager and are
/// reset only by `clear`. `size` includes expired entries that have not been
/// touched since they expired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Total number of cache hits.
    pub hits: u64,
    /// Total number of cache misses (absent or expired).
    pub misses: u64,
    /// Number of keys currently resident.
    pub size: usize,
    /// `hits / (hits + misses)`, or 0.0 before the first access.
    pub hit_rate: f64,
}

impl CacheStats {
    /// Build a snapshot, deriving the hit rate from the counters.
    pub fn new(hits: u64, misses: u64, size: usize) -> Self {
        let total = hits + misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        };

        Self {
            hits,
            misses,
            size,
            hit_rate,
        }
    }

    /// Total number of lookups recorded.
    pub fn lookups(&self) -> u64 {
        self.hits + self.misses
    }
}

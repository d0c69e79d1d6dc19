//! CacheManager implementation with lazy TTL expiration and insertion-order eviction.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use super::clock::{Clock, SystemClock};
use super::config::{CacheConfig, CacheConfigError};
use super::types::{CacheEntry, CacheStats};

/// Bounded, TTL-based key/value store.
///
/// Entries are evicted in insertion order once the store reaches
/// `max_cache_size`: the earliest surviving insertion goes first, regardless
/// of how recently it was read. Overwriting a key keeps its place in that
/// order.
///
/// The manager is a plain data structure; wrap it in a lock to share it.
pub struct CacheManager<T> {
    /// Resident entries (key -> entry).
    entries: HashMap<String, CacheEntry<T>>,
    /// Next insertion sequence number.
    next_seq: u64,
    hits: u64,
    misses: u64,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
}

impl<T> CacheManager<T> {
    /// Create a new cache manager with the given configuration.
    ///
    /// # Errors
    /// Returns `CacheConfigError` if the configuration is invalid.
    pub fn new(config: CacheConfig) -> Result<Self, CacheConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new cache manager reading time from `clock`.
    ///
    /// # Errors
    /// Returns `CacheConfigError` if the configuration is invalid.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Result<Self, CacheConfigError> {
        config.validate()?;

        Ok(Self {
            entries: HashMap::new(),
            next_seq: 0,
            hits: 0,
            misses: 0,
            config,
            clock,
        })
    }

    /// Store `value` under `key`.
    ///
    /// If the store is already at capacity, the earliest-inserted entry is
    /// evicted first. This happens even when `key` is itself resident, in
    /// which case the evicted entry may be `key`'s own.
    ///
    /// `custom_ttl` overrides the configured default TTL for this entry.
    pub fn set(&mut self, key: impl Into<String>, value: T, custom_ttl: Option<Duration>) {
        let key = key.into();

        if self.entries.len() >= self.config.max_cache_size
            && let Some(oldest) = self.find_oldest_key()
        {
            self.entries.remove(&oldest);
            info!(evicted_key = %oldest, "Evicted oldest cache entry");
        }

        let ttl = custom_ttl.unwrap_or_else(|| self.config.default_ttl());
        let expires_at = self.clock.now() + ttl;

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.expires_at = expires_at;
        } else {
            let inserted_seq = self.next_seq;
            self.next_seq += 1;
            self.entries.insert(
                key.clone(),
                CacheEntry {
                    value,
                    expires_at,
                    inserted_seq,
                },
            );
        }

        debug!(key = %key, ttl_ms = ttl.as_millis() as u64, "Cache entry stored");
    }

    /// Remove `key` if present.
    pub fn delete(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            debug!(key = %key, "Cache entry deleted");
        }
    }

    /// Remove every entry and reset hit/miss counters.
    pub fn clear(&mut self) {
        let cleared_count = self.entries.len();
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
        info!(cleared_count, "Cleared cache");
    }

    /// Remove every entry whose expiry lies in the past.
    ///
    /// Never called by the manager itself.
    ///
    /// # Returns
    /// The number of entries removed.
    pub fn invalidate_expired(&mut self) -> usize {
        let now = self.clock.now();
        let initial_count = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let removed = initial_count - self.entries.len();

        if removed > 0 {
            info!(removed, remaining = self.entries.len(), "Invalidated expired cache entries");
        }

        removed
    }

    /// Snapshot of current statistics.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats::new(self.hits, self.misses, self.entries.len())
    }

    /// Number of resident keys, including expired entries not yet touched.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` is resident, without touching statistics or expiry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Get the cache configuration.
    #[must_use]
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Find the key with the lowest insertion sequence number.
    fn find_oldest_key(&self) -> Option<String> {
        self.entries
            .iter()
            .min_by_key(|(_, entry)| entry.inserted_seq)
            .map(|(key, _)| key.clone())
    }
}

impl<T: Clone> CacheManager<T> {
    /// Look up a live value.
    ///
    /// An absent key counts as a miss. An expired entry is removed and also
    /// counts as a miss.
    pub fn get(&mut self, key: &str) -> Option<T> {
        let now = self.clock.now();

        let expired = match self.entries.get(key) {
            None => {
                self.misses += 1;
                debug!(key = %key, "Cache miss");
                return None;
            }
            Some(entry) => entry.is_expired(now),
        };

        if expired {
            self.entries.remove(key);
            self.misses += 1;
            debug!(key = %key, "Cache entry expired");
            return None;
        }

        self.hits += 1;
        debug!(key = %key, "Cache hit");
        self.entries.get(key).map(|entry| entry.value.clone())
    }
}

impl<T> fmt::Debug for CacheManager<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheManager")
            .field("size", &self.entries.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

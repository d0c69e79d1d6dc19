//! Configuration for the cache manager.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration for a [`CacheManager`](crate::CacheManager).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    /// TTL in milliseconds applied when `set` is called without one (default: 300000 = 5 minutes).
    #[serde(default = "default_ttl_ms")]
    pub default_ttl_ms: u64,

    /// Maximum number of resident keys (default: 100).
    #[serde(default = "default_max_cache_size")]
    pub max_cache_size: usize,
}

fn default_ttl_ms() -> u64 {
    5 * 60 * 1000 // 5 minutes
}

fn default_max_cache_size() -> usize {
    100
}

/// Errors that can occur during cache configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CacheConfigError {
    /// Invalid default TTL (must be > 0).
    #[error("Invalid default TTL: must be greater than 0")]
    InvalidDefaultTtl,

    /// Invalid max cache size (must be > 0).
    #[error("Invalid max cache size: must be greater than 0")]
    InvalidMaxCacheSize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl_ms: default_ttl_ms(),
            max_cache_size: default_max_cache_size(),
        }
    }
}

impl CacheConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default TTL, rounded up to whole milliseconds.
    #[must_use]
    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl_ms = u64::try_from(ttl.as_nanos().div_ceil(1_000_000)).unwrap_or(u64::MAX);
        self
    }

    /// Set the maximum number of resident keys.
    #[must_use]
    pub fn with_max_cache_size(mut self, max: usize) -> Self {
        self.max_cache_size = max;
        self
    }

    /// Validate the cache configuration.
    ///
    /// # Errors
    /// Returns `CacheConfigError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), CacheConfigError> {
        if self.default_ttl_ms == 0 {
            return Err(CacheConfigError::InvalidDefaultTtl);
        }

        if self.max_cache_size == 0 {
            return Err(CacheConfigError::InvalidMaxCacheSize);
        }

        Ok(())
    }

    /// Get the default TTL as a Duration.
    #[must_use]
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }
}

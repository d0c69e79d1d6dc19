//! Configuration for the data provider.

use lpx_cache::{CacheConfig, CacheConfigError};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// How concurrent requests for the same key are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMode {
    /// Every caller that misses runs its own fetch; the last write wins.
    #[default]
    Independent,
    /// Callers for the same key queue behind one another, and a caller that
    /// waited reuses the value stored by the one before it.
    SingleFlight,
}

/// Configuration for a [`DataProvider`](crate::DataProvider).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Settings for the underlying cache manager.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Concurrent fetch handling (default: independent).
    #[serde(default)]
    pub fetch_mode: FetchMode,

    /// Seconds between proactive expiry sweeps. Unset means expiration is lazy only.
    #[serde(default)]
    pub sweep_interval_secs: Option<u64>,
}

/// Errors that can occur during provider configuration validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProviderConfigError {
    /// Invalid cache settings.
    #[error(transparent)]
    Cache(#[from] CacheConfigError),

    /// Invalid sweep interval (must be > 0 when set).
    #[error("Invalid sweep interval: must be greater than 0")]
    InvalidSweepInterval,
}

impl ProviderConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cache settings.
    #[must_use]
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Set the fetch mode.
    #[must_use]
    pub fn with_fetch_mode(mut self, mode: FetchMode) -> Self {
        self.fetch_mode = mode;
        self
    }

    /// Enable periodic expiry sweeps, rounding the interval up to whole seconds.
    #[must_use]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        let partial = u64::from(interval.subsec_nanos() > 0);
        self.sweep_interval_secs = Some(interval.as_secs().saturating_add(partial));
        self
    }

    /// Validate the provider configuration.
    ///
    /// # Errors
    /// Returns `ProviderConfigError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ProviderConfigError> {
        self.cache.validate()?;

        if self.sweep_interval_secs == Some(0) {
            return Err(ProviderConfigError::InvalidSweepInterval);
        }

        Ok(())
    }

    /// Get the sweep interval as a Duration, if sweeping is enabled.
    #[must_use]
    pub fn sweep_interval(&self) -> Option<Duration> {
        self.sweep_interval_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_default() {
        let config = ProviderConfig::default();
        assert_eq!(config.cache, CacheConfig::default());
        assert_eq!(config.fetch_mode, FetchMode::Independent);
        assert_eq!(config.sweep_interval(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_provider_config_rejects_zero_sweep_interval() {
        let config = ProviderConfig {
            sweep_interval_secs: Some(0),
            ..Default::default()
        };

        assert_eq!(config.validate(), Err(ProviderConfigError::InvalidSweepInterval));
    }

    #[test]
    fn test_provider_config_propagates_cache_errors() {
        let config = ProviderConfig::new().with_cache(CacheConfig::new().with_max_cache_size(0));

        assert_eq!(
            config.validate(),
            Err(ProviderConfigError::Cache(CacheConfigError::InvalidMaxCacheSize))
        );
    }

    #[test]
    fn test_sweep_interval_rounds_up() {
        let config = ProviderConfig::new().with_sweep_interval(Duration::from_millis(500));
        assert_eq!(config.sweep_interval_secs, Some(1));
        assert!(config.validate().is_ok());

        let config = ProviderConfig::new().with_sweep_interval(Duration::from_millis(2500));
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(3)));

        let config = ProviderConfig::new().with_sweep_interval(Duration::from_secs(30));
        assert_eq!(config.sweep_interval_secs, Some(30));
    }

    #[test]
    fn test_provider_config_from_toml() {
        let config: ProviderConfig = toml::from_str(
            r#"
            fetch_mode = "single_flight"
            sweep_interval_secs = 30

            [cache]
            default_ttl_ms = 60000
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch_mode, FetchMode::SingleFlight);
        assert_eq!(config.sweep_interval(), Some(Duration::from_secs(30)));
        assert_eq!(config.cache.default_ttl_ms, 60_000);
        assert_eq!(config.cache.max_cache_size, 100);
    }
}

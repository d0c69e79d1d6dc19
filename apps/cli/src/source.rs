//! Simulated reference-data backend used by `lpx simulate`.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Errors returned by a reference-data source.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The backend could not be reached.
    #[error("backend unavailable while fetching '{0}'")]
    Unavailable(String),
}

/// Something that can produce the payload for a cache key.
#[async_trait]
pub trait ReferenceSource: Send + Sync {
    /// Fetch the current payload for `key`.
    async fn fetch(&self, key: &str) -> Result<Value, SourceError>;

    /// Number of fetches served so far.
    fn calls(&self) -> u64;
}

/// In-process source with fixed latency and a deterministic failure pattern.
#[derive(Debug)]
pub struct MockSource {
    latency: Duration,
    failure_rate: f64,
    calls: AtomicU64,
}

impl MockSource {
    /// Create a source. `failure_rate` is clamped to `0.0..=1.0`; NaN means
    /// no failures.
    pub fn new(latency: Duration, failure_rate: f64) -> Self {
        let failure_rate = if failure_rate.is_nan() {
            0.0
        } else {
            failure_rate.clamp(0.0, 1.0)
        };

        Self {
            latency,
            failure_rate,
            calls: AtomicU64::new(0),
        }
    }

    /// Whether call number `n` (zero-based) fails.
    ///
    /// Failures are spread evenly: over any run of calls, the share that
    /// fails tracks `failure_rate`.
    fn fails(&self, n: u64) -> bool {
        let before = (n as f64 * self.failure_rate).floor();
        let after = ((n + 1) as f64 * self.failure_rate).floor();
        after > before
    }
}

#[async_trait]
impl ReferenceSource for MockSource {
    async fn fetch(&self, key: &str) -> Result<Value, SourceError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.fails(n) {
            debug!(key = %key, call = n, "Simulated backend failure");
            return Err(SourceError::Unavailable(key.to_string()));
        }

        Ok(json!({
            "key": key,
            "version": n,
            "items": [format!("{key}-1"), format!("{key}-2")],
        }))
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_never_fails_at_zero_rate() {
        let source = MockSource::new(Duration::ZERO, 0.0);

        for _ in 0..10 {
            assert!(source.fetch("all-skills").await.is_ok());
        }
        assert_eq!(source.calls(), 10);
    }

    #[tokio::test]
    async fn test_always_fails_at_full_rate() {
        let source = MockSource::new(Duration::ZERO, 1.0);

        let err = source.fetch("role-types").await.unwrap_err();
        assert_eq!(err, SourceError::Unavailable("role-types".to_string()));
    }

    #[test]
    fn test_failure_pattern_tracks_rate() {
        let source = MockSource::new(Duration::ZERO, 0.25);
        let failures = (0..100).filter(|n| source.fails(*n)).count();
        assert_eq!(failures, 25);
    }

    #[test]
    fn test_rate_is_clamped() {
        let source = MockSource::new(Duration::ZERO, 7.0);
        assert!((0..5).all(|n| source.fails(n)));
    }

    #[test]
    fn test_nan_rate_never_fails() {
        let source = MockSource::new(Duration::ZERO, f64::NAN);
        assert!(!(0..5).any(|n| source.fails(n)));
    }
}

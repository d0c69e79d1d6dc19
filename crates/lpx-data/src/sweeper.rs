//! Optional background sweep of expired entries.
//!
//! The provider expires entries lazily. Integrators who would rather keep
//! the resident size close to the live size can run a sweeper, which calls
//! [`DataProvider::invalidate_expired`] on a fixed interval.

use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::provider::DataProvider;

/// Spawn a task that sweeps expired entries from `provider` every `interval`.
///
/// The task holds only a weak reference and stops on its own once the last
/// `Arc<DataProvider>` is dropped. Abort the returned handle to stop it
/// earlier. Must be called from within a tokio runtime.
pub fn spawn_expiry_sweeper(provider: &Arc<DataProvider>, interval: Duration) -> JoinHandle<()> {
    let provider: Weak<DataProvider> = Arc::downgrade(provider);
    info!(interval_ms = interval.as_millis() as u64, "Starting expiry sweeper");

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            let Some(provider) = provider.upgrade() else {
                debug!("Provider dropped, stopping expiry sweeper");
                break;
            };

            let removed = provider.invalidate_expired();
            if removed > 0 {
                debug!(removed, "Expiry sweep removed entries");
            }
        }
    })
}

/// Spawn a sweeper if `sweep_interval_secs` is set in the provider's config.
pub fn spawn_configured_sweeper(provider: &Arc<DataProvider>) -> Option<JoinHandle<()>> {
    provider
        .config()
        .sweep_interval()
        .map(|interval| spawn_expiry_sweeper(provider, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    #[tokio::test]
    async fn test_no_sweeper_without_interval() {
        let provider = Arc::new(DataProvider::new(ProviderConfig::default()).unwrap());
        assert!(spawn_configured_sweeper(&provider).is_none());
    }

    #[tokio::test]
    async fn test_sweeper_stops_when_provider_dropped() {
        let provider = Arc::new(DataProvider::new(ProviderConfig::default()).unwrap());
        let handle = spawn_expiry_sweeper(&provider, Duration::from_millis(5));

        drop(provider);

        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper should exit")
            .unwrap();
    }
}

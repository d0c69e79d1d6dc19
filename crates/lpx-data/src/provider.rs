//! DataProvider implementation: get-or-populate over a shared cache manager.

use lpx_cache::{CacheManager, CacheStats, Clock, SystemClock};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use crate::config::{FetchMode, ProviderConfig, ProviderConfigError};
use crate::state::{RequestState, RequestStates};

/// Message recorded when a fetch fails with an error that renders as empty text.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Type-erased cached value; each call site pins the concrete type.
type AnyValue = Arc<dyn Any + Send + Sync>;

/// Per-key gates used by [`FetchMode::SingleFlight`].
type GateMap = HashMap<String, Arc<AsyncMutex<()>>>;

/// Shared get-or-populate façade over one [`CacheManager`].
///
/// All state sits behind short synchronous locks that are never held across
/// an `.await`, so the provider can be shared freely as `Arc<DataProvider>`.
pub struct DataProvider {
    /// The shared cache (key -> type-erased value).
    cache: Mutex<CacheManager<AnyValue>>,
    /// Loading and error state per key.
    requests: Mutex<RequestStates>,
    /// In-flight gates, only populated in single-flight mode.
    gates: Mutex<GateMap>,
    config: ProviderConfig,
}

impl DataProvider {
    /// Create a new provider with the given configuration.
    ///
    /// # Errors
    /// Returns `ProviderConfigError` if the configuration is invalid.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderConfigError> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a new provider whose cache reads time from `clock`.
    ///
    /// # Errors
    /// Returns `ProviderConfigError` if the configuration is invalid.
    pub fn with_clock(
        config: ProviderConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, ProviderConfigError> {
        config.validate()?;
        let cache = CacheManager::with_clock(config.cache.clone(), clock)?;

        info!(
            max_cache_size = config.cache.max_cache_size,
            default_ttl_ms = config.cache.default_ttl_ms,
            fetch_mode = ?config.fetch_mode,
            "Data provider created"
        );

        Ok(Self {
            cache: Mutex::new(cache),
            requests: Mutex::new(RequestStates::default()),
            gates: Mutex::new(HashMap::new()),
            config,
        })
    }

    /// Return the cached value for `cache_key`, or fetch and cache it.
    ///
    /// On a hit `fetch` is never called. On a miss its result is stored with
    /// the default TTL. A failed fetch is recorded in the key's error state
    /// and the original error is returned; failures are never cached, so the
    /// next call fetches again.
    ///
    /// A value cached under `cache_key` with a type other than `T` is treated
    /// as a miss and replaced.
    pub async fn get_cached_data<T, E, F, Fut>(&self, cache_key: &str, fetch: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut call = InFlight::start(self, cache_key);

        let result = match self.config.fetch_mode {
            FetchMode::Independent => self.load(cache_key, fetch).await,
            FetchMode::SingleFlight => {
                let _turn = call.gate().lock_owned().await;
                self.load(cache_key, fetch).await
            }
        };

        call.settled = true;
        result
    }

    /// [`get_cached_data`](Self::get_cached_data) with a direct fallback.
    ///
    /// With no `cache_key` the cache is bypassed and `fetch` is called
    /// directly. If the cached path fails, the failure is recorded and logged
    /// and `fetch` is called once more; that second result is returned as is
    /// and never cached.
    pub async fn get_cached_or_direct<T, E, F, Fut>(
        &self,
        cache_key: Option<&str>,
        fetch: F,
    ) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: fmt::Display,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let Some(cache_key) = cache_key else {
            debug!("No cache key, fetching directly");
            return fetch().await;
        };

        match self.get_cached_data(cache_key, &fetch).await {
            Ok(value) => Ok(value),
            Err(error) => {
                warn!(key = %cache_key, error = %error, "Cached fetch failed, retrying directly");
                fetch().await
            }
        }
    }

    async fn load<T, E, F, Fut>(&self, cache_key: &str, fetch: F) -> Result<T, E>
    where
        T: Clone + Send + Sync + 'static,
        E: fmt::Display,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.lookup::<T>(cache_key) {
            self.requests().resolve(cache_key);
            return Ok(value);
        }

        debug!(key = %cache_key, "Fetching fresh data");

        match fetch().await {
            Ok(value) => {
                let stored: AnyValue = Arc::new(value.clone());
                self.cache().set(cache_key, stored, None);
                self.requests().resolve(cache_key);
                Ok(value)
            }
            Err(error) => {
                let mut message = error.to_string();
                if message.is_empty() {
                    message = UNKNOWN_ERROR.to_string();
                }
                warn!(key = %cache_key, error = %message, "Fetch failed");
                self.requests().fail(cache_key, message);
                Err(error)
            }
        }
    }

    fn lookup<T>(&self, cache_key: &str) -> Option<T>
    where
        T: Clone + Send + Sync + 'static,
    {
        let value = self.cache().get(cache_key)?;

        match value.downcast::<T>() {
            Ok(typed) => Some(T::clone(&typed)),
            Err(_) => {
                warn!(
                    key = %cache_key,
                    expected = std::any::type_name::<T>(),
                    "Cached value has a different type, refetching"
                );
                None
            }
        }
    }

    /// Drop `cache_key` from the cache. Loading and error state are left alone.
    pub fn invalidate_cache(&self, cache_key: &str) {
        self.cache().delete(cache_key);
        info!(key = %cache_key, "Cache invalidated");
    }

    /// Empty the cache, reset its statistics, and forget all request state.
    pub fn clear_all_caches(&self) {
        self.cache().clear();
        self.requests().clear();
    }

    /// Whether a fetch for `cache_key` is in flight.
    pub fn is_loading(&self, cache_key: &str) -> bool {
        self.requests().is_loading(cache_key)
    }

    /// Message of the last failed fetch for `cache_key`.
    pub fn get_error(&self, cache_key: &str) -> Option<String> {
        self.requests().error(cache_key)
    }

    /// Loading and error state for `cache_key` in one read.
    pub fn request_state(&self, cache_key: &str) -> RequestState {
        self.requests().snapshot(cache_key)
    }

    /// Statistics of the shared cache.
    ///
    /// Statistics are global to the provider; `cache_key` does not narrow
    /// them. Always returns `Some`.
    pub fn get_cache_stats(&self, cache_key: &str) -> Option<CacheStats> {
        let _ = cache_key;
        Some(self.stats())
    }

    /// Statistics of the shared cache.
    pub fn stats(&self) -> CacheStats {
        self.cache().stats()
    }

    /// Remove expired entries now instead of waiting for them to be read.
    ///
    /// # Returns
    /// The number of entries removed.
    pub fn invalidate_expired(&self) -> usize {
        self.cache().invalidate_expired()
    }

    /// Get the provider configuration.
    #[must_use]
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn cache(&self) -> MutexGuard<'_, CacheManager<AnyValue>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn requests(&self) -> MutexGuard<'_, RequestStates> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn gates(&self) -> MutexGuard<'_, GateMap> {
        self.gates.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn acquire_gate(&self, cache_key: &str) -> Arc<AsyncMutex<()>> {
        Arc::clone(self.gates().entry(cache_key.to_string()).or_default())
    }

    /// Forget the gate for `cache_key` once nobody else holds it.
    fn release_gate(&self, cache_key: &str) {
        let mut gates = self.gates();
        if gates
            .get(cache_key)
            .is_some_and(|gate| Arc::strong_count(gate) == 1)
        {
            gates.remove(cache_key);
        }
    }
}

impl fmt::Debug for DataProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataProvider")
            .field("cache", &*self.cache())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Bookkeeping for one `get_cached_data` call.
///
/// Dropping it before the call settles (the caller's future was cancelled)
/// clears the key's loading flag. A held single-flight gate is released on
/// drop either way.
struct InFlight<'a> {
    provider: &'a DataProvider,
    key: &'a str,
    gate: Option<Arc<AsyncMutex<()>>>,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn start(provider: &'a DataProvider, key: &'a str) -> Self {
        provider.requests().set_loading(key, true);
        Self {
            provider,
            key,
            gate: None,
            settled: false,
        }
    }

    /// The key's single-flight gate, registered on first use.
    fn gate(&mut self) -> Arc<AsyncMutex<()>> {
        let (provider, key) = (self.provider, self.key);
        Arc::clone(self.gate.get_or_insert_with(|| provider.acquire_gate(key)))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!(key = %self.key, "Request cancelled before settling");
            self.provider.requests().set_loading(self.key, false);
        }

        if let Some(gate) = self.gate.take() {
            drop(gate);
            self.provider.release_gate(self.key);
        }
    }
}

//! Shared data provider for LPX reference data.
//!
//! [`DataProvider`] wraps async fetch functions with get-or-populate
//! semantics on top of a single shared [`lpx_cache::CacheManager`], and
//! tracks per-key loading and error state for callers that want to render
//! progress without wrapping every call in error handling.
//!
//! There is no global instance. Construct a provider once, share it as
//! `Arc<DataProvider>`, and hand it to whoever needs cached reads.
//!
//! ```ignore
//! let provider = Arc::new(DataProvider::new(ProviderConfig::default())?);
//!
//! let skills = provider
//!     .get_cached_data(keys::ALL_SKILLS, || backend.all_skills())
//!     .await?;
//! ```

pub mod config;
pub mod keys;
pub mod provider;
pub mod state;
pub mod sweeper;

pub use config::{FetchMode, ProviderConfig, ProviderConfigError};
pub use lpx_cache::{CacheConfig, CacheStats};
pub use provider::{DataProvider, UNKNOWN_ERROR};
pub use state::RequestState;
pub use sweeper::{spawn_configured_sweeper, spawn_expiry_sweeper};

//! In-memory caching primitives for LPX.
//!
//! This crate provides [`CacheManager`], a capacity-bounded key/value store
//! with per-entry TTLs and hit/miss accounting. It knows nothing about what
//! it caches or how values are fetched; see `lpx-data` for the
//! get-or-populate layer built on top of it.
//!
//! # Expiration
//!
//! Expiration is lazy: an expired entry is only removed when its key is next
//! read, or when [`CacheManager::invalidate_expired`] is called explicitly.
//! Until then it still counts towards [`CacheManager::size`].

pub mod clock;
pub mod config;
pub mod manager;
pub mod types;

pub use clock::{Clock, MockClock, SystemClock};
pub use config::{CacheConfig, CacheConfigError};
pub use manager::CacheManager;
pub use types::CacheStats;

//! Per-key request bookkeeping.

use serde::Serialize;
use std::collections::HashMap;

/// Loading and error state for one cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestState {
    /// A fetch for this key is in flight.
    pub loading: bool,
    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
}

/// Loading and error maps, one entry per key ever requested.
#[derive(Debug, Default)]
pub(crate) struct RequestStates {
    loading: HashMap<String, bool>,
    errors: HashMap<String, Option<String>>,
}

impl RequestStates {
    pub fn set_loading(&mut self, key: &str, loading: bool) {
        self.loading.insert(key.to_string(), loading);
    }

    /// Mark `key` as settled successfully.
    pub fn resolve(&mut self, key: &str) {
        self.set_loading(key, false);
        self.errors.insert(key.to_string(), None);
    }

    /// Mark `key` as settled with an error.
    pub fn fail(&mut self, key: &str, message: String) {
        self.errors.insert(key.to_string(), Some(message));
        self.set_loading(key, false);
    }

    pub fn is_loading(&self, key: &str) -> bool {
        self.loading.get(key).copied().unwrap_or(false)
    }

    pub fn error(&self, key: &str) -> Option<String> {
        self.errors.get(key).cloned().flatten()
    }

    pub fn snapshot(&self, key: &str) -> RequestState {
        RequestState {
            loading: self.is_loading(key),
            error: self.error(key),
        }
    }

    pub fn clear(&mut self) {
        self.loading.clear();
        self.errors.clear();
    }
}

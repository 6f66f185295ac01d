use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Display;
use std::sync::Arc;

use super::Storage;
use crate::error::{AppError, AppResult};

/// Keys of the persisted preference namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKey {
    Region,
    Theme,
    Filters,
    Watched,
    Watchlist,
}

impl Display for PreferenceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PreferenceKey::Region => "region",
            PreferenceKey::Theme => "theme",
            PreferenceKey::Filters => "filters",
            PreferenceKey::Watched => "watched",
            PreferenceKey::Watchlist => "watchlist",
        };
        write!(f, "{}", name)
    }
}

/// Typed get/set over a durable [`Storage`] backend
#[derive(Clone)]
pub struct PreferenceStore {
    storage: Arc<dyn Storage>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Reads the value under `key`, falling back to `default` when the key is
    /// absent, unreadable or fails to decode. Never fails.
    pub fn get<T: DeserializeOwned>(&self, key: PreferenceKey, default: T) -> T {
        match self.load(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Discarding persisted value");
                default
            }
        }
    }

    /// Serializes and durably writes `value` under `key`
    pub fn set<T: Serialize>(&self, key: PreferenceKey, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::PersistedState(format!("serialization failed: {}", e)))?;
        self.storage.write(&key.to_string(), &json)?;
        tracing::debug!(key = %key, bytes = json.len(), "Persisted preference");
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: PreferenceKey) -> AppResult<Option<T>> {
        let raw = self
            .storage
            .read(&key.to_string())
            .map_err(|e| AppError::PersistedState(format!("read failed: {}", e)))?;

        match raw {
            Some(json) => serde_json::from_str(&json)
                .map(Some)
                .map_err(|e| AppError::PersistedState(format!("decode failed: {}", e))),
            None => Ok(None),
        }
    }
}

//! Read-through cache with wall-clock expiry.
//!
//! Entries live in the key-value store under `cache_<key>` as
//! `{"value": ..., "expiry": <epoch millis>}`. Every storage or decoding
//! problem is logged and reported as a miss; the cache never fails a caller.

use std::{sync::Arc, time::Duration};

use lantern_shared::time::Clock;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::warn;

use crate::domain::{KeyValueStore, StorageError};

/// Namespace reserved for cache entries in the key-value store
pub const CACHE_PREFIX: &str = "cache_";

/// Lifetime of an entry when the caller does not give one
pub const DEFAULT_CACHE_DURATION: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry<T> {
    value: T,
    expiry: i64,
}

/// Expiring cache over a [`KeyValueStore`].
pub struct SettingsCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    default_duration: Duration,
}

impl SettingsCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self::with_default_duration(store, clock, DEFAULT_CACHE_DURATION)
    }

    pub fn with_default_duration(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        default_duration: Duration,
    ) -> Self {
        Self {
            store,
            clock,
            default_duration,
        }
    }

    fn storage_key(key: &str) -> String {
        format!("{CACHE_PREFIX}{key}")
    }

    /// Cached value, if present and not yet expired.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.store.get_item(&Self::storage_key(key)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Cache read error: {}", e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Cache read error: {}", e);
                return None;
            }
        };

        (self.clock.now_millis() < entry.expiry).then_some(entry.value)
    }

    /// Store `value` for the default duration.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        self.set_for(key, value, self.default_duration);
    }

    /// Store `value` until `now + duration`.
    pub fn set_for<T: Serialize>(&self, key: &str, value: &T, duration: Duration) {
        let duration_millis = i64::try_from(duration.as_millis()).unwrap_or(i64::MAX);
        let entry = CacheEntry {
            value,
            expiry: self.clock.now_millis().saturating_add(duration_millis),
        };
        let result = serde_json::to_string(&entry)
            .map_err(StorageError::from)
            .and_then(|raw| self.store.set_item(&Self::storage_key(key), &raw));
        if let Err(e) = result {
            warn!("Cache write error: {}", e);
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.store.remove_item(&Self::storage_key(key)) {
            warn!("Cache remove error: {}", e);
        }
    }

    /// Drop every cache entry. Keys outside the cache namespace are untouched.
    pub fn clear(&self) {
        let keys = match self.store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                warn!("Cache clear error: {}", e);
                return;
            }
        };
        for key in keys.iter().filter(|k| k.starts_with(CACHE_PREFIX)) {
            if let Err(e) = self.store.remove_item(key) {
                warn!("Cache clear error: {}", e);
            }
        }
    }
}

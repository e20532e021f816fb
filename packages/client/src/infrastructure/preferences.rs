//! Typed access to the user preferences kept next to the cache.

use std::sync::Arc;

use tracing::warn;

use crate::domain::{ClientName, KeyValueStore};

/// Last name used to check status
pub const CLIENT_NAME_KEY: &str = "clientName";

/// Large-text display flag, stored as `"true"` / `"false"`
pub const LARGE_TEXT_KEY: &str = "largeText";

/// Preferences stored in the key-value store.
///
/// Like the cache, storage failures are logged and fall back to defaults.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn client_name(&self) -> Option<ClientName> {
        match self.store.get_item(CLIENT_NAME_KEY) {
            Ok(value) => value.and_then(|v| ClientName::new(v).ok()),
            Err(e) => {
                warn!("Failed to read {}: {}", CLIENT_NAME_KEY, e);
                None
            }
        }
    }

    pub fn remember_client_name(&self, name: &ClientName) {
        if let Err(e) = self.store.set_item(CLIENT_NAME_KEY, name.as_str()) {
            warn!("Failed to store {}: {}", CLIENT_NAME_KEY, e);
        }
    }

    pub fn large_text(&self) -> bool {
        match self.store.get_item(LARGE_TEXT_KEY) {
            Ok(value) => value.as_deref() == Some("true"),
            Err(e) => {
                warn!("Failed to read {}: {}", LARGE_TEXT_KEY, e);
                false
            }
        }
    }

    pub fn set_large_text(&self, enabled: bool) {
        let value = if enabled { "true" } else { "false" };
        if let Err(e) = self.store.set_item(LARGE_TEXT_KEY, value) {
            warn!("Failed to store {}: {}", LARGE_TEXT_KEY, e);
        }
    }
}

//! Client assembly.
//!
//! Builds the gateway, store, cache, poller and use cases once per client
//! context and hands them out together.

use std::{path::PathBuf, sync::Arc, time::Duration};

use lantern_shared::time::{Clock, SystemClock};

use crate::{
    constants::{DEFAULT_CACHE_TTL_SECS, DEFAULT_ENDPOINT, DEFAULT_STORE_PATH},
    domain::{GatewayError, KeyValueStore, QueueGateway, RetryPolicy},
    infrastructure::{JsonFileStore, Preferences, SettingsCache, SheetsRpcClient},
    ui::ClientView,
    usecase::{CheckStatusUseCase, LoadSettingsUseCase, QueuePoller, SubmitApplicationUseCase},
};

/// Runtime configuration of the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub store_path: PathBuf,
    pub cache_ttl: Duration,
    pub retry_policy: RetryPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            retry_policy: RetryPolicy::default(),
        }
    }
}

/// Wired-up client.
pub struct ClientApp {
    pub gateway: Arc<SheetsRpcClient>,
    pub poller: QueuePoller,
    pub preferences: Preferences,
    pub cache: Arc<SettingsCache>,
    pub submit_application: SubmitApplicationUseCase,
    pub check_status: CheckStatusUseCase,
    pub load_settings: LoadSettingsUseCase,
}

impl ClientApp {
    /// Client persisting to the JSON store at `config.store_path`.
    pub fn new(config: &ClientConfig, view: Arc<dyn ClientView>) -> Result<Self, GatewayError> {
        let store: Arc<dyn KeyValueStore> = Arc::new(JsonFileStore::open(&config.store_path));
        Self::with_store(config, view, store, Arc::new(SystemClock))
    }

    pub fn with_store(
        config: &ClientConfig,
        view: Arc<dyn ClientView>,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, GatewayError> {
        let gateway = Arc::new(SheetsRpcClient::new(&config.endpoint)?);
        let queue_gateway: Arc<dyn QueueGateway> = gateway.clone();

        let poller = QueuePoller::with_retry_policy(
            queue_gateway.clone(),
            view.clone(),
            config.retry_policy,
        );
        let preferences = Preferences::new(store.clone());
        let cache = Arc::new(SettingsCache::with_default_duration(
            store,
            clock,
            config.cache_ttl,
        ));

        Ok(Self {
            submit_application: SubmitApplicationUseCase::new(
                queue_gateway.clone(),
                poller.clone(),
                view.clone(),
            ),
            check_status: CheckStatusUseCase::new(
                poller.clone(),
                preferences.clone(),
                view.clone(),
            ),
            load_settings: LoadSettingsUseCase::new(queue_gateway, cache.clone(), view),
            gateway,
            poller,
            preferences,
            cache,
        })
    }
}

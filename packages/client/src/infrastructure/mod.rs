//! Infrastructure layer.
//!
//! Concrete implementations of the domain traits: the Apps Script RPC client,
//! key-value stores and the expiring cache layered on top of them.

pub mod cache;
pub mod dto;
pub mod gateway;
pub mod preferences;
pub mod storage;

pub use cache::{CACHE_PREFIX, DEFAULT_CACHE_DURATION, SettingsCache};
pub use gateway::SheetsRpcClient;
pub use preferences::Preferences;
pub use storage::{InMemoryStore, JsonFileStore};

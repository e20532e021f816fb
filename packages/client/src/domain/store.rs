//! Persistent key-value store abstraction (the client's "local storage").

use super::error::StorageError;

/// String-to-string store with local-storage semantics.
///
/// Implementations must be usable from any task; calls are short and
/// synchronous.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;

    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

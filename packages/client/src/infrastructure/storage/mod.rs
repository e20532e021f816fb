//! Key-value store implementations.
//!
//! The domain layer defines `KeyValueStore`; the poller's preferences and the
//! settings cache depend only on that trait.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

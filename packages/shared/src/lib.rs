//! Shared utilities for Lantern.
//!
//! Logging setup, Taipei-time helpers and the injectable clock used by the
//! client's cache.

pub mod logger;
pub mod time;

//! Client-wide defaults.

/// Placeholder web app URL; deployments pass their own `--endpoint`
pub const DEFAULT_ENDPOINT: &str = "https://script.google.com/macros/s/YOUR_SCRIPT_ID/exec";

/// Where the terminal client keeps its "local storage"
pub const DEFAULT_STORE_PATH: &str = ".lantern-store.json";

pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;

pub const DEFAULT_LOG_LEVEL: &str = "info";

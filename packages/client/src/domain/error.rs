//! Domain layer error definitions.

use thiserror::Error;

/// Errors related to Value Objects validation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueObjectError {
    /// ClientName validation error
    #[error("ClientName cannot be empty")]
    ClientNameEmpty,

    /// ClientName too long error
    #[error("ClientName cannot exceed {max} characters (got {actual})")]
    ClientNameTooLong { max: usize, actual: usize },
}

/// Errors returned by the remote procedure gateway.
///
/// `Application` is an answer from the endpoint (`{"error": ...}`); every
/// other variant means the call itself did not complete.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Network failure, timeout, connection refused
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status
    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Body was not the JSON shape the function returns
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// Application-level error reported by the endpoint
    #[error("{0}")]
    Application(String),
}

impl GatewayError {
    /// Whether the failure says nothing about the data itself, so the same
    /// call may succeed later.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::Application(_))
    }
}

/// Errors from a key-value store backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}

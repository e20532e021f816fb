//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{GatewayError, ValueObjectError};

/// 申請送信のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The endpoint refused the application (duplicate, queue full...)
    #[error("application rejected: {0}")]
    Rejected(String),

    #[error("submission failed: {0}")]
    Gateway(GatewayError),
}

/// 状態確認のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CheckStatusError {
    #[error("invalid client name: {0}")]
    InvalidName(#[from] ValueObjectError),
}

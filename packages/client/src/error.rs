//! Application-level errors surfaced by the CLI.

use thiserror::Error;

use crate::{
    domain::{GatewayError, ValueObjectError},
    usecase::{CheckStatusError, SubmitError},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    CheckStatus(#[from] CheckStatusError),

    #[error(transparent)]
    InvalidValue(#[from] ValueObjectError),

    #[error("line editor error: {0}")]
    Readline(String),

    #[error("{0}")]
    Usage(String),
}

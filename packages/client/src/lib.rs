//! Queue registration client library.
//!
//! Visitors submit an application, then the client keeps their waiting-list
//! view fresh by polling a Google Sheets RPC endpoint at a cadence that
//! follows their status. Layers follow the usual split: `domain` rules and
//! traits, `usecase` orchestration, `infrastructure` implementations and a
//! `ui` presentation layer.

pub mod app;
pub mod constants;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod ui;
pub mod usecase;

// Re-export entry points
pub use app::{ClientApp, ClientConfig};
pub use error::AppError;

//! UseCase 層
//!
//! ビジネスロジックを実装するレイヤー。
//! UI 層（CLI）から呼び出され、Domain 層のゲートウェイとビューを操作します。

pub mod check_status;
pub mod error;
pub mod load_settings;
pub mod queue_poller;
pub mod submit_application;

pub use check_status::CheckStatusUseCase;
pub use error::{CheckStatusError, SubmitError};
pub use load_settings::LoadSettingsUseCase;
pub use queue_poller::{PollOutcome, QueuePoller};
pub use submit_application::SubmitApplicationUseCase;

//! View abstraction driven by the use cases and the poller.

use std::fmt;

use crate::domain::{LightType, Submission};

use super::presenter::QueueRow;

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    /// Non-blocking, the client keeps working
    Warning,
    /// Needs the user's attention
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Danger, message)
    }

    fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Everything the client shows.
///
/// Calls are fire-and-forget and must not block; they are made from the
/// poller's timer task as well as from user actions.
pub trait ClientView: Send + Sync {
    /// Replace the displayed waiting list. An empty slice means nobody waits.
    fn render_queue(&self, rows: &[QueueRow]);

    /// Back to the registration form (the session is gone)
    fn show_application_form(&self);

    fn show_waiting_area(&self);

    fn show_submission(&self, submission: &Submission);

    fn show_light_type(&self, light_type: &LightType);

    fn alert(&self, notice: Notice);
}

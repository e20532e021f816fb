//! Presentation layer.
//!
//! Maps queue state to renderable rows and defines the view the use cases
//! talk to. The terminal front end is one implementation of that view.

pub mod presenter;
pub mod terminal;
pub mod view;

#[cfg(test)]
pub(crate) mod recording;

pub use presenter::{QueueRow, StatusClass, build_rows, is_current_user, mask_name, status_class};
pub use terminal::TerminalView;
pub use view::{ClientView, Notice, NoticeLevel};

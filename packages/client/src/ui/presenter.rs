//! Queue presentation mapping.

use crate::domain::{ClientSession, ClientStatus, QueueEntry};

/// Glyph replacing the hidden characters of a name
pub const MASK_GLYPH: char = '○';

/// Shown when a row has no name or status
pub const UNKNOWN_LABEL: &str = "未知";

/// Shown instead of rows when nobody is waiting
pub const EMPTY_QUEUE_MESSAGE: &str = "目前沒有等待中的客戶";

/// Visual category of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Pending,
    Waiting,
    Active,
    Serving,
    Completed,
}

impl StatusClass {
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Pending => "status-pending",
            Self::Waiting => "status-waiting",
            Self::Active => "status-active",
            Self::Serving => "status-serving",
            Self::Completed => "status-completed",
        }
    }
}

/// Badge category for a status. Rejected and unrecognized labels share the
/// pending look.
pub fn status_class(status: &ClientStatus) -> StatusClass {
    match status {
        ClientStatus::Pending => StatusClass::Pending,
        ClientStatus::Waiting => StatusClass::Waiting,
        ClientStatus::Entering => StatusClass::Active,
        ClientStatus::Serving => StatusClass::Serving,
        ClientStatus::Completed => StatusClass::Completed,
        ClientStatus::Rejected | ClientStatus::Unknown(_) => StatusClass::Pending,
    }
}

/// Hide all but the first and last character of a name.
///
/// Names of one or two characters are returned unchanged. The result always
/// has as many characters as the input.
pub fn mask_name(name: &str) -> String {
    let len = name.chars().count();
    if len <= 2 {
        return name.to_string();
    }
    let mut chars = name.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return name.to_string();
    };

    let mut masked = String::with_capacity(name.len() + (len - 2) * MASK_GLYPH.len_utf8());
    masked.push(first);
    masked.extend(std::iter::repeat_n(MASK_GLYPH, len - 2));
    masked.push(last);
    masked
}

/// Whether `entry` is the row of the session's visitor.
///
/// Compares the masked session name with the server's display name by full
/// string equality.
pub fn is_current_user(session: Option<&ClientSession>, entry: &QueueEntry) -> bool {
    match (session, entry.display_name.as_deref()) {
        (Some(session), Some(display_name)) if !display_name.is_empty() => {
            mask_name(session.name.as_str()) == display_name
        }
        _ => false,
    }
}

/// One rendered line of the waiting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueRow {
    /// "{n}號", or "號" when the sheet has no number
    pub queue_label: String,
    pub display_name: String,
    pub status_label: String,
    pub status_class: StatusClass,
    pub is_current_user: bool,
}

pub fn build_rows(entries: &[QueueEntry], session: Option<&ClientSession>) -> Vec<QueueRow> {
    entries
        .iter()
        .map(|entry| QueueRow {
            queue_label: match entry.queue_number {
                Some(n) => format!("{n}號"),
                None => "號".to_string(),
            },
            display_name: entry
                .display_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            status_label: entry
                .status
                .as_ref()
                .map(|s| s.label().to_string())
                .unwrap_or_else(|| UNKNOWN_LABEL.to_string()),
            status_class: entry
                .status
                .as_ref()
                .map(status_class)
                .unwrap_or(StatusClass::Pending),
            is_current_user: is_current_user(session, entry),
        })
        .collect()
}

//! Terminal front end.

use std::io::{self, Write};

use lantern_shared::time::{get_taipei_timestamp, timestamp_to_taipei_rfc3339};

use crate::domain::{LightType, Submission};

use super::{
    ClientView, Notice, NoticeLevel,
    presenter::{EMPTY_QUEUE_MESSAGE, QueueRow},
};

/// Writes the queue and notices to stdout.
#[derive(Debug, Default, Clone)]
pub struct TerminalView {
    /// Blank line between rows and an indented layout
    large_text: bool,
}

impl TerminalView {
    pub fn new(large_text: bool) -> Self {
        Self { large_text }
    }

    fn format_row(&self, row: &QueueRow) -> String {
        let marker = if row.is_current_user { " (您)" } else { "" };
        let indent = if self.large_text { "    " } else { "" };
        format!(
            "{indent}{} - {}{}  [{}|{}]",
            row.queue_label,
            row.display_name,
            marker,
            row.status_label,
            row.status_class.css_class()
        )
    }

    fn write_lines(&self, lines: &[String]) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in lines {
            // Closed stdout is not worth failing the poller over
            let _ = writeln!(out, "{line}");
            if self.large_text {
                let _ = writeln!(out);
            }
        }
        let _ = out.flush();
    }
}

impl ClientView for TerminalView {
    fn render_queue(&self, rows: &[QueueRow]) {
        if rows.is_empty() {
            self.write_lines(&[EMPTY_QUEUE_MESSAGE.to_string()]);
            return;
        }
        let updated = timestamp_to_taipei_rfc3339(get_taipei_timestamp());
        let mut lines = vec![format!("── 等待名單 (更新於 {updated}) ──")];
        lines.extend(rows.iter().map(|row| self.format_row(row)));
        self.write_lines(&lines);
    }

    fn show_application_form(&self) {
        self.write_lines(&["請重新填寫報名資料 (submit --name <姓名>)".to_string()]);
    }

    fn show_waiting_area(&self) {
        self.write_lines(&["已進入等待區，名單將自動更新".to_string()]);
    }

    fn show_submission(&self, submission: &Submission) {
        let mut lines = vec!["報名成功".to_string()];
        if let Some(n) = submission.queue_number {
            lines.push(format!("您的號碼: {n}號"));
        }
        if let Some(status) = &submission.status {
            lines.push(format!("目前狀態: {status}"));
        }
        if let Some(message) = &submission.message {
            lines.push(message.clone());
        }
        self.write_lines(&lines);
    }

    fn show_light_type(&self, light_type: &LightType) {
        let line = format!("今日燈種: {light_type} (無需選擇)");
        self.write_lines(&[line]);
    }

    fn alert(&self, notice: Notice) {
        let tag = match notice.level {
            NoticeLevel::Success => "✔",
            NoticeLevel::Info => "i",
            NoticeLevel::Warning => "!",
            NoticeLevel::Danger => "✖",
        };
        self.write_lines(&[format!("[{tag}] {}", notice.message)]);
    }
}

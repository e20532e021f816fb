//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::ValueObjectError;

/// Maximum applicant name length, in characters
pub const CLIENT_NAME_MAX_CHARS: usize = 50;

/// Applicant name value object.
///
/// The name is the only identity the sheet knows a visitor by, so it is
/// trimmed before it is stored or compared.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);

impl ClientName {
    /// Create a new ClientName.
    ///
    /// # Arguments
    ///
    /// * `name` - The applicant name as typed
    ///
    /// # Returns
    ///
    /// A Result containing the ClientName or an error if validation fails
    pub fn new(name: impl Into<String>) -> Result<Self, ValueObjectError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::ClientNameEmpty);
        }
        let len = trimmed.chars().count();
        if len > CLIENT_NAME_MAX_CHARS {
            return Err(ValueObjectError::ClientNameTooLong {
                max: CLIENT_NAME_MAX_CHARS,
                actual: len,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Convert to owned String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for ClientName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientName> for String {
    fn from(value: ClientName) -> Self {
        value.0
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Applicant status as written in the sheet's status column.
///
/// Labels the client does not know are carried through as `Unknown` rather
/// than rejected, because the admin can type anything into the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClientStatus {
    /// 審核中: waiting for an admin to review the application
    Pending,
    /// 等待中: approved and queued
    Waiting,
    /// 進入中: called, joining the meeting
    Entering,
    /// 服務中: being served
    Serving,
    /// 結束
    Completed,
    /// 未通過
    Rejected,
    Unknown(String),
}

impl ClientStatus {
    pub const PENDING_LABEL: &'static str = "審核中";
    pub const WAITING_LABEL: &'static str = "等待中";
    pub const ENTERING_LABEL: &'static str = "進入中";
    pub const SERVING_LABEL: &'static str = "服務中";
    pub const COMPLETED_LABEL: &'static str = "結束";
    pub const REJECTED_LABEL: &'static str = "未通過";

    /// Parse a sheet label. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            Self::PENDING_LABEL => Self::Pending,
            Self::WAITING_LABEL => Self::Waiting,
            Self::ENTERING_LABEL => Self::Entering,
            Self::SERVING_LABEL => Self::Serving,
            Self::COMPLETED_LABEL => Self::Completed,
            Self::REJECTED_LABEL => Self::Rejected,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Pending => Self::PENDING_LABEL,
            Self::Waiting => Self::WAITING_LABEL,
            Self::Entering => Self::ENTERING_LABEL,
            Self::Serving => Self::SERVING_LABEL,
            Self::Completed => Self::COMPLETED_LABEL,
            Self::Rejected => Self::REJECTED_LABEL,
            Self::Unknown(label) => label,
        }
    }

    /// Statuses after which the queue no longer moves for this applicant.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Rejected)
    }

    /// Statuses where the applicant is moving through the queue.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Waiting | Self::Entering | Self::Serving)
    }
}

impl From<String> for ClientStatus {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<ClientStatus> for String {
    fn from(value: ClientStatus) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Light offered today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LightType {
    /// 光明燈
    Bright,
    /// 財神燈
    Wealth,
    /// 太歲燈
    Taisui,
    Other(String),
}

impl LightType {
    pub const BRIGHT_LABEL: &'static str = "光明燈";
    pub const WEALTH_LABEL: &'static str = "財神燈";
    pub const TAISUI_LABEL: &'static str = "太歲燈";

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            Self::BRIGHT_LABEL => Self::Bright,
            Self::WEALTH_LABEL => Self::Wealth,
            Self::TAISUI_LABEL => Self::Taisui,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Bright => Self::BRIGHT_LABEL,
            Self::Wealth => Self::WEALTH_LABEL,
            Self::Taisui => Self::TAISUI_LABEL,
            Self::Other(label) => label,
        }
    }
}

impl Default for LightType {
    fn default() -> Self {
        Self::Bright
    }
}

impl From<String> for LightType {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<LightType> for String {
    fn from(value: LightType) -> Self {
        value.label().to_string()
    }
}

impl fmt::Display for LightType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_name_new_success() {
        // テスト項目: 有効な申請者名を作成できる（前後の空白は除去される）
        // given (前提条件):
        let name = "  王小明 ".to_string();

        // when (操作):
        let result = ClientName::new(name);

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(result.unwrap().as_str(), "王小明");
    }

    #[test]
    fn test_client_name_new_empty_fails() {
        // テスト項目: 空白のみの申請者名は作成できない
        // given (前提条件):
        let name = "   ".to_string();

        // when (操作):
        let result = ClientName::new(name);

        // then (期待する結果):
        assert_eq!(result.unwrap_err(), ValueObjectError::ClientNameEmpty);
    }

    #[test]
    fn test_client_name_too_long_counts_characters() {
        // テスト項目: 長さはバイト数ではなく文字数で判定される
        // given (前提条件):
        let fifty = "燈".repeat(50);
        let fifty_one = "燈".repeat(51);

        // then (期待する結果):
        assert!(ClientName::new(fifty).is_ok());
        assert_eq!(
            ClientName::new(fifty_one).unwrap_err(),
            ValueObjectError::ClientNameTooLong {
                max: 50,
                actual: 51
            }
        );
    }

    #[test]
    fn test_client_status_labels() {
        // テスト項目: シートのラベルと列挙値が相互に変換できる
        let cases = [
            ("審核中", ClientStatus::Pending),
            ("等待中", ClientStatus::Waiting),
            ("進入中", ClientStatus::Entering),
            ("服務中", ClientStatus::Serving),
            ("結束", ClientStatus::Completed),
            ("未通過", ClientStatus::Rejected),
        ];

        for (label, status) in cases {
            assert_eq!(ClientStatus::from_label(label), status);
            assert_eq!(status.label(), label);
        }
    }

    #[test]
    fn test_client_status_unknown_is_preserved() {
        // テスト項目: 未知のラベルはエラーにならず、そのまま保持される
        let status = ClientStatus::from_label("暫停");

        assert_eq!(status, ClientStatus::Unknown("暫停".to_string()));
        assert_eq!(status.label(), "暫停");
        assert!(!status.is_terminal());
        assert!(!status.is_active());
    }

    #[test]
    fn test_client_status_terminal_and_active() {
        // テスト項目: 終了状態と進行中状態の分類
        assert!(ClientStatus::Completed.is_terminal());
        assert!(ClientStatus::Rejected.is_terminal());
        assert!(!ClientStatus::Pending.is_terminal());
        assert!(ClientStatus::Waiting.is_active());
        assert!(ClientStatus::Entering.is_active());
        assert!(ClientStatus::Serving.is_active());
        assert!(!ClientStatus::Pending.is_active());
    }

    #[test]
    fn test_client_status_deserializes_from_label() {
        // テスト項目: JSON 文字列から状態を復元できる
        let status: ClientStatus = serde_json::from_str("\"等待中\"").unwrap();
        assert_eq!(status, ClientStatus::Waiting);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"等待中\"");
    }

    #[test]
    fn test_light_type_labels() {
        // テスト項目: 燈種ラベルの変換と既定値
        assert_eq!(LightType::from_label("財神燈"), LightType::Wealth);
        assert_eq!(LightType::from_label("太歲燈"), LightType::Taisui);
        assert_eq!(
            LightType::from_label("文昌燈"),
            LightType::Other("文昌燈".to_string())
        );
        assert_eq!(LightType::default().label(), "光明燈");
    }
}

//! UseCase: 名前による状態確認

use std::sync::Arc;

use crate::{
    domain::{ClientName, ClientSession, ValueObjectError},
    infrastructure::Preferences,
    ui::{ClientView, Notice},
};

use super::{QueuePoller, error::CheckStatusError};

/// Shown when the name field is empty
pub const NAME_REQUIRED_MESSAGE: &str = "請先填寫姓名以查詢狀態";

/// Shown when the name exceeds the character limit
pub fn name_too_long_message(max: usize) -> String {
    format!("姓名不可超過 {max} 個字")
}

/// 状態確認のユースケース
pub struct CheckStatusUseCase {
    poller: QueuePoller,
    preferences: Preferences,
    view: Arc<dyn ClientView>,
}

impl CheckStatusUseCase {
    pub fn new(poller: QueuePoller, preferences: Preferences, view: Arc<dyn ClientView>) -> Self {
        Self {
            poller,
            preferences,
            view,
        }
    }

    /// Track `name` from now on and start polling for it.
    pub async fn execute(&self, name: &str) -> Result<(), CheckStatusError> {
        let name = match ClientName::new(name) {
            Ok(name) => name,
            Err(e) => {
                let message = match &e {
                    ValueObjectError::ClientNameEmpty => NAME_REQUIRED_MESSAGE.to_string(),
                    ValueObjectError::ClientNameTooLong { max, .. } => name_too_long_message(*max),
                };
                self.view.alert(Notice::danger(message));
                return Err(e.into());
            }
        };

        self.preferences.remember_client_name(&name);
        self.poller.begin_session(ClientSession::new(name)).await;
        self.poller.start_status_refresh().await;
        Ok(())
    }
}

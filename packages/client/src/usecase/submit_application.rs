//! UseCase: 申請の送信
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SubmitApplicationUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 受理された申請だけがセッションになり、ポーリングが始まることを保証する
//! - 拒否・通信失敗時に状態が変わらないことを保証する
//!
//! ### どのような状況を想定しているか
//! - 正常系：受理 → 待合表示とポーリング開始
//! - 異常系：アプリケーションエラー（満員など）、通信失敗

use std::sync::Arc;

use tracing::{error, info};

use crate::{
    domain::{ApplicationForm, ClientSession, GatewayError, QueueGateway, Submission},
    ui::{ClientView, Notice},
};

use super::{QueuePoller, error::SubmitError};

/// 申請送信のユースケース
pub struct SubmitApplicationUseCase {
    gateway: Arc<dyn QueueGateway>,
    poller: QueuePoller,
    view: Arc<dyn ClientView>,
}

impl SubmitApplicationUseCase {
    /// 新しい SubmitApplicationUseCase を作成
    pub fn new(
        gateway: Arc<dyn QueueGateway>,
        poller: QueuePoller,
        view: Arc<dyn ClientView>,
    ) -> Self {
        Self {
            gateway,
            poller,
            view,
        }
    }

    /// 申請を送信
    ///
    /// # Returns
    ///
    /// * `Ok(Submission)` - 受理された（セッション開始、ポーリング開始済み）
    /// * `Err(SubmitError)` - 拒否または送信失敗（状態は変更されない）
    pub async fn execute(&self, form: ApplicationForm) -> Result<Submission, SubmitError> {
        let submission = match self.gateway.submit_application(&form).await {
            Ok(submission) => submission,
            Err(GatewayError::Application(message)) => {
                self.view.alert(Notice::danger(message.clone()));
                return Err(SubmitError::Rejected(message));
            }
            Err(e) => {
                error!("Submission failed: {}", e);
                self.view.alert(Notice::danger(format!("提交失敗: {e}")));
                return Err(SubmitError::Gateway(e));
            }
        };

        info!("Application accepted for {}", form.name);
        let session = ClientSession {
            name: form.name,
            status: submission.status.clone(),
            queue_number: submission.queue_number,
        };
        self.poller.begin_session(session).await;
        self.view.show_submission(&submission);
        self.view.show_waiting_area();
        self.poller.start_status_refresh().await;

        Ok(submission)
    }
}

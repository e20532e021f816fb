//! UseCase: 等待名單のポーリングと状態の突き合わせ
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - QueuePoller の start / stop / load_waiting_queue
//! - 状態に応じた更新間隔の切り替えとタイマーの一意性
//!
//! ### なぜこのテストが必要か
//! - タイマーが重複すると同じ名前で二重にリクエストが飛ぶ
//! - 「該当なし」と「一時的な失敗」を取り違えるとポーリングが止まらない、
//!   あるいは回線の瞬断でセッションが消える
//!
//! ### どのような状況を想定しているか
//! - 正常系：状態の更新と間隔の変更
//! - 異常系：通信失敗、アプリケーションエラー、該当なし
//! - エッジケース：取得中にセッションが変わった場合（古い応答の破棄）

use std::{
    sync::{Arc, Weak},
    time::Duration,
};

use tokio::{sync::Mutex, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    domain::{ClientSession, ClientStatus, GatewayError, QueueGateway, RetryPolicy, refresh_rate},
    ui::{ClientView, Notice, build_rows},
};

/// Warning shown when the sheet no longer knows the visitor
pub const NOT_FOUND_MESSAGE: &str = "找不到您的報名資料，請重新報名";

/// Warning shown when a poll fails in transit
pub const LOAD_FAILED_MESSAGE: &str = "載入等待名單失敗，請稍後再試";

/// Warning shown when the retry policy gives up
pub const RETRIES_EXHAUSTED_MESSAGE: &str = "連線多次失敗，已停止自動更新";

/// Result of one waiting-list fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// No session, nothing fetched
    Skipped,
    /// Record found; carries the status now held by the session
    Updated { status: Option<ClientStatus> },
    /// Authoritative absence: session cleared, polling stopped
    NotFound,
    /// Transport or decode failure; polling continues per the retry policy
    Failed { consecutive_failures: u32 },
    /// Application-level error from the endpoint
    Rejected(String),
    /// The session changed while the fetch was in flight; response dropped
    Stale,
}

struct Timer {
    handle: JoinHandle<()>,
    period: Duration,
    generation: u64,
}

#[derive(Default)]
struct PollerState {
    session: Option<ClientSession>,
    /// Bumped on every session change
    epoch: u64,
    timer: Option<Timer>,
    timer_generation: u64,
    consecutive_failures: u32,
}

struct Inner {
    gateway: Arc<dyn QueueGateway>,
    view: Arc<dyn ClientView>,
    retry_policy: RetryPolicy,
    state: Mutex<PollerState>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(timer) = self.state.get_mut().timer.take() {
            timer.handle.abort();
        }
    }
}

enum Plan {
    Continue(Duration),
    Stop(Option<Notice>),
}

/// Owner of the current session and of the single refresh timer.
///
/// Cloning is cheap and every clone drives the same poller. The timer task
/// only holds a weak reference; dropping the last clone stops polling.
#[derive(Clone)]
pub struct QueuePoller {
    inner: Arc<Inner>,
}

impl QueuePoller {
    /// 新しい QueuePoller を作成（失敗時は次の周期で再試行）
    pub fn new(gateway: Arc<dyn QueueGateway>, view: Arc<dyn ClientView>) -> Self {
        Self::with_retry_policy(gateway, view, RetryPolicy::next_tick())
    }

    pub fn with_retry_policy(
        gateway: Arc<dyn QueueGateway>,
        view: Arc<dyn ClientView>,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                gateway,
                view,
                retry_policy,
                state: Mutex::new(PollerState::default()),
            }),
        }
    }

    pub async fn session(&self) -> Option<ClientSession> {
        self.inner.state.lock().await.session.clone()
    }

    /// Replace the tracked visitor. Responses for the previous one are
    /// discarded from now on.
    pub async fn begin_session(&self, session: ClientSession) {
        let mut state = self.inner.state.lock().await;
        info!("Tracking queue status of {}", session.name);
        state.session = Some(session);
        state.epoch += 1;
        state.consecutive_failures = 0;
    }

    /// Stop polling and forget the visitor.
    pub async fn end_session(&self) {
        let mut state = self.inner.state.lock().await;
        Self::cancel_timer(&mut state);
        if state.session.take().is_some() {
            state.epoch += 1;
        }
    }

    /// Current interval for the tracked session.
    pub async fn refresh_rate(&self) -> Duration {
        let state = self.inner.state.lock().await;
        refresh_rate(state.session.as_ref())
    }

    pub async fn is_polling(&self) -> bool {
        self.inner.state.lock().await.timer.is_some()
    }

    /// Regular interval of the installed timer, if any.
    pub async fn timer_period(&self) -> Option<Duration> {
        self.inner
            .state
            .lock()
            .await
            .timer
            .as_ref()
            .map(|t| t.period)
    }

    /// Fetch now, then keep fetching at the session's cadence.
    ///
    /// Any previous timer is cancelled first, so repeated calls leave exactly
    /// one timer. No timer is installed for a terminal (or absent) session.
    pub async fn start_status_refresh(&self) {
        {
            let mut state = self.inner.state.lock().await;
            Self::cancel_timer(&mut state);
        }

        let outcome = self.load_waiting_queue().await;

        let notice = {
            let mut state = self.inner.state.lock().await;
            match self.plan(&state, &outcome) {
                Plan::Continue(first_delay) => {
                    let period = refresh_rate(state.session.as_ref());
                    self.install_timer(&mut state, period, first_delay);
                    None
                }
                Plan::Stop(notice) => {
                    Self::cancel_timer(&mut state);
                    notice
                }
            }
        };
        if let Some(notice) = notice {
            self.inner.view.alert(notice);
        }
    }

    /// Cancel the timer. No-op when none is installed.
    pub async fn stop_status_refresh(&self) {
        let mut state = self.inner.state.lock().await;
        Self::cancel_timer(&mut state);
    }

    /// Fetch the waiting list for the current session and reconcile.
    ///
    /// Never returns an error: failures are shown to the user and reported
    /// through the outcome.
    pub async fn load_waiting_queue(&self) -> PollOutcome {
        let (name, epoch) = {
            let state = self.inner.state.lock().await;
            match &state.session {
                Some(session) => (session.name.clone(), state.epoch),
                None => return PollOutcome::Skipped,
            }
        };

        let result = self.inner.gateway.get_waiting_list(&name).await;

        let mut state = self.inner.state.lock().await;
        if state.epoch != epoch {
            debug!(
                "Discarding waiting list fetched for previous session {}",
                name
            );
            return PollOutcome::Stale;
        }

        match result {
            Ok(list) => {
                state.consecutive_failures = 0;
                let Some(record) = list.client else {
                    let rows = build_rows(&list.entries, state.session.as_ref());
                    Self::cancel_timer(&mut state);
                    state.session = None;
                    state.epoch += 1;
                    drop(state);

                    info!("No record for {}, session cleared", name);
                    let view = &self.inner.view;
                    view.render_queue(&rows);
                    view.show_application_form();
                    view.alert(Notice::warning(NOT_FOUND_MESSAGE));
                    return PollOutcome::NotFound;
                };

                let previous = state.session.as_ref().and_then(|s| s.status.clone());
                if let Some(session) = state.session.as_mut() {
                    session.apply(&record);
                }
                let status = state.session.as_ref().and_then(|s| s.status.clone());
                if previous != status {
                    debug!("Status of {} changed: {:?} -> {:?}", name, previous, status);
                }
                let rows = build_rows(&list.entries, state.session.as_ref());
                self.adjust_refresh_rate(&mut state);
                drop(state);

                self.inner.view.render_queue(&rows);
                PollOutcome::Updated { status }
            }
            Err(GatewayError::Application(message)) => {
                drop(state);
                warn!("Waiting list rejected for {}: {}", name, message);
                self.inner.view.alert(Notice::danger(message.clone()));
                PollOutcome::Rejected(message)
            }
            Err(e) => {
                state.consecutive_failures += 1;
                let consecutive_failures = state.consecutive_failures;
                drop(state);

                warn!(
                    "Failed to load waiting list ({} in a row): {}",
                    consecutive_failures, e
                );
                self.inner.view.render_queue(&[]);
                self.inner.view.alert(Notice::warning(LOAD_FAILED_MESSAGE));
                PollOutcome::Failed {
                    consecutive_failures,
                }
            }
        }
    }

    /// Re-derive the cadence after a status change.
    ///
    /// Only reschedules an installed timer, and without an extra fetch.
    fn adjust_refresh_rate(&self, state: &mut PollerState) {
        let Some(period) = state.timer.as_ref().map(|t| t.period) else {
            return;
        };
        let Some(session) = state.session.as_ref() else {
            Self::cancel_timer(state);
            return;
        };
        if session.is_terminal() {
            info!("{} reached a final status, polling stopped", session.name);
            Self::cancel_timer(state);
            return;
        }

        let rate = refresh_rate(Some(session));
        if rate != period {
            debug!("Refresh interval {:?} -> {:?}", period, rate);
            self.install_timer(state, rate, rate);
        }
    }

    fn plan(&self, state: &PollerState, outcome: &PollOutcome) -> Plan {
        let Some(session) = &state.session else {
            return Plan::Stop(None);
        };
        if session.is_terminal() {
            return Plan::Stop(None);
        }
        let rate = refresh_rate(Some(session));
        match outcome {
            PollOutcome::Failed {
                consecutive_failures,
            } => match self.inner.retry_policy.next_delay(*consecutive_failures, rate) {
                Some(delay) => Plan::Continue(delay),
                None => {
                    warn!(
                        "Giving up after {} consecutive failures",
                        consecutive_failures
                    );
                    Plan::Stop(Some(Notice::warning(RETRIES_EXHAUSTED_MESSAGE)))
                }
            },
            _ => Plan::Continue(rate),
        }
    }

    /// Called by the timer task after each fetch. `None` ends the task.
    async fn next_delay(&self, generation: u64, outcome: &PollOutcome) -> Option<Duration> {
        let notice = {
            let mut state = self.inner.state.lock().await;
            if !Self::owns_timer(&state, generation) {
                return None;
            }
            match self.plan(&state, outcome) {
                Plan::Continue(delay) => return Some(delay),
                Plan::Stop(notice) => {
                    Self::cancel_timer(&mut state);
                    notice
                }
            }
        };
        if let Some(notice) = notice {
            self.inner.view.alert(notice);
        }
        None
    }

    fn owns_timer(state: &PollerState, generation: u64) -> bool {
        state
            .timer
            .as_ref()
            .is_some_and(|t| t.generation == generation)
    }

    fn install_timer(&self, state: &mut PollerState, period: Duration, first_delay: Duration) {
        Self::cancel_timer(state);
        state.timer_generation += 1;
        let generation = state.timer_generation;
        let handle = tokio::spawn(run_timer(
            Arc::downgrade(&self.inner),
            generation,
            first_delay,
        ));
        debug!("Refresh timer #{} every {:?}", generation, period);
        state.timer = Some(Timer {
            handle,
            period,
            generation,
        });
    }

    fn cancel_timer(state: &mut PollerState) {
        if let Some(timer) = state.timer.take() {
            debug!("Refresh timer #{} cancelled", timer.generation);
            timer.handle.abort();
        }
    }
}

async fn run_timer(inner: Weak<Inner>, generation: u64, first_delay: Duration) {
    let mut delay = first_delay;
    loop {
        tokio::time::sleep(delay).await;

        let Some(inner) = inner.upgrade() else {
            break;
        };
        let poller = QueuePoller { inner };
        {
            let state = poller.inner.state.lock().await;
            if !QueuePoller::owns_timer(&state, generation) {
                break;
            }
        }

        let outcome = poller.load_waiting_queue().await;
        match poller.next_delay(generation, &outcome).await {
            Some(next) => delay = next,
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{
            ApplicationForm, ClientName, ClientRecord, QueueEntry, Settings, Submission,
            WaitingList,
        },
        ui::{
            NoticeLevel,
            recording::{RecordingView, ViewEvent},
        },
    };
    use async_trait::async_trait;
    use std::{
        collections::VecDeque,
        sync::{
            Mutex as StdMutex,
            atomic::{AtomicUsize, Ordering},
        },
    };
    use tokio::sync::Notify;

    /// Gateway answering waiting-list calls from a script.
    ///
    /// When the script runs out, the last answer repeats.
    struct ScriptedGateway {
        script: StdMutex<VecDeque<Result<WaitingList, GatewayError>>>,
        last: StdMutex<Result<WaitingList, GatewayError>>,
        calls: AtomicUsize,
        names: StdMutex<Vec<String>>,
        gate: Option<Arc<Notify>>,
    }

    impl ScriptedGateway {
        fn new(script: Vec<Result<WaitingList, GatewayError>>) -> Self {
            Self {
                script: StdMutex::new(script.into()),
                last: StdMutex::new(Ok(WaitingList::default())),
                calls: AtomicUsize::new(0),
                names: StdMutex::new(Vec::new()),
                gate: None,
            }
        }

        fn always(response: Result<WaitingList, GatewayError>) -> Self {
            Self::new(vec![response])
        }

        fn gated(mut self, gate: Arc<Notify>) -> Self {
            self.gate = Some(gate);
            self
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QueueGateway for ScriptedGateway {
        async fn submit_application(
            &self,
            _form: &ApplicationForm,
        ) -> Result<Submission, GatewayError> {
            unreachable!("not used by the poller")
        }

        async fn get_waiting_list(
            &self,
            client_name: &ClientName,
        ) -> Result<WaitingList, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.names
                .lock()
                .unwrap()
                .push(client_name.as_str().to_string());
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(response) => {
                    *self.last.lock().unwrap() = response.clone();
                    response
                }
                None => self.last.lock().unwrap().clone(),
            }
        }

        async fn get_meeting_settings(&self) -> Result<Settings, GatewayError> {
            unreachable!("not used by the poller")
        }
    }

    fn found(status: &str) -> Result<WaitingList, GatewayError> {
        Ok(WaitingList {
            client: Some(ClientRecord {
                status: Some(ClientStatus::from_label(status)),
                queue_number: Some(3),
            }),
            entries: vec![
                QueueEntry {
                    queue_number: Some(1),
                    display_name: Some("陳○華".to_string()),
                    status: Some(ClientStatus::Serving),
                },
                QueueEntry {
                    queue_number: Some(3),
                    display_name: Some("王○明".to_string()),
                    status: Some(ClientStatus::from_label(status)),
                },
            ],
        })
    }

    fn not_found() -> Result<WaitingList, GatewayError> {
        Ok(WaitingList {
            client: None,
            entries: Vec::new(),
        })
    }

    fn transport_error() -> Result<WaitingList, GatewayError> {
        Err(GatewayError::Transport("connection refused".to_string()))
    }

    fn session() -> ClientSession {
        ClientSession::new(ClientName::new("王小明").unwrap())
    }

    fn create_poller(
        gateway: ScriptedGateway,
        policy: RetryPolicy,
    ) -> (QueuePoller, Arc<ScriptedGateway>, Arc<RecordingView>) {
        let gateway = Arc::new(gateway);
        let view = Arc::new(RecordingView::new());
        let poller = QueuePoller::with_retry_policy(gateway.clone(), view.clone(), policy);
        (poller, gateway, view)
    }

    /// Let spawned tasks run without moving the paused clock.
    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_load_without_session_is_noop() {
        // テスト項目: セッションがなければ何も取得しない
        // given (前提条件):
        let (poller, gateway, view) = create_poller(
            ScriptedGateway::always(found("等待中")),
            RetryPolicy::default(),
        );

        // when (操作):
        let outcome = poller.load_waiting_queue().await;

        // then (期待する結果):
        assert_eq!(outcome, PollOutcome::Skipped);
        assert_eq!(gateway.calls(), 0);
        assert!(view.events().is_empty());
    }

    #[tokio::test]
    async fn test_load_updates_status_and_renders_rows() {
        // テスト項目: 取得した状態でセッションが更新され、本人の行が強調される
        // given (前提条件):
        let (poller, gateway, view) = create_poller(
            ScriptedGateway::always(found("等待中")),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;

        // when (操作):
        let outcome = poller.load_waiting_queue().await;

        // then (期待する結果):
        assert_eq!(
            outcome,
            PollOutcome::Updated {
                status: Some(ClientStatus::Waiting)
            }
        );
        assert_eq!(gateway.names.lock().unwrap().as_slice(), ["王小明"]);
        let current = poller.session().await.unwrap();
        assert_eq!(current.status, Some(ClientStatus::Waiting));
        assert_eq!(current.queue_number, Some(3));
        assert_eq!(poller.refresh_rate().await, Duration::from_millis(5_000));

        let rows = view.last_queue().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(!rows[0].is_current_user);
        assert!(rows[1].is_current_user);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_found_clears_session_and_stops_polling() {
        // テスト項目: 該当なしの応答でセッションが消え、以後のポーリングが起きない
        // given (前提条件):
        let (poller, gateway, view) = create_poller(
            ScriptedGateway::new(vec![found("等待中"), not_found(), found("等待中")]),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        poller.start_status_refresh().await;
        assert!(poller.is_polling().await);

        // when (操作): 5 秒後の定期取得で「該当なし」
        tokio::time::sleep(Duration::from_millis(5_001)).await;

        // then (期待する結果):
        assert_eq!(gateway.calls(), 2);
        assert!(poller.session().await.is_none());
        assert!(!poller.is_polling().await);
        assert_eq!(view.count(|e| *e == ViewEvent::ApplicationForm), 1);
        assert!(
            view.alerts()
                .contains(&Notice::warning(NOT_FOUND_MESSAGE))
        );

        // 以後タイマーは発火しない
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_twice_leaves_single_timer() {
        // テスト項目: start を 2 回呼んでもタイマーは 1 つだけ
        // given (前提条件):
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::always(found("等待中")),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;

        // when (操作):
        poller.start_status_refresh().await;
        poller.start_status_refresh().await;

        // then (期待する結果): 即時取得 2 回の後は 5 秒ごとに 1 回ずつ
        assert_eq!(gateway.calls(), 2);
        tokio::time::sleep(Duration::from_millis(5_001)).await;
        assert_eq!(gateway.calls(), 3);
        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(gateway.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_polls_every_fifteen_seconds() {
        // テスト項目: 審核中は 15 秒間隔で取得する
        // given (前提条件):
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::always(found("審核中")),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;

        // when (操作):
        poller.start_status_refresh().await;

        // then (期待する結果):
        assert_eq!(
            poller.timer_period().await,
            Some(Duration::from_millis(15_000))
        );
        tokio::time::sleep(Duration::from_millis(14_000)).await;
        assert_eq!(gateway.calls(), 1);
        tokio::time::sleep(Duration::from_millis(1_001)).await;
        assert_eq!(gateway.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_change_swaps_interval_without_extra_fetch() {
        // テスト項目: 審核中 → 等待中 で間隔が 15 秒から 5 秒に切り替わる
        // given (前提条件):
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::new(vec![found("審核中"), found("等待中")]),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        poller.start_status_refresh().await;
        assert_eq!(
            poller.timer_period().await,
            Some(Duration::from_millis(15_000))
        );

        // when (操作): 15 秒後の取得で等待中になる
        tokio::time::sleep(Duration::from_millis(15_001)).await;
        settle().await;

        // then (期待する結果): 追加の即時取得はなく、次は 5 秒後
        assert_eq!(gateway.calls(), 2);
        assert_eq!(
            poller.timer_period().await,
            Some(Duration::from_millis(5_000))
        );
        tokio::time::sleep(Duration::from_millis(5_001)).await;
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_status_installs_no_timer() {
        // テスト項目: 結束の状態では定期取得を行わない
        // given (前提条件):
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::always(found("結束")),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;

        // when (操作):
        poller.start_status_refresh().await;

        // then (期待する結果):
        assert_eq!(gateway.calls(), 1);
        assert!(!poller.is_polling().await);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaching_terminal_status_stops_timer() {
        // テスト項目: 定期取得中に未通過になるとタイマーが止まる
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::new(vec![found("等待中"), found("未通過")]),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        poller.start_status_refresh().await;

        tokio::time::sleep(Duration::from_millis(5_001)).await;
        settle().await;

        assert_eq!(gateway.calls(), 2);
        assert!(!poller.is_polling().await);
        assert_eq!(
            poller.session().await.unwrap().status,
            Some(ClientStatus::Rejected)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_keeps_polling_then_recovers() {
        // テスト項目: 通信失敗ではポーリングが止まらず、次の周期で回復する
        // given (前提条件):
        let (poller, gateway, view) = create_poller(
            ScriptedGateway::new(vec![found("等待中"), transport_error(), found("服務中")]),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        poller.start_status_refresh().await;

        // when (操作): 1 回目の定期取得は失敗
        tokio::time::sleep(Duration::from_millis(5_001)).await;

        // then (期待する結果): 表示は空になり警告が出るが、セッションは残る
        assert_eq!(gateway.calls(), 2);
        assert_eq!(view.last_queue(), Some(Vec::new()));
        let warning = view.alerts().pop().unwrap();
        assert_eq!(warning.level, NoticeLevel::Warning);
        assert_eq!(warning.message, LOAD_FAILED_MESSAGE);
        assert!(poller.session().await.is_some());
        assert!(poller.is_polling().await);

        // 次の周期で回復
        tokio::time::sleep(Duration::from_millis(5_000)).await;
        assert_eq!(gateway.calls(), 3);
        assert_eq!(
            poller.session().await.unwrap().status,
            Some(ClientStatus::Serving)
        );
        assert_eq!(view.last_queue().unwrap().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_delay_is_decoupled_from_interval() {
        // テスト項目: 再試行の遅延は通常の間隔とは独立して適用される
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::new(vec![transport_error(), found("等待中")]),
            RetryPolicy::next_tick().with_retry_delay(Duration::from_millis(1_000)),
        );
        poller.begin_session(session()).await;

        // 即時取得が失敗 → 1 秒後に再試行
        poller.start_status_refresh().await;
        assert_eq!(gateway.calls(), 1);
        tokio::time::sleep(Duration::from_millis(1_001)).await;
        assert_eq!(gateway.calls(), 2);

        // 回復後は通常の 5 秒間隔
        tokio::time::sleep(Duration::from_millis(4_000)).await;
        assert_eq!(gateway.calls(), 2);
        tokio::time::sleep(Duration::from_millis(1_001)).await;
        assert_eq!(gateway.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_retry_policy_stops_polling() {
        // テスト項目: 連続失敗が上限に達するとポーリングを止めて通知する
        // given (前提条件):
        let (poller, gateway, view) = create_poller(
            ScriptedGateway::always(transport_error()),
            RetryPolicy::next_tick().with_max_consecutive_failures(3),
        );
        poller.begin_session(session()).await;

        // when (操作):
        poller.start_status_refresh().await;
        tokio::time::sleep(Duration::from_secs(60)).await;

        // then (期待する結果): 3 回で打ち切り、セッションは残る
        assert_eq!(gateway.calls(), 3);
        assert!(!poller.is_polling().await);
        assert!(poller.session().await.is_some());
        assert!(
            view.alerts()
                .contains(&Notice::warning(RETRIES_EXHAUSTED_MESSAGE))
        );
    }

    #[tokio::test]
    async fn test_application_error_does_not_mutate_state() {
        // テスト項目: アプリケーションエラーは警告のみで状態を変えない
        let (poller, _gateway, view) = create_poller(
            ScriptedGateway::always(Err(GatewayError::Application("系統維護中".to_string()))),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;

        let outcome = poller.load_waiting_queue().await;

        assert_eq!(outcome, PollOutcome::Rejected("系統維護中".to_string()));
        assert_eq!(poller.session().await, Some(session()));
        assert_eq!(view.alerts(), vec![Notice::danger("系統維護中")]);
        assert!(view.last_queue().is_none());
    }

    #[tokio::test]
    async fn test_stop_without_timer_is_noop() {
        // テスト項目: タイマーがなくても stop はエラーにならない
        let (poller, _gateway, _view) = create_poller(
            ScriptedGateway::always(not_found()),
            RetryPolicy::default(),
        );

        poller.stop_status_refresh().await;
        poller.stop_status_refresh().await;

        assert!(!poller.is_polling().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_timer() {
        // テスト項目: stop 後は定期取得が起きない
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::always(found("等待中")),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        poller.start_status_refresh().await;

        poller.stop_status_refresh().await;
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(gateway.calls(), 1);
        assert!(poller.session().await.is_some());
    }

    #[tokio::test]
    async fn test_response_after_session_cleared_is_discarded() {
        // テスト項目: 取得中にセッションが消えた場合、遅れて届いた応答は反映されない
        // given (前提条件):
        let gate = Arc::new(Notify::new());
        let (poller, gateway, view) = create_poller(
            ScriptedGateway::always(found("等待中")).gated(gate.clone()),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        let in_flight = tokio::spawn({
            let poller = poller.clone();
            async move { poller.load_waiting_queue().await }
        });
        while gateway.calls() == 0 {
            tokio::task::yield_now().await;
        }

        // when (操作): 応答が届く前にセッションを終了
        poller.end_session().await;
        gate.notify_one();
        let outcome = in_flight.await.unwrap();

        // then (期待する結果):
        assert_eq!(outcome, PollOutcome::Stale);
        assert!(poller.session().await.is_none());
        assert!(view.events().is_empty());
    }

    #[tokio::test]
    async fn test_response_for_previous_name_is_discarded() {
        // テスト項目: 別の名前に切り替えた後、前の名前の応答で上書きされない
        let gate = Arc::new(Notify::new());
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::always(found("服務中")).gated(gate.clone()),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        let in_flight = tokio::spawn({
            let poller = poller.clone();
            async move { poller.load_waiting_queue().await }
        });
        while gateway.calls() == 0 {
            tokio::task::yield_now().await;
        }

        let other = ClientSession::new(ClientName::new("李大華").unwrap());
        poller.begin_session(other.clone()).await;
        gate.notify_one();

        assert_eq!(in_flight.await.unwrap(), PollOutcome::Stale);
        assert_eq!(poller.session().await, Some(other));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_poller_stops_timer() {
        // テスト項目: QueuePoller を破棄するとタイマーも止まる
        let (poller, gateway, _view) = create_poller(
            ScriptedGateway::always(found("等待中")),
            RetryPolicy::default(),
        );
        poller.begin_session(session()).await;
        poller.start_status_refresh().await;

        drop(poller);
        tokio::time::sleep(Duration::from_secs(30)).await;

        assert_eq!(gateway.calls(), 1);
    }
}

//! Polling cadence and retry rules.

use std::time::Duration;

use super::entity::ClientSession;
use super::value_object::ClientStatus;

/// Cadence while nothing is known, and for statuses without a rule
pub const BASELINE_REFRESH: Duration = Duration::from_millis(10_000);

/// Cadence while an admin has not reviewed the application yet
pub const PENDING_REFRESH: Duration = Duration::from_millis(15_000);

/// Cadence while the queue is moving for this visitor
pub const ACTIVE_REFRESH: Duration = Duration::from_millis(5_000);

/// Interval until the next waiting-list fetch.
///
/// Total over every session state: no session, no status yet, each known
/// status and any unknown label all map to one of the three cadences.
pub fn refresh_rate(session: Option<&ClientSession>) -> Duration {
    match session.and_then(|s| s.status.as_ref()) {
        Some(ClientStatus::Pending) => PENDING_REFRESH,
        Some(status) if status.is_active() => ACTIVE_REFRESH,
        _ => BASELINE_REFRESH,
    }
}

/// What the poller does after a transient fetch failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetryPolicy {
    /// Delay before the next attempt; `None` waits for the regular interval
    pub retry_delay: Option<Duration>,
    /// Consecutive failures tolerated before polling stops; `None` never stops
    pub max_consecutive_failures: Option<u32>,
}

impl RetryPolicy {
    /// Keep retrying on the regular schedule forever
    pub fn next_tick() -> Self {
        Self::default()
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn with_max_consecutive_failures(mut self, max: u32) -> Self {
        self.max_consecutive_failures = Some(max);
        self
    }

    /// Delay before the next attempt after `consecutive_failures` failures in
    /// a row, or `None` once the policy gives up.
    pub fn next_delay(&self, consecutive_failures: u32, interval: Duration) -> Option<Duration> {
        if let Some(max) = self.max_consecutive_failures
            && consecutive_failures >= max
        {
            return None;
        }
        Some(self.retry_delay.unwrap_or(interval))
    }
}

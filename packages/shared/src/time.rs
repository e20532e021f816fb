//! Time helpers.
//!
//! The temple runs on Taiwan time (UTC+8), so display timestamps are rendered
//! in that offset. Expiry arithmetic only ever uses epoch milliseconds from a
//! [`Clock`].

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{FixedOffset, Offset, TimeZone, Utc};

const TAIPEI_OFFSET_SECS: i32 = 8 * 3600;

fn taipei_offset() -> FixedOffset {
    FixedOffset::east_opt(TAIPEI_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// Get current Unix timestamp (milliseconds).
pub fn get_taipei_timestamp() -> i64 {
    Utc::now().with_timezone(&taipei_offset()).timestamp_millis()
}

/// Format a Unix timestamp (milliseconds) as RFC 3339 in Taipei time.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_taipei_rfc3339(timestamp_millis: i64) -> String {
    let utc = Utc
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_default();
    utc.with_timezone(&taipei_offset()).to_rfc3339()
}

/// Source of "now" in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        get_taipei_timestamp()
    }
}

/// Clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(start_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(start_millis),
        }
    }

    pub fn set(&self, millis: i64) {
        self.now.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: i64) {
        self.now.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

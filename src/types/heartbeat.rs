//! Heartbeat record extracted from the monitored service's log output

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The latest heartbeat seen in the lookback window.
///
/// Absence of a heartbeat is modelled as `Option::None` by callers, never as
/// a record with zero clients: the two classify differently.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeartbeatRecord {
    /// When the service emitted the heartbeat (sub-second precision)
    pub timestamp: NaiveDateTime,
    /// Connected clients reported by the heartbeat
    pub client_count: u32,
}

impl HeartbeatRecord {
    pub const fn new(timestamp: NaiveDateTime, client_count: u32) -> Self {
        Self {
            timestamp,
            client_count,
        }
    }

    /// Minutes elapsed between the heartbeat and `now`.
    ///
    /// Negative when the heartbeat is stamped in the future (clock skew).
    pub fn age_minutes(&self, now: NaiveDateTime) -> f64 {
        let delta = now - self.timestamp;
        match delta.num_microseconds() {
            Some(us) => us as f64 / 60_000_000.0,
            None => delta.num_milliseconds() as f64 / 60_000.0,
        }
    }
}

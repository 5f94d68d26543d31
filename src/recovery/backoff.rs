//! Restart cooldown backed by the persisted restart record

use chrono::{NaiveDateTime, TimeDelta};
use tracing::warn;

use crate::storage::{RestartRecordStore, StoreError};

/// Rate limiter that keeps a crash-looping service from being restarted on
/// every check.
///
/// Fail-open: a missing, unreadable or malformed record permits the restart.
#[derive(Debug, Clone)]
pub struct RestartBackoff {
    store: RestartRecordStore,
    cooldown: TimeDelta,
}

impl RestartBackoff {
    pub const fn new(store: RestartRecordStore, cooldown: TimeDelta) -> Self {
        Self { store, cooldown }
    }

    pub const fn cooldown(&self) -> TimeDelta {
        self.cooldown
    }

    /// Check if a restart may be attempted at `now`.
    ///
    /// Returns true if:
    /// - No restart was ever recorded
    /// - The record cannot be read or parsed
    /// - Strictly more than the cooldown has elapsed since the recorded restart
    pub fn can_restart(&self, now: NaiveDateTime) -> bool {
        match self.store.load() {
            Ok(None) => true,
            Ok(Some(last)) => now.signed_duration_since(last) > self.cooldown,
            Err(e) => {
                warn!(error = %e, "Ignoring unusable restart record, restart permitted");
                true
            }
        }
    }

    /// Time left before the next restart is permitted, if any.
    pub fn remaining(&self, now: NaiveDateTime) -> Option<TimeDelta> {
        let last = self.store.load().ok().flatten()?;
        let elapsed = now.signed_duration_since(last);
        (elapsed <= self.cooldown).then(|| self.cooldown - elapsed)
    }

    /// Record a successful restart at `now`, overwriting the previous one.
    pub fn record_restart(&self, now: NaiveDateTime) -> Result<(), StoreError> {
        self.store.store(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::{tempdir, TempDir};

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn backoff(minutes: i64) -> (TempDir, RestartBackoff) {
        let dir = tempdir().unwrap();
        let store = RestartRecordStore::new(dir.path().join("last_restart.timestamp"));
        (dir, RestartBackoff::new(store, TimeDelta::minutes(minutes)))
    }

    #[test]
    fn allows_first_restart() {
        let (_dir, backoff) = backoff(100);
        assert_eq!(backoff.cooldown(), TimeDelta::minutes(100));
        assert!(backoff.can_restart(at(15, 0)));
        assert!(backoff.remaining(at(15, 0)).is_none());
    }

    #[test]
    fn suppresses_restart_within_cooldown() {
        let (_dir, backoff) = backoff(100);
        backoff.record_restart(at(14, 50)).unwrap();
        assert!(!backoff.can_restart(at(15, 0)));
        assert_eq!(backoff.remaining(at(15, 0)), Some(TimeDelta::minutes(90)));
    }

    #[test]
    fn boundary_equal_to_cooldown_is_blocked() {
        let (_dir, backoff) = backoff(100);
        backoff.record_restart(at(13, 0)).unwrap();
        assert!(!backoff.can_restart(at(14, 40)));
        assert!(backoff.can_restart(at(14, 41)));
    }

    #[test]
    fn malformed_record_fails_open() {
        let (dir, backoff) = backoff(100);
        std::fs::write(dir.path().join("last_restart.timestamp"), "yesterday-ish").unwrap();
        assert!(backoff.can_restart(at(15, 0)));
    }

    #[test]
    fn zero_cooldown_allows_any_later_restart() {
        let (_dir, backoff) = backoff(0);
        backoff.record_restart(at(15, 0)).unwrap();
        assert!(!backoff.can_restart(at(15, 0)));
        assert!(backoff.can_restart(at(15, 1)));
    }

    #[test]
    fn record_in_the_future_blocks() {
        // Clock stepped backwards after a restart
        let (_dir, backoff) = backoff(100);
        backoff.record_restart(at(16, 0)).unwrap();
        assert!(!backoff.can_restart(at(15, 0)));
    }
}

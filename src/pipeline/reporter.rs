//! Status reporter

use chrono::NaiveDateTime;
use tracing::{debug, error};

use crate::storage::StatusStore;
use crate::types::{StatusSnapshot, StatusTag};

/// Final stage of a pass: overwrites the status snapshot.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    store: StatusStore,
}

impl StatusReporter {
    pub const fn new(store: StatusStore) -> Self {
        Self { store }
    }

    /// Persist the snapshot for this pass and return it.
    ///
    /// A failed write is logged and otherwise ignored.
    pub fn report(
        &self,
        status: StatusTag,
        age_minutes: Option<f64>,
        clients: Option<u32>,
        now: NaiveDateTime,
    ) -> StatusSnapshot {
        let snapshot = StatusSnapshot::new(status, now, age_minutes, clients);
        match self.store.save(&snapshot) {
            Ok(()) => debug!(status = %status, path = %self.store.path().display(), "Status written"),
            Err(e) => error!(status = %status, error = %e, "Failed to write status snapshot"),
        }
        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(15, 5, 0)
            .unwrap()
    }

    #[test]
    fn report_overwrites_snapshot() {
        let dir = tempdir().unwrap();
        let store = StatusStore::new(dir.path().join("status.json"));
        let reporter = StatusReporter::new(store.clone());

        reporter.report(StatusTag::Warning, Some(5.0), Some(1), now());
        let written = reporter.report(StatusTag::Restarted, None, None, now());

        assert_eq!(store.load().unwrap(), Some(written));
    }

    #[test]
    fn write_failure_is_swallowed() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let reporter = StatusReporter::new(StatusStore::new(blocker.join("status.json")));

        let snapshot = reporter.report(StatusTag::Ok, Some(1.0), Some(3), now());
        assert_eq!(snapshot.status, StatusTag::Ok);
    }
}

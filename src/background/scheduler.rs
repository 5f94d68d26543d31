//! Check scheduler: periodic watchdog passes inside one long-lived process
//!
//! Replaces an external periodic trigger. Passes never overlap: the next
//! tick is only awaited once the previous pass has returned, and missed
//! ticks are delayed rather than burst.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::pipeline::{CheckReport, Watchdog};
use crate::storage::{LockError, ProcessLock};
use crate::types::time::local_now;

/// Run one pass, holding the invocation lock if `lock_dir` is set.
///
/// Returns `None` when another pass holds the lock; the pass is skipped
/// and no store is touched.
pub async fn run_pass(watchdog: &Watchdog, lock_dir: Option<&PathBuf>) -> Option<CheckReport> {
    let _lock = match lock_dir.map(ProcessLock::acquire).transpose() {
        Ok(lock) => lock,
        Err(e @ (LockError::Held { .. } | LockError::Unverified { .. })) => {
            warn!(service = watchdog.service(), "{e}, skipping this pass");
            return None;
        }
        Err(e) => {
            warn!(service = watchdog.service(), error = %e, "Could not take lock, running unlocked");
            None
        }
    };
    Some(watchdog.run_once(local_now()).await)
}

/// Periodic pass loop.
pub struct CheckScheduler {
    watchdog: Arc<Watchdog>,
    interval: Duration,
    lock_dir: Option<PathBuf>,
}

impl CheckScheduler {
    pub fn new(watchdog: Arc<Watchdog>, interval: Duration, lock_dir: Option<PathBuf>) -> Self {
        Self {
            watchdog,
            interval,
            lock_dir,
        }
    }

    /// Run passes until `cancel` fires. The first pass runs immediately.
    ///
    /// Returns the number of completed passes.
    pub async fn run(self, cancel: CancellationToken) -> u64 {
        info!(
            service = self.watchdog.service(),
            interval_secs = self.interval.as_secs(),
            "Check scheduler started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut passes = 0u64;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    info!(passes, "Check scheduler stopping");
                    return passes;
                }
                _ = interval.tick() => {
                    if let Some(report) = run_pass(&self.watchdog, self.lock_dir.as_ref()).await {
                        passes += 1;
                        debug!(passes, status = %report.snapshot.status, "Pass complete");
                    }
                }
            }
        }
    }
}

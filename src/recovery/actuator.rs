//! Recovery actuator

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use super::RestartBackoff;
use crate::control::ServiceControl;
use crate::types::RecoveryOutcome;

/// Restarts the service when the backoff allows it.
pub struct RecoveryActuator {
    backoff: RestartBackoff,
    control: Arc<dyn ServiceControl>,
    service: String,
    restart_timeout: Duration,
}

impl RecoveryActuator {
    pub fn new(
        backoff: RestartBackoff,
        control: Arc<dyn ServiceControl>,
        service: impl Into<String>,
        restart_timeout: Duration,
    ) -> Self {
        Self {
            backoff,
            control,
            service: service.into(),
            restart_timeout,
        }
    }

    pub const fn backoff(&self) -> &RestartBackoff {
        &self.backoff
    }

    /// Attempt one restart.
    ///
    /// - cooldown active → `SkippedBackoff`, service control never contacted
    /// - restart error or timeout → `RestartFailed`, nothing recorded
    /// - restart ok → `Restarted`; a failure to record it is logged only
    pub async fn attempt_recovery(&self, now: NaiveDateTime) -> RecoveryOutcome {
        if !self.backoff.can_restart(now) {
            let remaining_minutes = self
                .backoff
                .remaining(now)
                .map_or(0, |left| left.num_minutes());
            warn!(
                service = %self.service,
                remaining_minutes,
                cooldown_minutes = self.backoff.cooldown().num_minutes(),
                "Restart cooldown active, skipping restart"
            );
            return RecoveryOutcome::SkippedBackoff;
        }

        let control = self.control.control_name();
        info!(service = %self.service, control, "Restarting service");

        let restart = self.control.restart(&self.service);
        match tokio::time::timeout(self.restart_timeout, restart).await {
            Ok(Ok(())) => {
                if let Err(e) = self.backoff.record_restart(now) {
                    error!(
                        service = %self.service,
                        error = %e,
                        "Restart succeeded but could not be recorded; next check may restart again"
                    );
                }
                info!(service = %self.service, control, "Service restarted");
                RecoveryOutcome::Restarted
            }
            Ok(Err(e)) => {
                error!(service = %self.service, control, error = %e, "Restart failed");
                RecoveryOutcome::RestartFailed
            }
            Err(_) => {
                error!(
                    service = %self.service,
                    control,
                    timeout_secs = self.restart_timeout.as_secs_f64(),
                    "Restart timed out"
                );
                RecoveryOutcome::RestartFailed
            }
        }
    }
}

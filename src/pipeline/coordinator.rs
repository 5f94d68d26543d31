//! Watchdog pass coordinator
//!
//! One pass runs the stages strictly in order, each consuming only the
//! previous stage's output:
//!
//! ```text
//! STAGE 1: Extract   latest heartbeat in the lookback window
//! STAGE 2: Classify  OK / WARNING / FAIL
//! STAGE 3: Recover   restart under backoff (FAIL only)
//! STAGE 4: Report    overwrite the status snapshot
//! ```
//!
//! No state is kept between passes other than the two durable stores.

use std::sync::Arc;

use chrono::NaiveDateTime;
use tracing::{error, info, warn};

use super::StatusReporter;
use crate::acquisition::LogSource;
use crate::classifier::{classify, Classification};
use crate::config::{ThresholdConfig, WatchdogConfig};
use crate::control::ServiceControl;
use crate::heartbeat::{HeartbeatExtractor, ServerStatsParser};
use crate::recovery::{RecoveryActuator, RestartBackoff};
use crate::storage::{RestartRecordStore, StatusStore};
use crate::types::{Finding, HealthVerdict, HeartbeatRecord, RecoveryOutcome, StatusSnapshot, StatusTag};

/// Everything one pass determined.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub heartbeat: Option<HeartbeatRecord>,
    pub verdict: HealthVerdict,
    pub finding: Finding,
    /// Set only on FAIL
    pub outcome: Option<RecoveryOutcome>,
    pub snapshot: StatusSnapshot,
}

/// The watchdog decision pipeline.
pub struct Watchdog {
    service: String,
    extractor: HeartbeatExtractor,
    thresholds: ThresholdConfig,
    actuator: RecoveryActuator,
    reporter: StatusReporter,
}

impl Watchdog {
    pub fn new(
        service: impl Into<String>,
        extractor: HeartbeatExtractor,
        thresholds: ThresholdConfig,
        actuator: RecoveryActuator,
        reporter: StatusReporter,
    ) -> Self {
        Self {
            service: service.into(),
            extractor,
            thresholds,
            actuator,
            reporter,
        }
    }

    /// Wire a pipeline from config and the two external collaborators.
    pub fn from_config(
        config: &WatchdogConfig,
        source: Arc<dyn LogSource>,
        control: Arc<dyn ServiceControl>,
    ) -> Self {
        let service = config.service.name.clone();
        let extractor = HeartbeatExtractor::new(
            source,
            Box::new(ServerStatsParser::new()),
            service.clone(),
            config.window.lookback(),
            config.timeouts.log_query(),
        );
        let backoff = RestartBackoff::new(
            RestartRecordStore::new(&config.storage.restart_timestamp_file),
            config.backoff.cooldown(),
        );
        let actuator =
            RecoveryActuator::new(backoff, control, service.clone(), config.timeouts.restart());
        let reporter = StatusReporter::new(StatusStore::new(&config.storage.status_file));

        Self::new(service, extractor, config.thresholds.clone(), actuator, reporter)
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    /// Run one pass at `now`. Never fails; every path writes a snapshot.
    pub async fn run_once(&self, now: NaiveDateTime) -> CheckReport {
        // STAGE 1
        let heartbeat = self.extractor.extract_latest(now).await;

        // STAGE 2
        let classification = classify(heartbeat.as_ref(), now, &self.thresholds);
        self.log_verdict(heartbeat.as_ref(), &classification);

        // STAGE 3: a FAIL is persisted as the outcome of its recovery attempt
        let (outcome, status) = match classification.verdict {
            HealthVerdict::Ok => (None, StatusTag::Ok),
            HealthVerdict::Warning => (None, StatusTag::Warning),
            HealthVerdict::Fail => {
                let outcome = self.actuator.attempt_recovery(now).await;
                (Some(outcome), StatusTag::from(outcome))
            }
        };

        // STAGE 4
        let snapshot = self.reporter.report(
            status,
            classification.age_minutes,
            heartbeat.map(|h| h.client_count),
            now,
        );

        CheckReport {
            heartbeat,
            verdict: classification.verdict,
            finding: classification.finding,
            outcome,
            snapshot,
        }
    }

    fn log_verdict(&self, heartbeat: Option<&HeartbeatRecord>, c: &Classification) {
        let clients = heartbeat.map(|h| h.client_count);
        let age = c.age_minutes.map(|a| format!("{a:.1}"));
        match c.verdict {
            HealthVerdict::Ok => info!(
                service = %self.service, verdict = %c.verdict, ?clients, age_minutes = ?age,
                "{}", c.finding
            ),
            HealthVerdict::Warning => warn!(
                service = %self.service, verdict = %c.verdict, ?clients, age_minutes = ?age,
                "{}", c.finding
            ),
            HealthVerdict::Fail => error!(
                service = %self.service, verdict = %c.verdict, ?clients, age_minutes = ?age,
                "{}", c.finding
            ),
        }
    }
}

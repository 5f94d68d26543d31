//! Health classification
//!
//! Pure mapping from the latest heartbeat (or its absence) to a verdict.
//! Rules are evaluated in order and the first match wins, so staleness and
//! zero clients are failures even when a heartbeat nominally exists:
//!
//! 1. no heartbeat → FAIL
//! 2. age strictly greater than `max_heartbeat_age_minutes` → FAIL
//! 3. zero clients → FAIL
//! 4. fewer than `min_clients` → WARNING
//! 5. otherwise → OK

use chrono::NaiveDateTime;

use crate::config::ThresholdConfig;
use crate::types::{Finding, HealthVerdict, HeartbeatRecord};

/// Classifier output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub verdict: HealthVerdict,
    /// Rule that decided the verdict
    pub finding: Finding,
    /// Heartbeat age in minutes; `None` when there was no heartbeat
    pub age_minutes: Option<f64>,
}

/// Classify the service's health at `now`.
pub fn classify(
    record: Option<&HeartbeatRecord>,
    now: NaiveDateTime,
    thresholds: &ThresholdConfig,
) -> Classification {
    let Some(record) = record else {
        return Classification {
            verdict: HealthVerdict::Fail,
            finding: Finding::NoHeartbeat,
            age_minutes: None,
        };
    };

    let age = record.age_minutes(now);
    let finding = if age > thresholds.max_heartbeat_age_minutes {
        Finding::Stale
    } else if record.client_count == 0 {
        Finding::NoClients
    } else if record.client_count < thresholds.min_clients {
        Finding::FewClients
    } else {
        Finding::Healthy
    };

    Classification {
        verdict: finding.verdict(),
        finding,
        age_minutes: Some(age),
    }
}

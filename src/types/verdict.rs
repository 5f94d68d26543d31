//! Classifier verdicts, recovery outcomes and the persisted status tag

use serde::{Deserialize, Serialize};

// ============================================================================
// Stage 2: Health Classification
// ============================================================================

/// Health judgment made before any recovery action.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthVerdict {
    Ok,
    Warning,
    Fail,
}

impl HealthVerdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            HealthVerdict::Ok => "OK",
            HealthVerdict::Warning => "WARNING",
            HealthVerdict::Fail => "FAIL",
        }
    }
}

impl std::fmt::Display for HealthVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which classification rule produced the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finding {
    /// No heartbeat in the lookback window (or the log query failed)
    NoHeartbeat,
    /// Latest heartbeat older than the configured maximum age
    Stale,
    /// Heartbeat reports zero connected clients
    NoClients,
    /// Fewer clients than the configured minimum
    FewClients,
    Healthy,
}

impl Finding {
    pub const fn verdict(self) -> HealthVerdict {
        match self {
            Finding::NoHeartbeat | Finding::Stale | Finding::NoClients => HealthVerdict::Fail,
            Finding::FewClients => HealthVerdict::Warning,
            Finding::Healthy => HealthVerdict::Ok,
        }
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Finding::NoHeartbeat => write!(f, "no recent heartbeat"),
            Finding::Stale => write!(f, "heartbeat too old"),
            Finding::NoClients => write!(f, "no clients connected"),
            Finding::FewClients => write!(f, "too few clients"),
            Finding::Healthy => write!(f, "healthy"),
        }
    }
}

// ============================================================================
// Stage 3: Recovery
// ============================================================================

/// Result of one recovery attempt on a FAIL verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecoveryOutcome {
    /// Service restarted and the restart recorded for backoff
    Restarted,
    /// Cooldown still active; service control not contacted
    SkippedBackoff,
    /// Service control reported failure; no cooldown consumed
    RestartFailed,
}

impl RecoveryOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            RecoveryOutcome::Restarted => "RESTARTED",
            RecoveryOutcome::SkippedBackoff => "SKIPPED_BACKOFF",
            RecoveryOutcome::RestartFailed => "RESTART_FAILED",
        }
    }
}

impl std::fmt::Display for RecoveryOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Stage 4: Persisted Status
// ============================================================================

/// Status written to the snapshot.
///
/// A FAIL verdict is never persisted as such: the snapshot carries the
/// outcome of the recovery attempt it triggered instead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusTag {
    Ok,
    Warning,
    Restarted,
    SkippedBackoff,
    RestartFailed,
}

impl StatusTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            StatusTag::Ok => "OK",
            StatusTag::Warning => "WARNING",
            StatusTag::Restarted => "RESTARTED",
            StatusTag::SkippedBackoff => "SKIPPED_BACKOFF",
            StatusTag::RestartFailed => "RESTART_FAILED",
        }
    }

    pub const fn from_outcome(outcome: RecoveryOutcome) -> Self {
        match outcome {
            RecoveryOutcome::Restarted => StatusTag::Restarted,
            RecoveryOutcome::SkippedBackoff => StatusTag::SkippedBackoff,
            RecoveryOutcome::RestartFailed => StatusTag::RestartFailed,
        }
    }
}

impl From<RecoveryOutcome> for StatusTag {
    fn from(outcome: RecoveryOutcome) -> Self {
        Self::from_outcome(outcome)
    }
}

impl std::fmt::Display for StatusTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

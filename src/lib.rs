//! Heartbeat Watchdog: log-heartbeat health checks with rate-limited recovery
//!
//! Inspects a service's recent log output for periodic heartbeat lines,
//! classifies its health, restarts it under a cooldown when it has failed,
//! and persists the outcome for a read-only status viewer.
//!
//! ## Architecture
//!
//! - **Acquisition**: log sources (`journalctl`, replayed captures)
//! - **Heartbeat**: pluggable line parser + latest-heartbeat extractor
//! - **Classifier**: pure OK / WARNING / FAIL decision
//! - **Recovery**: restart backoff + actuator over an injectable service control
//! - **Pipeline**: one extract → classify → recover → report pass
//! - **Storage**: atomic single-value stores and the invocation lock
//! - **API**: axum status viewer

pub mod acquisition;
pub mod api;
pub mod background;
pub mod classifier;
pub mod config;
pub mod control;
pub mod heartbeat;
pub mod pipeline;
pub mod recovery;
pub mod storage;
pub mod types;

pub use config::WatchdogConfig;
pub use pipeline::{CheckReport, Watchdog};

pub use types::{
    Finding, HealthVerdict, HeartbeatRecord, RecoveryOutcome, StatusSnapshot, StatusTag,
    StatusView,
};

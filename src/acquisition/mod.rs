//! Log acquisition module
//!
//! Abstracts where the monitored service's log lines come from so the
//! heartbeat extractor never knows whether it is reading journald or a
//! replayed capture.

mod journal;
mod replay;

pub use journal::JournalctlSource;
pub use replay::StaticLogSource;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Error, Debug)]
pub enum LogSourceError {
    #[error("Failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}: {stderr}")]
    NonZeroExit {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Log source unavailable: {0}")]
    Unavailable(String),
}

// ============================================================================
// Log Source Trait
// ============================================================================

/// Trait abstracting where log lines come from.
///
/// Implementations return raw text lines; parsing is the extractor's job.
/// Any `Err` is treated by the pipeline as "no heartbeat".
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Fetch the lines the service logged at or after `since`.
    async fn query_logs(
        &self,
        service: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<String>, LogSourceError>;

    /// Human-readable name for logging (e.g. "journalctl", "replay").
    fn source_name(&self) -> &str;
}

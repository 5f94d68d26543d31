//! Service control module
//!
//! The one place the watchdog acts on the monitored service. The recovery
//! actuator only sees success or failure; why a restart failed is logged
//! here and nowhere else.

mod scripted;
mod systemctl;

pub use scripted::StaticControl;
pub use systemctl::SystemctlControl;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ServiceControlError {
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

    #[error("Restart refused: {0}")]
    Refused(String),
}

/// Restarts the monitored service.
#[async_trait]
pub trait ServiceControl: Send + Sync {
    async fn restart(&self, service: &str) -> Result<(), ServiceControlError>;

    /// Human-readable name for logging (e.g. "systemctl", "dry-run").
    fn control_name(&self) -> &str;
}

/// Logs the restart it would perform and reports success without acting.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunControl;

#[async_trait]
impl ServiceControl for DryRunControl {
    async fn restart(&self, service: &str) -> Result<(), ServiceControlError> {
        info!(service, "Dry run: restart skipped");
        Ok(())
    }

    fn control_name(&self) -> &str {
        "dry-run"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn dry_run_always_succeeds() {
        assert!(DryRunControl.restart("datum").await.is_ok());
        assert_eq!(DryRunControl.control_name(), "dry-run");
    }
}

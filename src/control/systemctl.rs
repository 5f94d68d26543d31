//! systemd service control

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use super::{ServiceControl, ServiceControlError};

/// Runs `systemctl restart <service>`.
#[derive(Debug, Clone)]
pub struct SystemctlControl {
    command: String,
}

impl SystemctlControl {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Default for SystemctlControl {
    fn default() -> Self {
        Self::new(crate::config::defaults::SYSTEMCTL_COMMAND)
    }
}

#[async_trait]
impl ServiceControl for SystemctlControl {
    async fn restart(&self, service: &str) -> Result<(), ServiceControlError> {
        debug!(command = %self.command, service, "Restarting service");

        let output = Command::new(&self.command)
            .args(["restart", service])
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ServiceControlError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(ServiceControlError::NonZeroExit {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    fn control_name(&self) -> &str {
        "systemctl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let control = SystemctlControl::new("/nonexistent/systemctl-for-tests");
        let err = control.restart("datum").await.unwrap_err();
        assert!(matches!(err, ServiceControlError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_status_decides_success() {
        assert!(SystemctlControl::new("true").restart("datum").await.is_ok());
        let err = SystemctlControl::new("false")
            .restart("datum")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceControlError::NonZeroExit { .. }));
    }
}

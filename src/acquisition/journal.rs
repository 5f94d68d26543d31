//! journald log source
//!
//! Runs `journalctl -u <service> --since <ts> -o short-precise --no-pager`
//! and returns its stdout line by line. `short-precise` keeps the
//! microsecond journal prefix; the service's own sub-second timestamp inside
//! the message is what the heartbeat parser reads.

use std::process::Stdio;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use tokio::process::Command;
use tracing::debug;

use super::{LogSource, LogSourceError};
use crate::types::time::format_timestamp;

/// Queries journald through the `journalctl` binary.
#[derive(Debug, Clone)]
pub struct JournalctlSource {
    command: String,
}

impl JournalctlSource {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }

    fn build_args(service: &str, since: NaiveDateTime) -> Vec<String> {
        vec![
            "-u".to_string(),
            service.to_string(),
            "--since".to_string(),
            format_timestamp(since),
            "-o".to_string(),
            "short-precise".to_string(),
            "--no-pager".to_string(),
        ]
    }
}

impl Default for JournalctlSource {
    fn default() -> Self {
        Self::new(crate::config::defaults::JOURNALCTL_COMMAND)
    }
}

#[async_trait]
impl LogSource for JournalctlSource {
    async fn query_logs(
        &self,
        service: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<String>, LogSourceError> {
        let args = Self::build_args(service, since);
        debug!(command = %self.command, ?args, "Querying journal");

        // kill_on_drop: a query abandoned by the caller's timeout must not
        // leave journalctl running.
        let output = Command::new(&self.command)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| LogSourceError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(LogSourceError::NonZeroExit {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.lines().map(str::to_string).collect())
    }

    fn source_name(&self) -> &str {
        "journalctl"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn args_follow_journalctl_conventions() {
        let since = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_milli_opt(14, 53, 54, 900)
            .unwrap();
        let args = JournalctlSource::build_args("datum", since);
        assert_eq!(
            args,
            [
                "-u",
                "datum",
                "--since",
                "2025-08-16 14:53:54",
                "-o",
                "short-precise",
                "--no-pager"
            ]
        );
    }

    #[tokio::test]
    async fn missing_binary_is_a_spawn_error() {
        let source = JournalctlSource::new("/nonexistent/journalctl-for-tests");
        let since = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let err = source.query_logs("datum", since).await.unwrap_err();
        assert!(matches!(err, LogSourceError::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        // `false` ignores its arguments and exits 1
        let source = JournalctlSource::new("false");
        let since = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let err = source.query_logs("datum", since).await.unwrap_err();
        assert!(matches!(err, LogSourceError::NonZeroExit { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdout_is_split_into_lines() {
        // `echo` prints its arguments, giving one deterministic line
        let source = JournalctlSource::new("echo");
        let since = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_opt(15, 0, 0)
            .unwrap();
        let lines = source.query_logs("datum", since).await.unwrap();
        assert_eq!(
            lines,
            ["-u datum --since 2025-08-16 15:00:00 -o short-precise --no-pager"]
        );
    }
}

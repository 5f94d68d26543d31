//! Replayed log source
//!
//! Serves a fixed set of lines, either captured to a file (`check
//! --log-file`) or built in memory by tests. The lookback window is not
//! applied: every line is handed to the extractor, which keeps the latest
//! heartbeat and lets the classifier judge its age.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use super::{LogSource, LogSourceError};

/// Pre-loaded log lines with an optional forced failure.
#[derive(Debug, Default)]
pub struct StaticLogSource {
    lines: Vec<String>,
    failure: Option<String>,
    queries: Mutex<Vec<(String, NaiveDateTime)>>,
}

impl StaticLogSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// A source whose every query fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Load a capture, one log line per file line.
    pub fn from_file(path: &Path) -> Result<Self, LogSourceError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(Self::new(contents.lines()))
    }

    /// `(service, since)` of every query made so far.
    pub fn queries(&self) -> Vec<(String, NaiveDateTime)> {
        self.queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_else(|poisoned| poisoned.into_inner().clone())
    }
}

#[async_trait]
impl LogSource for StaticLogSource {
    async fn query_logs(
        &self,
        service: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<String>, LogSourceError> {
        match self.queries.lock() {
            Ok(mut q) => q.push((service.to_string(), since)),
            Err(poisoned) => poisoned.into_inner().push((service.to_string(), since)),
        }

        if let Some(ref reason) = self.failure {
            return Err(LogSourceError::Unavailable(reason.clone()));
        }
        Ok(self.lines.clone())
    }

    fn source_name(&self) -> &str {
        "replay"
    }
}

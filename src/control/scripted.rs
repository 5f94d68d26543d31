//! Scripted service control for tests and rehearsals

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use super::{ServiceControl, ServiceControlError};

/// Answers every restart with a fixed result and counts the calls.
#[derive(Debug, Default)]
pub struct StaticControl {
    failure: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StaticControl {
    /// Every restart succeeds.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// Every restart fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            failure: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of restarts requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ServiceControl for StaticControl {
    async fn restart(&self, _service: &str) -> Result<(), ServiceControlError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.failure {
            Some(reason) => Err(ServiceControlError::Refused(reason.clone())),
            None => Ok(()),
        }
    }

    fn control_name(&self) -> &str {
        "static"
    }
}

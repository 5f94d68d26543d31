//! Shared data structures for the watchdog decision pipeline
//!
//! This module defines the values that flow between the pipeline stages:
//! - Stage 1: HeartbeatRecord (latest heartbeat found in the log window)
//! - Stage 2: HealthVerdict + Finding (classifier output)
//! - Stage 3: RecoveryOutcome (restart attempt on FAIL)
//! - Stage 4: StatusTag + StatusSnapshot (persisted for the viewer)

mod heartbeat;
mod verdict;
mod snapshot;
pub mod time;

pub use heartbeat::*;
pub use verdict::*;
pub use snapshot::*;

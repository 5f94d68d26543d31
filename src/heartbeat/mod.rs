//! Heartbeat extraction
//!
//! - [`parser`]: turns one log line into an optional [`HeartbeatRecord`]
//! - [`extractor`]: queries a [`LogSource`] for the lookback window and keeps
//!   the latest heartbeat
//!
//! [`HeartbeatRecord`]: crate::types::HeartbeatRecord
//! [`LogSource`]: crate::acquisition::LogSource

pub mod extractor;
pub mod parser;

pub use extractor::{latest_heartbeat, HeartbeatExtractor};
pub use parser::{HeartbeatParser, ServerStatsParser};

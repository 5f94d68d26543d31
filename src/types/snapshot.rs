//! Status snapshot persisted for the viewer

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{time::format_timestamp, StatusTag};

/// The single current status record.
///
/// `heartbeat_age_minutes` and `clients` are present only when a heartbeat
/// was found; they are omitted from the JSON entirely otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusSnapshot {
    pub status: StatusTag,
    /// Time of the check, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_age_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<u32>,
}

impl StatusSnapshot {
    pub fn new(
        status: StatusTag,
        now: NaiveDateTime,
        heartbeat_age_minutes: Option<f64>,
        clients: Option<u32>,
    ) -> Self {
        Self {
            status,
            timestamp: format_timestamp(now),
            heartbeat_age_minutes,
            clients,
        }
    }
}

/// Lenient read-only view of a snapshot file, as the viewer shows it.
///
/// Accepts any status string, so a file written by a newer or older
/// watchdog still renders instead of reading as "no data".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusView {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_age_minutes: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<u64>,
}

impl From<StatusSnapshot> for StatusView {
    fn from(snapshot: StatusSnapshot) -> Self {
        Self {
            status: snapshot.status.as_str().to_string(),
            timestamp: snapshot.timestamp,
            heartbeat_age_minutes: snapshot.heartbeat_age_minutes,
            clients: snapshot.clients.map(u64::from),
        }
    }
}

//! Wall-clock helpers shared by the stores, the log query and the snapshot.
//!
//! All instants are local naive datetimes: journald `short-precise` output
//! and the `--since` argument are both rendered in local time, and the
//! persisted formats carry no offset.

use chrono::{Local, NaiveDateTime};

use crate::config::defaults::RECORD_TIMESTAMP_FORMAT;

/// Current local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Render as `YYYY-MM-DD HH:MM:SS` (sub-seconds truncated).
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(RECORD_TIMESTAMP_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp, ignoring surrounding whitespace.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), RECORD_TIMESTAMP_FORMAT).ok()
}

//! Line-level heartbeat parsing
//!
//! The parser is a trait so the matching pattern can be swapped, or the log
//! source replaced with a structured feed, without touching the classifier
//! or the backoff controller.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::config::defaults::{HEARTBEAT_PATTERN, HEARTBEAT_TIMESTAMP_FORMAT};
use crate::types::HeartbeatRecord;

/// Turns one raw log line into a heartbeat, if it is one.
pub trait HeartbeatParser: Send + Sync {
    /// `None` for any line that is not a well-formed heartbeat. Malformed
    /// and unrelated lines are not errors.
    fn parse_line(&self, line: &str) -> Option<HeartbeatRecord>;
}

static SERVER_STATS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(HEARTBEAT_PATTERN).expect("HEARTBEAT_PATTERN is a valid regex")
});

/// Parses `... <YYYY-MM-DD HH:MM:SS.frac> ... INFO: Server stats: <N> clients ...`.
///
/// The first timestamp on the line is the heartbeat time. Lines whose
/// timestamp is not a real calendar instant, or whose client count does not
/// fit a `u32`, are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct ServerStatsParser;

impl ServerStatsParser {
    pub const fn new() -> Self {
        Self
    }
}

impl HeartbeatParser for ServerStatsParser {
    fn parse_line(&self, line: &str) -> Option<HeartbeatRecord> {
        let caps = SERVER_STATS_RE.captures(line)?;
        let timestamp =
            NaiveDateTime::parse_from_str(caps.get(1)?.as_str(), HEARTBEAT_TIMESTAMP_FORMAT).ok()?;
        let client_count = caps.get(2)?.as_str().parse().ok()?;
        Some(HeartbeatRecord::new(timestamp, client_count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "Aug 16 15:03:54.487312 gw datum_gateway[781961]: 2025-08-16 15:03:54.487 [                                        main] INFO: Server stats: 2 clients / 14.36 Th/s";

    #[test]
    fn parses_gateway_stats_line() {
        let hb = ServerStatsParser::new().parse_line(SAMPLE).unwrap();
        let expected = NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_milli_opt(15, 3, 54, 487)
            .unwrap();
        assert_eq!(hb.timestamp, expected);
        assert_eq!(hb.client_count, 2);
    }

    #[test]
    fn zero_clients_is_still_a_heartbeat() {
        let line = "2025-08-16 15:03:54.1 [main] INFO: Server stats: 0 clients / 0.00 Th/s";
        assert_eq!(ServerStatsParser::new().parse_line(line).unwrap().client_count, 0);
    }

    #[test]
    fn unrelated_lines_are_skipped() {
        let parser = ServerStatsParser::new();
        for line in [
            "",
            "-- No entries --",
            "2025-08-16 15:03:54.487 [main] INFO: Share accepted",
            "2025-08-16 15:03:54.487 [main] WARN: Server stats: 2 clients",
            // No fractional seconds
            "2025-08-16 15:03:54 [main] INFO: Server stats: 2 clients",
        ] {
            assert!(parser.parse_line(line).is_none(), "should skip {line:?}");
        }
    }

    #[test]
    fn impossible_timestamp_is_skipped() {
        let line = "2025-02-30 15:03:54.487 [main] INFO: Server stats: 4 clients";
        assert!(ServerStatsParser::new().parse_line(line).is_none());
    }

    #[test]
    fn overflowing_client_count_is_skipped() {
        let line = "2025-08-16 15:03:54.487 [main] INFO: Server stats: 99999999999 clients";
        assert!(ServerStatsParser::new().parse_line(line).is_none());
    }
}

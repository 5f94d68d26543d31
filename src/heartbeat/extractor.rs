//! Latest-heartbeat extraction over a trailing log window

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDateTime, TimeDelta};
use tracing::{debug, warn};

use super::parser::HeartbeatParser;
use crate::acquisition::LogSource;
use crate::types::HeartbeatRecord;

/// Pick the latest heartbeat among `lines`.
///
/// Non-heartbeat lines are skipped. On equal timestamps the line that comes
/// later in the input wins.
pub fn latest_heartbeat<S: AsRef<str>>(
    parser: &dyn HeartbeatParser,
    lines: &[S],
) -> Option<HeartbeatRecord> {
    lines
        .iter()
        .filter_map(|line| parser.parse_line(line.as_ref()))
        .fold(None, |latest, candidate| match latest {
            Some(current) if current.timestamp > candidate.timestamp => Some(current),
            _ => Some(candidate),
        })
}

/// Queries a log source for the lookback window and keeps the latest heartbeat.
///
/// Has no side effects. Every failure mode (query error, timeout, no match)
/// collapses to `None`.
pub struct HeartbeatExtractor {
    source: Arc<dyn LogSource>,
    parser: Box<dyn HeartbeatParser>,
    service: String,
    lookback: TimeDelta,
    query_timeout: Duration,
}

impl HeartbeatExtractor {
    pub fn new(
        source: Arc<dyn LogSource>,
        parser: Box<dyn HeartbeatParser>,
        service: impl Into<String>,
        lookback: TimeDelta,
        query_timeout: Duration,
    ) -> Self {
        Self {
            source,
            parser,
            service: service.into(),
            lookback,
            query_timeout,
        }
    }

    /// Latest heartbeat logged since `now - lookback`.
    pub async fn extract_latest(&self, now: NaiveDateTime) -> Option<HeartbeatRecord> {
        let since = now
            .checked_sub_signed(self.lookback)
            .unwrap_or(NaiveDateTime::MIN);

        let query = self.source.query_logs(&self.service, since);
        let lines = match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(lines)) => lines,
            Ok(Err(e)) => {
                warn!(
                    source = self.source.source_name(),
                    service = %self.service,
                    error = %e,
                    "Log query failed, treating as no heartbeat"
                );
                return None;
            }
            Err(_) => {
                warn!(
                    source = self.source.source_name(),
                    service = %self.service,
                    timeout_secs = self.query_timeout.as_secs_f64(),
                    "Log query timed out, treating as no heartbeat"
                );
                return None;
            }
        };

        let latest = latest_heartbeat(self.parser.as_ref(), &lines);
        debug!(
            source = self.source.source_name(),
            lines = lines.len(),
            found = latest.is_some(),
            "Scanned log window"
        );
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::StaticLogSource;
    use crate::heartbeat::ServerStatsParser;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 8, 16)
            .unwrap()
            .and_hms_milli_opt(h, m, s, ms)
            .unwrap()
    }

    fn line(ts: &str, clients: u32) -> String {
        format!("datum_gateway[781961]: {ts} [main] INFO: Server stats: {clients} clients / 14.36 Th/s")
    }

    #[test]
    fn keeps_latest_not_last() {
        let lines = vec![
            line("2025-08-16 15:01:00.000", 1),
            line("2025-08-16 15:04:00.000", 4),
            "garbage".to_string(),
            line("2025-08-16 15:02:00.000", 2),
        ];
        let hb = latest_heartbeat(&ServerStatsParser, &lines).unwrap();
        assert_eq!(hb.timestamp, at(15, 4, 0, 0));
        assert_eq!(hb.client_count, 4);
    }

    #[test]
    fn tie_goes_to_later_line() {
        let lines = vec![
            line("2025-08-16 15:04:00.500", 3),
            line("2025-08-16 15:04:00.500", 7),
        ];
        let hb = latest_heartbeat(&ServerStatsParser, &lines).unwrap();
        assert_eq!(hb.client_count, 7);
    }

    #[test]
    fn no_matches_is_none() {
        let lines = ["-- No entries --", "started"];
        assert!(latest_heartbeat(&ServerStatsParser, &lines).is_none());
        let empty: [&str; 0] = [];
        assert!(latest_heartbeat(&ServerStatsParser, &empty).is_none());
    }

    #[tokio::test]
    async fn queries_since_now_minus_lookback() {
        let source = Arc::new(StaticLogSource::new([line("2025-08-16 15:04:00.000", 3)]));
        let extractor = HeartbeatExtractor::new(
            source.clone(),
            Box::new(ServerStatsParser),
            "datum",
            TimeDelta::minutes(10),
            Duration::from_secs(5),
        );
        let hb = extractor.extract_latest(at(15, 5, 0, 0)).await.unwrap();
        assert_eq!(hb.client_count, 3);
        assert_eq!(source.queries(), vec![("datum".to_string(), at(14, 55, 0, 0))]);
    }

    #[tokio::test]
    async fn failed_query_is_none() {
        let extractor = HeartbeatExtractor::new(
            Arc::new(StaticLogSource::failing("journald unavailable")),
            Box::new(ServerStatsParser),
            "datum",
            TimeDelta::minutes(10),
            Duration::from_secs(5),
        );
        assert!(extractor.extract_latest(at(15, 5, 0, 0)).await.is_none());
    }
}

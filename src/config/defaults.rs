//! System-wide default constants.
//!
//! Centralises the values every `[section]` of `watchdog.toml` falls back to,
//! plus the fixed formats shared by the stores and the log parser.
//! Grouped by subsystem for easy discovery.

// ============================================================================
// Monitored Service
// ============================================================================

/// Unit name of the monitored service (journald `-u` and systemctl target).
pub const SERVICE_NAME: &str = "datum";

/// Minimum connected clients before the service is reported as WARNING.
pub const MIN_CLIENTS: u32 = 2;

/// Heartbeats older than this (minutes) are treated as a failure.
pub const MAX_HEARTBEAT_AGE_MINUTES: f64 = 30.0;

/// Trailing window of log output searched for heartbeats (minutes).
pub const LOG_LOOKBACK_MINUTES: u64 = 10;

// ============================================================================
// Recovery
// ============================================================================

/// Minimum time between two restarts (minutes). 100 min keeps a crash-looping
/// service from being restarted on every scheduled check.
pub const RESTART_COOLDOWN_MINUTES: u64 = 100;

/// Upper bound accepted for the cooldown (minutes). 10 years.
pub const MAX_RESTART_COOLDOWN_MINUTES: u64 = 10 * 365 * 24 * 60;

// ============================================================================
// Durable Stores
// ============================================================================

/// Status snapshot consumed by the viewer.
pub const STATUS_FILE: &str = "/tmp/datum_gateway_status.json";

/// Last successful restart, `YYYY-MM-DD HH:MM:SS`.
pub const RESTART_TIMESTAMP_FILE: &str = "/tmp/datum_gateway_last_restart.timestamp";

/// Timestamp format of the restart record, the snapshot and `journalctl --since`.
pub const RECORD_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ============================================================================
// Heartbeat Parsing
// ============================================================================

/// Heartbeat line, e.g.
/// `datum_gateway[781961]: 2025-08-16 15:03:54.487 [main] INFO: Server stats: 2 clients / 14.36 Th/s`
pub const HEARTBEAT_PATTERN: &str =
    r"(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d+).*INFO: Server stats: (\d+) clients";

/// Sub-second timestamp carried by heartbeat lines.
pub const HEARTBEAT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

// ============================================================================
// External Commands
// ============================================================================

pub const JOURNALCTL_COMMAND: &str = "journalctl";

pub const SYSTEMCTL_COMMAND: &str = "systemctl";

/// Upper bound on one log query (seconds). A timed-out query counts as failed.
pub const LOG_QUERY_TIMEOUT_SECS: u64 = 30;

/// Upper bound on one restart action (seconds). A timed-out restart counts as failed.
pub const RESTART_TIMEOUT_SECS: u64 = 60;

// ============================================================================
// Scheduling & Viewer
// ============================================================================

/// Interval between passes in `run` mode (seconds).
pub const CHECK_INTERVAL_SECS: u64 = 300;

/// Bind address of the status viewer.
pub const VIEWER_ADDR: &str = "0.0.0.0:8080";

// ============================================================================
// Config Discovery
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "WATCHDOG_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "watchdog.toml";

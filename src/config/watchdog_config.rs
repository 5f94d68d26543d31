//! Watchdog Configuration - every threshold, window and path as a TOML value
//!
//! Each struct implements `Default` with values matching the constants in
//! [`super::defaults`], so an empty or missing config file behaves exactly
//! like the built-in deployment.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for one monitored service.
///
/// Load with `WatchdogConfig::load()` which searches:
/// 1. `$WATCHDOG_CONFIG` env var
/// 2. `./watchdog.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WatchdogConfig {
    /// Monitored service identity
    #[serde(default)]
    pub service: ServiceConfig,

    /// Health classification thresholds
    #[serde(default)]
    pub thresholds: ThresholdConfig,

    /// Log lookback window
    #[serde(default)]
    pub window: WindowConfig,

    /// Restart cooldown
    #[serde(default)]
    pub backoff: BackoffConfig,

    /// Locations of the durable stores
    #[serde(default)]
    pub storage: StorageConfig,

    /// Recovery behaviour
    #[serde(default)]
    pub recovery: RecoveryConfig,

    /// Bounds on blocking collaborator calls
    #[serde(default)]
    pub timeouts: TimeoutConfig,

    /// In-process scheduling (`run` mode)
    #[serde(default)]
    pub schedule: ScheduleConfig,

    /// Status viewer
    #[serde(default)]
    pub viewer: ViewerConfig,

    /// External command paths
    #[serde(default)]
    pub commands: CommandsConfig,
}

impl WatchdogConfig {
    /// Load configuration using the standard search order:
    /// 1. `$WATCHDOG_CONFIG` environment variable
    /// 2. `./watchdog.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// A file that fails to load is logged and skipped, never fatal.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), service = %config.service.name, "Loaded watchdog config from WATCHDOG_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from WATCHDOG_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "WATCHDOG_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(service = %config.service.name, "Loaded watchdog config from ./watchdog.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./watchdog.toml, using defaults");
                }
            }
        }

        info!("No watchdog.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys are logged as warnings; they never fail the load.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate the config for internal consistency.
    ///
    /// Rules:
    /// - The heartbeat age limit must be a positive finite number
    /// - Windows, timeouts and the schedule interval must be non-zero
    /// - The two stores must be distinct, non-empty paths
    /// - The viewer address must parse as `host:port`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.service.name.trim().is_empty() {
            errors.push("service.name must not be empty".to_string());
        }

        let max_age = self.thresholds.max_heartbeat_age_minutes;
        if !max_age.is_finite() || max_age <= 0.0 {
            errors.push(format!(
                "thresholds.max_heartbeat_age_minutes must be a finite number > 0, got {max_age}"
            ));
        }

        if self.window.lookback_minutes == 0 {
            errors.push("window.lookback_minutes must be > 0".to_string());
        }

        if self.backoff.cooldown_minutes > defaults::MAX_RESTART_COOLDOWN_MINUTES {
            errors.push(format!(
                "backoff.cooldown_minutes ({}) exceeds the maximum of {}",
                self.backoff.cooldown_minutes,
                defaults::MAX_RESTART_COOLDOWN_MINUTES
            ));
        }

        if self.timeouts.log_query_secs == 0 {
            errors.push("timeouts.log_query_secs must be > 0".to_string());
        }
        if self.timeouts.restart_secs == 0 {
            errors.push("timeouts.restart_secs must be > 0".to_string());
        }
        if self.schedule.interval_secs == 0 {
            errors.push("schedule.interval_secs must be > 0".to_string());
        }

        let s = &self.storage;
        if s.status_file.as_os_str().is_empty() {
            errors.push("storage.status_file must not be empty".to_string());
        }
        if s.restart_timestamp_file.as_os_str().is_empty() {
            errors.push("storage.restart_timestamp_file must not be empty".to_string());
        }
        if s.status_file == s.restart_timestamp_file {
            errors.push(format!(
                "storage.status_file and storage.restart_timestamp_file must differ (both {})",
                s.status_file.display()
            ));
        }

        if self.viewer.addr.parse::<std::net::SocketAddr>().is_err() {
            errors.push(format!(
                "viewer.addr '{}' is not a valid host:port address",
                self.viewer.addr
            ));
        }

        if self.commands.journalctl.trim().is_empty() {
            errors.push("commands.journalctl must not be empty".to_string());
        }
        if self.commands.systemctl.trim().is_empty() {
            errors.push("commands.systemctl must not be empty".to_string());
        }

        for w in super::validation::validate_ranges(self) {
            warn!("{}", w);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {}", .0.display(), .1)]
    Io(PathBuf, std::io::Error),
    #[error("Config parse error ({}): {}", .0.display(), .1)]
    Parse(PathBuf, toml::de::Error),
    #[error("Config serialization error: {0}")]
    Serialize(toml::ser::Error),
    #[error("Config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

// ============================================================================
// Service
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Unit name passed to `journalctl -u` and `systemctl restart`
    #[serde(default = "default_service_name")]
    pub name: String,
}

fn default_service_name() -> String {
    defaults::SERVICE_NAME.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
        }
    }
}

// ============================================================================
// Thresholds
// ============================================================================

/// Health classification thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Fewer connected clients than this (but more than zero) is a WARNING
    #[serde(default = "default_min_clients")]
    pub min_clients: u32,

    /// A heartbeat strictly older than this is a FAIL
    #[serde(default = "default_max_heartbeat_age")]
    pub max_heartbeat_age_minutes: f64,
}

fn default_min_clients() -> u32 {
    defaults::MIN_CLIENTS
}
fn default_max_heartbeat_age() -> f64 {
    defaults::MAX_HEARTBEAT_AGE_MINUTES
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_clients: default_min_clients(),
            max_heartbeat_age_minutes: default_max_heartbeat_age(),
        }
    }
}

// ============================================================================
// Window
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Trailing span of log output searched for heartbeats
    #[serde(default = "default_lookback")]
    pub lookback_minutes: u64,
}

fn default_lookback() -> u64 {
    defaults::LOG_LOOKBACK_MINUTES
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            lookback_minutes: default_lookback(),
        }
    }
}

impl WindowConfig {
    pub fn lookback(&self) -> TimeDelta {
        minutes_delta(self.lookback_minutes)
    }
}

// ============================================================================
// Backoff
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Minimum time between two restarts
    #[serde(default = "default_cooldown")]
    pub cooldown_minutes: u64,
}

fn default_cooldown() -> u64 {
    defaults::RESTART_COOLDOWN_MINUTES
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            cooldown_minutes: default_cooldown(),
        }
    }
}

impl BackoffConfig {
    pub fn cooldown(&self) -> TimeDelta {
        minutes_delta(self.cooldown_minutes)
    }
}

/// Whole minutes as a `TimeDelta`, saturating instead of overflowing.
fn minutes_delta(minutes: u64) -> TimeDelta {
    i64::try_from(minutes)
        .ok()
        .and_then(TimeDelta::try_minutes)
        .unwrap_or(TimeDelta::MAX)
}

// ============================================================================
// Storage
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON status snapshot read by the viewer
    #[serde(default = "default_status_file")]
    pub status_file: PathBuf,

    /// Last successful restart timestamp
    #[serde(default = "default_restart_timestamp_file")]
    pub restart_timestamp_file: PathBuf,

    /// Directory for the single-instance lock file; no lock when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock_dir: Option<PathBuf>,
}

fn default_status_file() -> PathBuf {
    PathBuf::from(defaults::STATUS_FILE)
}
fn default_restart_timestamp_file() -> PathBuf {
    PathBuf::from(defaults::RESTART_TIMESTAMP_FILE)
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            status_file: default_status_file(),
            restart_timestamp_file: default_restart_timestamp_file(),
            lock_dir: None,
        }
    }
}

// ============================================================================
// Recovery
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryConfig {
    /// Log the restart that would happen and report success without acting
    #[serde(default)]
    pub dry_run: bool,
}

// ============================================================================
// Timeouts
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    #[serde(default = "default_log_query_timeout")]
    pub log_query_secs: u64,

    #[serde(default = "default_restart_timeout")]
    pub restart_secs: u64,
}

fn default_log_query_timeout() -> u64 {
    defaults::LOG_QUERY_TIMEOUT_SECS
}
fn default_restart_timeout() -> u64 {
    defaults::RESTART_TIMEOUT_SECS
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            log_query_secs: default_log_query_timeout(),
            restart_secs: default_restart_timeout(),
        }
    }
}

impl TimeoutConfig {
    pub const fn log_query(&self) -> Duration {
        Duration::from_secs(self.log_query_secs)
    }

    pub const fn restart(&self) -> Duration {
        Duration::from_secs(self.restart_secs)
    }
}

// ============================================================================
// Schedule
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

fn default_interval() -> u64 {
    defaults::CHECK_INTERVAL_SECS
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
        }
    }
}

impl ScheduleConfig {
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

// ============================================================================
// Viewer
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default = "default_viewer_addr")]
    pub addr: String,
}

fn default_viewer_addr() -> String {
    defaults::VIEWER_ADDR.to_string()
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            addr: default_viewer_addr(),
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandsConfig {
    #[serde(default = "default_journalctl")]
    pub journalctl: String,

    #[serde(default = "default_systemctl")]
    pub systemctl: String,
}

fn default_journalctl() -> String {
    defaults::JOURNALCTL_COMMAND.to_string()
}
fn default_systemctl() -> String {
    defaults::SYSTEMCTL_COMMAND.to_string()
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            journalctl: default_journalctl(),
            systemctl: default_systemctl(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Config validation: unknown-key detection with Levenshtein suggestions
//! and suspicious-range warnings.
//!
//! The raw TOML is first walked as a `toml::Value` tree and every dotted key
//! is compared against the known field names, emitting warnings with
//! "did you mean?" suggestions. Serde deserialization runs afterwards, so a
//! typo never breaks an otherwise valid config.

use std::collections::HashSet;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, ", did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for `WatchdogConfig`.
///
/// Any new field added to `WatchdogConfig` must be added here too.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        "service",
        "service.name",
        "thresholds",
        "thresholds.min_clients",
        "thresholds.max_heartbeat_age_minutes",
        "window",
        "window.lookback_minutes",
        "backoff",
        "backoff.cooldown_minutes",
        "storage",
        "storage.status_file",
        "storage.restart_timestamp_file",
        "storage.lock_dir",
        "recovery",
        "recovery.dry_run",
        "timeouts",
        "timeouts.log_query_secs",
        "timeouts.restart_secs",
        "schedule",
        "schedule.interval_secs",
        "viewer",
        "viewer.addr",
        "commands",
        "commands.journalctl",
        "commands.systemctl",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// For example, a table `{ a = { b = 1, c = 2 } }` yields:
/// `["a", "a.b", "a.c"]`
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            if v.is_table() {
                keys.extend(walk_toml_keys(v, &path));
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

fn levenshtein(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    let b_len = b_chars.len();
    if a.is_empty() {
        return b_len;
    }

    let mut prev: Vec<usize> = (0..=b_len).collect();
    let mut curr = vec![0; b_len + 1];

    for (i, ca) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b_chars.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_len]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
///
/// Ties resolve to the lexicographically smallest key so output is stable.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    known
        .iter()
        .map(|&k| (levenshtein(unknown, k), k))
        .filter(|&(dist, _)| dist <= 3)
        .min()
        .map(|(_, k)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys, it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Warnings
// ============================================================================

/// Flag values that are legal but almost certainly not what the operator meant.
pub fn validate_ranges(config: &super::WatchdogConfig) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if config.thresholds.min_clients == 0 {
        warnings.push(ValidationWarning {
            field: "thresholds.min_clients".to_string(),
            message: "thresholds.min_clients is 0; the WARNING verdict can never occur".to_string(),
            suggestion: None,
        });
    }

    if config.backoff.cooldown_minutes == 0 {
        warnings.push(ValidationWarning {
            field: "backoff.cooldown_minutes".to_string(),
            message: "backoff.cooldown_minutes is 0; every failing check may restart the service"
                .to_string(),
            suggestion: None,
        });
    }

    warnings
}

// ============================================================================
// Tests
// ============================================================================

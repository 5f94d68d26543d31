//! Watchdog Configuration Module
//!
//! Per-service configuration loaded from TOML, replacing the fixed constants
//! a one-off watchdog script would hardcode with operator-tunable values.
//!
//! ## Loading Order
//!
//! 1. `--config <path>` on the command line (hard error if it fails)
//! 2. `WATCHDOG_CONFIG` environment variable (path to TOML file)
//! 3. `watchdog.toml` in the current working directory
//! 4. Built-in defaults from [`defaults`]
//!
//! The loaded [`WatchdogConfig`] is passed explicitly into every component
//! at construction; nothing in the pipeline reads configuration globally.

mod watchdog_config;
pub mod defaults;
pub mod validation;

pub use watchdog_config::*;

//! Background services: the in-process check scheduler
//!
//! Runs watchdog passes on a fixed interval as a tokio task until
//! cancelled, for hosts without an external periodic trigger.

pub mod scheduler;

pub use scheduler::{run_pass, CheckScheduler};

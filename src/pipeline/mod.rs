//! Watchdog pipeline
//!
//! - `coordinator`: [`Watchdog`], one extract → classify → recover → report pass
//! - `reporter`: [`StatusReporter`], the best-effort snapshot writer

mod coordinator;
mod reporter;

pub use coordinator::{CheckReport, Watchdog};
pub use reporter::StatusReporter;

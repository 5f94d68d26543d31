//! Recovery module
//!
//! Entered only on a FAIL verdict. [`RestartBackoff`] decides whether a
//! restart is allowed; [`RecoveryActuator`] performs it through the injected
//! [`ServiceControl`](crate::control::ServiceControl).

mod actuator;
mod backoff;

pub use actuator::RecoveryActuator;
pub use backoff::RestartBackoff;

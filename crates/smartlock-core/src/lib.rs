pub mod action;
pub mod config;
pub mod daemon;
pub mod daemon_control;
pub mod enforcement;
pub mod error;
pub mod ipc;
pub mod model;
pub mod monitor;
pub mod policy;
pub mod probe;
#[cfg(any(target_os = "macos", target_os = "linux"))]
mod process;

pub use daemon::Daemon;
pub use enforcement::{EnforcementLoop, EnforcementStatus};
pub use error::{InvalidCommand, SmartlockError};
pub use model::{AppIdentifier, EnforcementState, Sample};
pub use policy::BlockPolicy;
pub use probe::ForegroundAppProbe;

//! Error taxonomy for the enforcement subsystem.
//!
//! None of these are fatal: probe failures degrade to an unknown sample,
//! action failures are logged, and invalid commands leave state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Command that is not valid in the current loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvalidCommand {
    /// `start` while a session is already running
    AlreadyRunning,
    /// `stop` while idle
    NotRunning,
    /// A blank application identifier in the block list
    EmptyIdentifier,
}

impl InvalidCommand {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::AlreadyRunning => "enforcement is already running",
            Self::NotRunning => "enforcement is not running",
            Self::EmptyIdentifier => "application identifiers must not be blank",
        }
    }
}

impl std::fmt::Display for InvalidCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Debug, Error)]
pub enum SmartlockError {
    /// The usage-tracking facility is denied, missing, or timed out
    #[error("usage data unavailable: {0}")]
    ProbeUnavailable(String),

    /// A platform side effect (redirect, notification) failed
    #[error("{action} failed: {reason}")]
    ActionSinkFailure {
        action: &'static str,
        reason: String,
    },

    #[error("invalid command: {0}")]
    InvalidCommand(InvalidCommand),
}

impl SmartlockError {
    #[must_use]
    pub fn probe(reason: impl Into<String>) -> Self {
        Self::ProbeUnavailable(reason.into())
    }

    #[must_use]
    pub fn action(action: &'static str, reason: impl Into<String>) -> Self {
        Self::ActionSinkFailure {
            action,
            reason: reason.into(),
        }
    }
}

impl From<InvalidCommand> for SmartlockError {
    fn from(command: InvalidCommand) -> Self {
        Self::InvalidCommand(command)
    }
}

pub type Result<T, E = SmartlockError> = std::result::Result<T, E>;

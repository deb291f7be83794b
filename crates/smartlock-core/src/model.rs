use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque token naming an installed application (bundle id, package name,
/// window class). Compared by exact string match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppIdentifier(String);

impl AppIdentifier {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for AppIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppIdentifier {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AppIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Result of one probe of the foreground application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sample {
    Active(AppIdentifier),
    /// No reliable recent activity, or the usage facility was unavailable
    Unknown,
}

impl Sample {
    #[must_use]
    pub fn app(&self) -> Option<&AppIdentifier> {
        match self {
            Self::Active(app) => Some(app),
            Self::Unknown => None,
        }
    }
}

/// One entry reported by the usage-tracking facility
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageRecord {
    pub app_id: AppIdentifier,
    pub last_used: DateTime<Utc>,
}

impl UsageRecord {
    #[must_use]
    pub fn new(app_id: impl Into<AppIdentifier>, last_used: DateTime<Utc>) -> Self {
        Self {
            app_id: app_id.into(),
            last_used,
        }
    }
}

/// Enforcement loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnforcementState {
    /// Not running
    Idle,
    /// Running, last sample did not match the block set
    Watching,
    /// Running, currently acting on a blocked foreground app
    Enforcing,
}

impl EnforcementState {
    #[must_use]
    pub const fn is_running(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Watching => "Watching",
            Self::Enforcing => "Enforcing",
        }
    }
}

use crate::error::Result;
use crate::model::UsageRecord;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

/// OS usage-tracking facility
///
/// Implementations only report what the platform knows; choosing the most
/// recent entry and applying the lookback window is the probe's job.
#[async_trait]
pub trait UsageSource: Send + Sync {
    /// Applications used between `window_start` and `window_end`, with the
    /// time each was last used
    ///
    /// # Errors
    ///
    /// Returns `SmartlockError::ProbeUnavailable` if the facility cannot be
    /// queried (permission denied, helper missing, timeout)
    async fn query_recent_foreground_app(
        &self,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>>;

    /// Whether usage data is currently readable
    async fn has_usage_access(&self) -> bool;

    /// Ask the platform to grant usage access (usually opens a settings pane)
    ///
    /// # Errors
    ///
    /// Returns an error if the request flow cannot be started
    async fn request_usage_access(&self) -> Result<()>;
}

/// Create platform-specific usage source
///
/// # Errors
///
/// Returns an error if the current platform is not supported
pub fn create_usage_source() -> anyhow::Result<Box<dyn UsageSource>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(macos::MacOSUsageSource::new()))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(Box::new(linux::LinuxUsageSource::new()))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        anyhow::bail!("Unsupported platform")
    }
}

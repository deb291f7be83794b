use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::UsageSource;
use crate::error::{Result, SmartlockError};
use crate::model::UsageRecord;
use crate::process;

/// Active window class on X11, read through `xdotool`
///
/// X11 keeps no usage history; the active window's class is reported as used
/// at the end of the query window.
pub struct LinuxUsageSource;

impl LinuxUsageSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn has_display() -> bool {
        std::env::var_os("DISPLAY").is_some_and(|d| !d.is_empty())
    }
}

impl Default for LinuxUsageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageSource for LinuxUsageSource {
    async fn query_recent_foreground_app(
        &self,
        _window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>> {
        if !Self::has_display() {
            return Err(SmartlockError::probe("no X11 display"));
        }

        let class = process::run("xdotool", &["getactivewindow", "getwindowclassname"])
            .await
            .map_err(SmartlockError::probe)?;

        if class.is_empty() {
            return Ok(Vec::new());
        }

        Ok(vec![UsageRecord::new(class, window_end)])
    }

    async fn has_usage_access(&self) -> bool {
        Self::has_display() && process::run("xdotool", &["getactivewindow"]).await.is_ok()
    }

    async fn request_usage_access(&self) -> Result<()> {
        // No grant flow on X11: access depends only on the session and tooling
        if self.has_usage_access().await {
            log::info!("Usage access already available");
            return Ok(());
        }
        Err(SmartlockError::probe(
            "an X11 session with xdotool installed is required",
        ))
    }
}

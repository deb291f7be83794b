use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::UsageSource;
use crate::error::{Result, SmartlockError};
use crate::model::UsageRecord;
use crate::process;

// Bundle identifier of the frontmost process, via System Events
const FRONTMOST_SCRIPT: &str = r#"
    tell application "System Events"
        set frontProc to first application process whose frontmost is true
        return bundle identifier of frontProc
    end tell
"#;

const ACCESS_CHECK_SCRIPT: &str =
    r#"tell application "System Events" to get name of first application process"#;

const AUTOMATION_SETTINGS_URL: &str =
    "x-apple.systempreferences:com.apple.preference.security?Privacy_Automation";

/// Frontmost application on macOS
///
/// macOS has no queryable usage history without private APIs, so the
/// frontmost app is reported as used "now".
pub struct MacOSUsageSource;

impl MacOSUsageSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacOSUsageSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UsageSource for MacOSUsageSource {
    async fn query_recent_foreground_app(
        &self,
        _window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> Result<Vec<UsageRecord>> {
        let bundle_id = process::run("osascript", &["-e", FRONTMOST_SCRIPT])
            .await
            .map_err(SmartlockError::probe)?;

        // "missing value" is what AppleScript prints for apps without a bundle
        if bundle_id.is_empty() || bundle_id == "missing value" {
            return Ok(Vec::new());
        }

        Ok(vec![UsageRecord::new(bundle_id, window_end)])
    }

    async fn has_usage_access(&self) -> bool {
        process::run("osascript", &["-e", ACCESS_CHECK_SCRIPT])
            .await
            .is_ok()
    }

    async fn request_usage_access(&self) -> Result<()> {
        log::info!("Opening Automation privacy settings");
        process::run("open", &[AUTOMATION_SETTINGS_URL])
            .await
            .map(|_| ())
            .map_err(SmartlockError::probe)
    }
}

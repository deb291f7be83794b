use async_trait::async_trait;

use super::{NeutralContext, Notification, Notifier};
use crate::error::{Result, SmartlockError};
use crate::process;

/// Brings Finder to the front, displacing the blocked app
pub struct FinderRedirect;

#[async_trait]
impl NeutralContext for FinderRedirect {
    async fn bring_user_to_neutral_context(&self) -> Result<()> {
        process::run("osascript", &["-e", r#"tell application "Finder" to activate"#])
            .await
            .map(|_| ())
            .map_err(|e| SmartlockError::action("redirect", e))
    }
}

/// Notification Center via `display notification`
///
/// AppleScript notifications have no urgency levels; urgency is ignored.
pub struct OsaNotifier;

#[async_trait]
impl Notifier for OsaNotifier {
    async fn raise_notification(&self, notification: &Notification) -> Result<()> {
        let script = format!(
            "display notification {} with title {}",
            applescript_string(&notification.body),
            applescript_string(&notification.title)
        );
        process::run("osascript", &["-e", &script])
            .await
            .map(|_| ())
            .map_err(|e| SmartlockError::action("notification", e))
    }
}

/// Quote a value as an AppleScript string literal
fn applescript_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

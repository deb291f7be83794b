use async_trait::async_trait;

use super::{NeutralContext, Notification, Notifier, Urgency};
use crate::error::{Result, SmartlockError};
use crate::process;

/// EWMH "show desktop" through `wmctrl`
pub struct ShowDesktop;

#[async_trait]
impl NeutralContext for ShowDesktop {
    async fn bring_user_to_neutral_context(&self) -> Result<()> {
        process::run("wmctrl", &["-k", "on"])
            .await
            .map(|_| ())
            .map_err(|e| SmartlockError::action("redirect", e))
    }
}

/// Desktop notifications through `notify-send`
pub struct NotifySend;

const fn urgency_arg(urgency: Urgency) -> &'static str {
    match urgency {
        Urgency::Low => "low",
        Urgency::Normal => "normal",
        Urgency::High => "critical",
    }
}

#[async_trait]
impl Notifier for NotifySend {
    async fn raise_notification(&self, notification: &Notification) -> Result<()> {
        process::run(
            "notify-send",
            &[
                "-u",
                urgency_arg(notification.urgency),
                "-a",
                "smartlock",
                &notification.title,
                &notification.body,
            ],
        )
        .await
        .map(|_| ())
        .map_err(|e| SmartlockError::action("notification", e))
    }
}

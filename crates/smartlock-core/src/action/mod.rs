use crate::error::Result;
use crate::model::AppIdentifier;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "linux")]
pub mod linux;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    Low,
    Normal,
    High,
}

/// User-visible alert
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub urgency: Urgency,
}

impl Notification {
    #[must_use]
    pub fn blocked(app: &AppIdentifier) -> Self {
        Self {
            title: String::from("App Blocked"),
            body: format!("{app} is blocked during focus time"),
            urgency: Urgency::High,
        }
    }

    #[must_use]
    pub fn session_started(blocked_count: usize) -> Self {
        let noun = if blocked_count == 1 { "app" } else { "apps" };
        Self {
            title: String::from("Focus Mode Active"),
            body: format!("Blocking {blocked_count} {noun}"),
            urgency: Urgency::Low,
        }
    }
}

/// Moves the user away from the current foreground application
#[async_trait]
pub trait NeutralContext: Send + Sync {
    /// # Errors
    ///
    /// Returns `SmartlockError::ActionSinkFailure` if the platform refused
    async fn bring_user_to_neutral_context(&self) -> Result<()>;
}

#[async_trait]
pub trait Notifier: Send + Sync {
    /// # Errors
    ///
    /// Returns `SmartlockError::ActionSinkFailure` if the notification was
    /// rejected
    async fn raise_notification(&self, notification: &Notification) -> Result<()>;
}

/// Side effects driven by the enforcement loop on state transitions
#[async_trait]
pub trait ActionSink: Send + Sync {
    /// Called once per transition into the enforcing state
    async fn on_violation(&self, app: &AppIdentifier);

    /// Called once after a session starts
    async fn on_session_start(&self, _blocked_count: usize) {}
}

/// Redirect + notify, each best-effort and independent of the other
pub struct PlatformActionSink {
    neutral: Arc<dyn NeutralContext>,
    notifier: Arc<dyn Notifier>,
    session_notice: bool,
}

impl PlatformActionSink {
    #[must_use]
    pub fn new(
        neutral: Arc<dyn NeutralContext>,
        notifier: Arc<dyn Notifier>,
        session_notice: bool,
    ) -> Self {
        Self {
            neutral,
            notifier,
            session_notice,
        }
    }
}

#[async_trait]
impl ActionSink for PlatformActionSink {
    async fn on_violation(&self, app: &AppIdentifier) {
        log::info!("Blocked app in foreground: {app}");

        if let Err(e) = self.neutral.bring_user_to_neutral_context().await {
            log::error!("Failed to redirect away from {app}: {e}");
        }

        if let Err(e) = self
            .notifier
            .raise_notification(&Notification::blocked(app))
            .await
        {
            log::error!("Failed to notify about {app}: {e}");
        }
    }

    async fn on_session_start(&self, blocked_count: usize) {
        if !self.session_notice {
            return;
        }
        if let Err(e) = self
            .notifier
            .raise_notification(&Notification::session_started(blocked_count))
            .await
        {
            log::warn!("Failed to raise session notice: {e}");
        }
    }
}

/// Create the platform action sink
///
/// # Errors
///
/// Returns an error if the current platform is not supported
pub fn create_action_sink(session_notice: bool) -> anyhow::Result<PlatformActionSink> {
    #[cfg(target_os = "macos")]
    {
        Ok(PlatformActionSink::new(
            Arc::new(macos::FinderRedirect),
            Arc::new(macos::OsaNotifier),
            session_notice,
        ))
    }

    #[cfg(target_os = "linux")]
    {
        Ok(PlatformActionSink::new(
            Arc::new(linux::ShowDesktop),
            Arc::new(linux::NotifySend),
            session_notice,
        ))
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        let _ = session_notice;
        anyhow::bail!("Unsupported platform")
    }
}

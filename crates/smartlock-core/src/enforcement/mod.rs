//! Periodic monitoring-and-enforcement loop.
//!
//! One [`EnforcementLoop`] owns at most one running session: a spawned task
//! that consumes a [`Ticker`], samples the foreground app, and feeds the
//! [`Enforcer`] state machine. The state machine and the action sink call are
//! guarded by one lock, which is also what `stop` waits on; once `stop`
//! returns, no tick can reach the sink again.


mod state;
mod ticker;

pub use state::{EnforcementStatus, Enforcer};
pub use ticker::Ticker;

use crate::action::ActionSink;
use crate::error::{InvalidCommand, Result};
use crate::model::EnforcementState;
use crate::policy::BlockPolicy;
use crate::probe::ForegroundAppProbe;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Default tick period
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs at most one enforcement session at a time.
///
/// `start` and `stop` may be called from any task; both are serialized
/// against each other and against tick execution.
pub struct EnforcementLoop {
    probe: Arc<ForegroundAppProbe>,
    sink: Arc<dyn ActionSink>,
    period: Duration,
    enforcer: Arc<Mutex<Enforcer>>,
    session: Mutex<Option<Session>>,
}

impl EnforcementLoop {
    #[must_use]
    pub fn new(probe: Arc<ForegroundAppProbe>, sink: Arc<dyn ActionSink>, period: Duration) -> Self {
        Self {
            probe,
            sink,
            period,
            enforcer: Arc::new(Mutex::new(Enforcer::idle())),
            session: Mutex::new(None),
        }
    }

    /// Start enforcing `policy`, ticking every `period`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand::AlreadyRunning` if a session is active; the
    /// running session is left untouched.
    pub async fn start(&self, policy: BlockPolicy) -> Result<()> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Err(InvalidCommand::AlreadyRunning.into());
        }

        let blocked_count = policy.len();
        if !self.enforcer.lock().await.start(policy, chrono::Utc::now()) {
            return Err(InvalidCommand::AlreadyRunning.into());
        }

        // Session notice goes out before the first tick can raise a violation
        self.sink.on_session_start(blocked_count).await;

        let cancel = CancellationToken::new();
        let ticker = Ticker::new(self.period, cancel.clone());
        let handle = tokio::spawn(run_session(
            ticker,
            cancel.clone(),
            Arc::clone(&self.probe),
            Arc::clone(&self.sink),
            Arc::clone(&self.enforcer),
        ));
        *session = Some(Session { cancel, handle });

        log::info!(
            "Enforcement started: blocking {blocked_count} apps every {}ms",
            self.period.as_millis()
        );
        Ok(())
    }

    /// Stop the running session and wait for any in-flight tick to finish.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand::NotRunning` if idle; nothing changes.
    pub async fn stop(&self) -> Result<()> {
        let mut session = self.session.lock().await;
        let Some(Session { cancel, handle }) = session.take() else {
            return Err(InvalidCommand::NotRunning.into());
        };

        cancel.cancel();
        // Waits out a tick holding the lock; later ticks see the cancellation.
        self.enforcer.lock().await.stop();

        if let Err(e) = handle.await {
            log::error!("Enforcement task ended abnormally: {e}");
        }
        log::info!("Enforcement stopped");
        Ok(())
    }

    pub async fn state(&self) -> EnforcementState {
        self.enforcer.lock().await.state()
    }

    pub async fn status(&self) -> EnforcementStatus {
        self.enforcer.lock().await.status()
    }

    pub async fn is_running(&self) -> bool {
        self.session.lock().await.is_some()
    }

    #[must_use]
    pub fn probe(&self) -> &Arc<ForegroundAppProbe> {
        &self.probe
    }
}

async fn run_session(
    mut ticker: Ticker,
    cancel: CancellationToken,
    probe: Arc<ForegroundAppProbe>,
    sink: Arc<dyn ActionSink>,
    enforcer: Arc<Mutex<Enforcer>>,
) {
    while ticker.next().await.is_some() {
        tick(&cancel, &probe, sink.as_ref(), &enforcer).await;
    }
    log::debug!("Enforcement ticker finished");
}

async fn tick(
    cancel: &CancellationToken,
    probe: &ForegroundAppProbe,
    sink: &dyn ActionSink,
    enforcer: &Mutex<Enforcer>,
) {
    let sample = probe.sample().await;

    let mut enforcer = enforcer.lock().await;
    if cancel.is_cancelled() {
        return;
    }

    log::debug!("Sample: {sample:?} ({})", enforcer.state().description());
    if let Some(app) = enforcer.observe(sample) {
        // Lock stays held so `stop` cannot complete mid-action
        sink.on_violation(&app).await;
    }
}

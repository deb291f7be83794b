use crate::{
    action::{create_action_sink, ActionSink},
    config::Config,
    enforcement::EnforcementLoop,
    ipc::{listen, DaemonIpcHandler},
    monitor::{create_usage_source, UsageSource},
    probe::ForegroundAppProbe,
};
use anyhow::Result;
use std::{path::Path, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

/// Long-running host for one enforcement loop and its command socket
pub struct Daemon {
    enforcement: Arc<EnforcementLoop>,
    ipc_handler: Arc<DaemonIpcHandler>,
    shutdown_signal: CancellationToken,
}

impl Daemon {
    /// Build a daemon wired to the platform collaborators
    ///
    /// # Errors
    ///
    /// Returns an error if the platform is unsupported
    pub fn new(config: &Config) -> Result<Self> {
        let source: Arc<dyn UsageSource> = Arc::from(create_usage_source()?);
        let probe = Arc::new(ForegroundAppProbe::new(
            source,
            config.enforcement.lookback(),
        ));
        let sink = Arc::new(create_action_sink(config.notifications.session_notice)?);

        Ok(Self::with_components(
            probe,
            sink,
            config.enforcement.tick_interval(),
        ))
    }

    #[must_use]
    pub fn with_components(
        probe: Arc<ForegroundAppProbe>,
        sink: Arc<dyn ActionSink>,
        tick_interval: Duration,
    ) -> Self {
        let shutdown_signal = CancellationToken::new();
        let enforcement = Arc::new(EnforcementLoop::new(probe, sink, tick_interval));

        Self {
            ipc_handler: Arc::new(DaemonIpcHandler::new(
                Arc::clone(&enforcement),
                shutdown_signal.clone(),
            )),
            enforcement,
            shutdown_signal,
        }
    }

    #[must_use]
    pub fn enforcement(&self) -> &Arc<EnforcementLoop> {
        &self.enforcement
    }

    /// Serve commands on `sock_path` until Ctrl-C or a `Shutdown` request
    pub async fn run_with_signals(&self, sock_path: &Path) -> Result<()> {
        let ipc_handler = self.ipc_handler.clone();
        let listen_path = sock_path.to_path_buf();

        let listener = tokio::spawn(async move {
            if let Err(e) = listen(ipc_handler, &listen_path).await {
                log::error!("IPC listener failed: {e}");
            }
        });

        log::info!("Daemon started, listening on {}", sock_path.display());

        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    log::error!("Failed to listen for Ctrl-C: {e}");
                }
                log::info!("Received Ctrl-C, shutting down...");
            }
            () = self.shutdown_signal.cancelled() => {
                log::info!("Shutdown requested, shutting down...");
            }
        }

        // Stop enforcing before the command surface disappears
        if self.enforcement.is_running().await {
            if let Err(e) = self.enforcement.stop().await {
                log::warn!("Failed to stop enforcement: {e}");
            }
        }
        listener.abort();

        if sock_path.exists() {
            std::fs::remove_file(sock_path)?;
        }

        log::info!("Daemon shut down gracefully.");
        Ok(())
    }
}

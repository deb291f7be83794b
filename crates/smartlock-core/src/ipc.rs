use crate::enforcement::{EnforcementLoop, EnforcementStatus};
use crate::error::{InvalidCommand, SmartlockError};
use crate::policy::BlockPolicy;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{UnixListener, UnixStream},
};
use tokio_util::sync::CancellationToken;

/// Largest request the daemon will read
pub const MAX_REQUEST_BYTES: u64 = 64 * 1024;

/// IPC request from CLI to daemon
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum IpcRequest {
    Start { blocked_apps: Vec<String> },
    Stop,
    Status,
    CurrentApp,
    UsageAccess,
    RequestUsageAccess,
    Shutdown,
}

/// IPC response from daemon to CLI
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum IpcResponse {
    Started { blocked: usize },
    Stopped,
    /// Command not valid in the current state; nothing changed
    Rejected { reason: InvalidCommand },
    Status(EnforcementStatus),
    CurrentApp(Option<String>),
    UsageAccess(bool),
    AccessRequested,
    Failed { message: String },
    Shutdown,
}

impl From<SmartlockError> for IpcResponse {
    fn from(err: SmartlockError) -> Self {
        match err {
            SmartlockError::InvalidCommand(reason) => Self::Rejected { reason },
            other @ (SmartlockError::ProbeUnavailable(_)
            | SmartlockError::ActionSinkFailure { .. }) => Self::Failed {
                message: other.to_string(),
            },
        }
    }
}

#[derive(Debug)]
pub struct IpcClient {
    sock_path: PathBuf,
}

impl IpcClient {
    #[must_use]
    pub fn new(sock_path: &Path) -> Self {
        Self {
            sock_path: sock_path.to_path_buf(),
        }
    }

    pub async fn send_command(&self, request: IpcRequest) -> Result<IpcResponse> {
        let mut stream = UnixStream::connect(&self.sock_path).await?;

        let encoded = bincode::serialize(&request)?;
        stream.write_all(&encoded).await?;
        stream.shutdown().await?;

        let mut buffer = Vec::new();
        stream.read_to_end(&mut buffer).await?;
        let response: IpcResponse = bincode::deserialize(&buffer)?;

        Ok(response)
    }
}

/// Command dispatcher in front of the enforcement loop
pub struct DaemonIpcHandler {
    enforcement: Arc<EnforcementLoop>,
    shutdown_signal: CancellationToken,
}

impl DaemonIpcHandler {
    #[must_use]
    pub fn new(enforcement: Arc<EnforcementLoop>, shutdown_signal: CancellationToken) -> Self {
        Self {
            enforcement,
            shutdown_signal,
        }
    }

    pub async fn dispatch(&self, request: IpcRequest) -> IpcResponse {
        match request {
            IpcRequest::Start { blocked_apps } => {
                let policy = match BlockPolicy::from_apps(blocked_apps) {
                    Ok(policy) => policy,
                    Err(reason) => return IpcResponse::Rejected { reason },
                };
                let blocked = policy.len();
                match self.enforcement.start(policy).await {
                    Ok(()) => IpcResponse::Started { blocked },
                    Err(e) => {
                        log::warn!("Start ignored: {e}");
                        e.into()
                    }
                }
            }
            IpcRequest::Stop => match self.enforcement.stop().await {
                Ok(()) => IpcResponse::Stopped,
                Err(e) => {
                    log::debug!("Stop ignored: {e}");
                    e.into()
                }
            },
            IpcRequest::Status => IpcResponse::Status(self.enforcement.status().await),
            IpcRequest::CurrentApp => {
                let sample = self.enforcement.probe().sample().await;
                IpcResponse::CurrentApp(sample.app().map(|app| app.as_str().to_string()))
            }
            IpcRequest::UsageAccess => {
                IpcResponse::UsageAccess(self.enforcement.probe().source().has_usage_access().await)
            }
            IpcRequest::RequestUsageAccess => {
                match self.enforcement.probe().source().request_usage_access().await {
                    Ok(()) => IpcResponse::AccessRequested,
                    Err(e) => IpcResponse::Failed {
                        message: e.to_string(),
                    },
                }
            }
            IpcRequest::Shutdown => {
                self.shutdown_signal.cancel();
                IpcResponse::Shutdown
            }
        }
    }

    pub async fn handle(
        &self,
        stream: &mut UnixStream,
        request: IpcRequest,
    ) -> Result<(), anyhow::Error> {
        let response = self.dispatch(request).await;
        let encoded = bincode::serialize(&response)?;
        stream.write_all(&encoded).await?;
        Ok(())
    }
}

pub async fn listen(handler: Arc<DaemonIpcHandler>, sock_path: &Path) -> io::Result<()> {
    if sock_path.exists() {
        fs::remove_file(sock_path)?;
    }
    let listener = UnixListener::bind(sock_path)?;

    loop {
        match listener.accept().await {
            Ok((stream, _)) => {
                tokio::spawn(serve_connection(handler.clone(), stream));
            }
            Err(e) => {
                log::error!("IPC accept error: {e}");
            }
        }
    }
}

async fn serve_connection(handler: Arc<DaemonIpcHandler>, mut stream: UnixStream) {
    let mut buf = Vec::new();
    // One byte past the cap tells an oversized request from one that fits exactly
    let read = (&mut stream)
        .take(MAX_REQUEST_BYTES + 1)
        .read_to_end(&mut buf)
        .await;

    match read {
        Ok(0) => {} // Connection closed
        Ok(n) if n as u64 > MAX_REQUEST_BYTES => {
            log::warn!("IPC request dropped: larger than {MAX_REQUEST_BYTES} bytes");
        }
        Ok(_) => match bincode::deserialize::<IpcRequest>(&buf) {
            Ok(request) => {
                if let Err(e) = handler.handle(&mut stream, request).await {
                    log::error!("IPC handle error: {e}");
                }
            }
            Err(e) => {
                log::error!("IPC deserialize error: {e}");
            }
        },
        Err(e) => {
            log::error!("IPC read error: {e}");
        }
    }
}

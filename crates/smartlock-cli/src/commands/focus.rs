/// Focus session commands, forwarded to the daemon over IPC
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use smartlock_core::{
    config::Config,
    daemon_control::DaemonControl,
    ipc::{IpcClient, IpcRequest, IpcResponse},
    EnforcementStatus, Sample,
};

async fn send(control: &DaemonControl, request: IpcRequest) -> Result<IpcResponse> {
    let sock_path = control.sock_path();
    if !sock_path.exists() {
        anyhow::bail!("Daemon is not running. Start it with `smartlock start`.");
    }
    IpcClient::new(&sock_path)
        .send_command(request)
        .await
        .context("Daemon is not responding")
}

fn unexpected(response: &IpcResponse) -> anyhow::Error {
    anyhow::anyhow!("Unexpected response from daemon: {response:?}")
}

pub async fn block_apps(control: &DaemonControl, apps: Vec<String>) -> Result<()> {
    match send(control, IpcRequest::Start { blocked_apps: apps }).await? {
        IpcResponse::Started { blocked } => {
            println!("Focus mode on: blocking {blocked} app(s)");
            Ok(())
        }
        IpcResponse::Rejected { reason } => {
            println!("Not started: {reason}");
            Ok(())
        }
        other => Err(unexpected(&other)),
    }
}

pub async fn unblock_apps(control: &DaemonControl) -> Result<()> {
    match send(control, IpcRequest::Stop).await? {
        IpcResponse::Stopped => {
            println!("Focus mode off");
            Ok(())
        }
        IpcResponse::Rejected { reason } => {
            println!("Nothing to stop: {reason}");
            Ok(())
        }
        other => Err(unexpected(&other)),
    }
}

pub async fn show_status(control: &DaemonControl, json: bool) -> Result<()> {
    if !control.sock_path().exists() {
        println!("Daemon Status: Not running");
        return Ok(());
    }

    match send(control, IpcRequest::Status).await {
        Ok(IpcResponse::Status(status)) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&status)?);
            } else {
                print_status(&status);
            }
            Ok(())
        }
        Ok(other) => Err(unexpected(&other)),
        Err(e) => {
            log::error!("Failed to get status: {e:#}");
            println!("Daemon Status: Not running (or not responding)");
            Ok(())
        }
    }
}

fn print_status(status: &EnforcementStatus) {
    println!("Daemon Status: Running");
    println!("Focus Mode: {}", status.state.description());

    if !status.state.is_running() {
        return;
    }

    println!("\nBlocked Apps:");
    for app in &status.blocked_apps {
        println!("  {app}");
    }

    let current = match &status.last_sample {
        Some(Sample::Active(app)) => app.to_string(),
        Some(Sample::Unknown) => String::from("Unknown"),
        None => String::from("None"),
    };
    println!("\nForeground App: {current}");
    println!("Violations: {}", status.violations);

    if let Some(started_at) = status.started_at {
        let elapsed = elapsed_seconds(started_at, Utc::now());
        let hours = elapsed / 3600;
        let minutes = (elapsed % 3600) / 60;
        let seconds = elapsed % 60;
        println!("Session Duration: {hours:02}:{minutes:02}:{seconds:02}");
    }
}

/// Whole seconds from `since` to `now`, clamped at zero
fn elapsed_seconds(since: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    u64::try_from(now.signed_duration_since(since).num_seconds()).unwrap_or(0)
}

pub async fn show_current_app(control: &DaemonControl) -> Result<()> {
    match send(control, IpcRequest::CurrentApp).await? {
        IpcResponse::CurrentApp(Some(app)) => println!("{app}"),
        IpcResponse::CurrentApp(None) => println!("Unknown"),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

pub async fn show_access(control: &DaemonControl, request: bool) -> Result<()> {
    let request = if request {
        IpcRequest::RequestUsageAccess
    } else {
        IpcRequest::UsageAccess
    };

    match send(control, request).await? {
        IpcResponse::UsageAccess(true) => println!("Usage access: granted"),
        IpcResponse::UsageAccess(false) => {
            println!("Usage access: not granted (run `smartlock access --request`)");
        }
        IpcResponse::AccessRequested => println!("Usage access requested"),
        IpcResponse::Failed { message } => println!("Usage access unavailable: {message}"),
        other => return Err(unexpected(&other)),
    }
    Ok(())
}

pub fn show_config() -> Result<()> {
    let path = Config::default_path()?;
    let config = Config::load(&path)?;

    println!("# {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}

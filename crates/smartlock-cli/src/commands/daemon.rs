/// Daemon lifecycle management commands
use anyhow::{Context, Result};
use smartlock_core::{
    config::Config,
    daemon_control::DaemonControl,
    ipc::{IpcClient, IpcRequest, IpcResponse},
    Daemon,
};
use std::{env, process::Command, time::Duration};
use sysinfo::{Pid, System};

fn is_alive(pid: u32) -> bool {
    let mut sys = System::new();
    sys.refresh_process(Pid::from_u32(pid))
}

pub fn start_daemon(control: &DaemonControl) -> Result<()> {
    // 1. Check if daemon is already running
    match control.get_pid() {
        Ok(Some(pid)) if is_alive(pid) => {
            log::info!("Daemon is already running (PID: {pid}).");
            return Ok(());
        }
        Ok(Some(_)) | Err(_) => {
            log::warn!("Removing stale PID file.");
            control.remove_pid()?;
        }
        Ok(None) => {}
    }

    // 2. Clean up old socket if it exists
    if control.sock_path().exists() {
        log::warn!("Removing stale socket file.");
        control.remove_socket()?;
    }

    // Fail here, where the user can see it, rather than in the detached child
    Config::load_default()?;

    log::info!("Starting smartlock daemon...");

    // 3. Spawn a new process for the daemon
    let current_exe = env::current_exe()?;
    let current_dir = env::current_dir()?;
    let child = Command::new(current_exe)
        .arg("daemon-internal-start")
        .current_dir(current_dir)
        .spawn()?;

    // 4. In parent process, write PID and exit
    log::info!("Daemon process started with PID: {}", child.id());
    control.write_pid(child.id())?;

    Ok(())
}

pub async fn run_daemon_process(control: &DaemonControl) -> Result<()> {
    // Detached process: logging goes to the log file instead of the terminal
    setup_daemon_logging(control).context("Failed to set up daemon logging")?;
    log::info!("Daemon process started internally.");

    let result = daemon_main_logic(control).await;
    if let Err(e) = &result {
        log::error!("Daemon main logic exited with a fatal error: {e:#}");
    }

    if let Err(e) = control.remove_pid() {
        log::warn!("Failed to remove PID file: {e}");
    }
    result
}

async fn daemon_main_logic(control: &DaemonControl) -> Result<()> {
    let config = Config::load_default()?;
    let daemon = Daemon::new(&config)?;
    daemon.run_with_signals(&control.sock_path()).await
}

pub async fn stop_daemon(control: &DaemonControl) -> Result<()> {
    let Some(pid) = control.get_pid()? else {
        log::info!("Daemon is not running (no PID file).");
        // Also remove socket if it exists for consistency
        control.remove_socket()?;
        return Ok(());
    };

    log::info!("Stopping smartlock daemon (PID: {pid})...");
    let client = IpcClient::new(&control.sock_path());

    match client.send_command(IpcRequest::Shutdown).await {
        Ok(IpcResponse::Shutdown) => {
            log::info!("Daemon shutdown signal sent. Waiting for process to exit...");
            tokio::time::sleep(Duration::from_secs(2)).await;

            if is_alive(pid) {
                log::warn!("Daemon did not stop gracefully. Force killing...");
                kill(pid);
            } else {
                log::info!("Daemon stopped successfully.");
            }
        }
        Ok(resp) => log::error!("Received unexpected response from daemon: {resp:?}"),
        Err(e) => {
            log::error!("Failed to send shutdown command: {e}. Forcing cleanup.");
            if is_alive(pid) {
                kill(pid);
                log::info!("Process killed.");
            }
        }
    }

    // Cleanup
    control.remove_pid()?;
    control.remove_socket()?;

    Ok(())
}

fn kill(pid: u32) {
    let mut sys = System::new();
    let pid = Pid::from_u32(pid);
    if sys.refresh_process(pid) {
        if let Some(process) = sys.process(pid) {
            process.kill();
        }
    }
}

fn setup_daemon_logging(control: &DaemonControl) -> Result<()> {
    use std::fs::{create_dir_all, OpenOptions};

    let log_path = control.log_path();

    if let Some(parent) = log_path.parent() {
        create_dir_all(parent)?;
    }

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter_level(log::LevelFilter::Debug)
        .init();

    Ok(())
}


use std::time::Duration;
use tokio::process::Command;

/// Upper bound for any external helper (osascript, xdotool, notify-send)
pub const COMMAND_TIMEOUT: Duration = Duration::from_secs(3);

/// Run a helper program and return its trimmed stdout.
///
/// A spawn failure, a non-zero exit, or exceeding `COMMAND_TIMEOUT` are all
/// reported as an error message suitable for the error taxonomy.
pub async fn run(program: &str, args: &[&str]) -> Result<String, String> {
    let mut command = Command::new(program);
    command.args(args).kill_on_drop(true);

    let output = match tokio::time::timeout(COMMAND_TIMEOUT, command.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => return Err(format!("{program}: {e}")),
        Err(_) => {
            return Err(format!(
                "{program}: timed out after {}s",
                COMMAND_TIMEOUT.as_secs()
            ))
        }
    };

    if output.status.success() {
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!("{program}: {} {}", output.status, stderr.trim()))
    }
}

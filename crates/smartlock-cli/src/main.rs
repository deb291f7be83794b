mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{
    daemon::{run_daemon_process, start_daemon, stop_daemon},
    focus::{block_apps, show_access, show_config, show_current_app, show_status, unblock_apps},
};
use smartlock_core::{config::get_data_dir, daemon_control::DaemonControl};

#[derive(Parser)]
#[command(name = "smartlock")]
#[command(about = "Focus mode: keep blocked apps out of the foreground", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the background daemon
    Start,
    /// (Internal) Run the daemon process
    #[command(hide = true)]
    DaemonInternalStart,
    /// Stop the background daemon
    Stop,
    /// Start a focus session blocking the given applications
    Block {
        /// Application identifiers (bundle id on macOS, window class on X11)
        #[arg(required = true)]
        apps: Vec<String>,
    },
    /// End the current focus session
    Unblock,
    /// Show the focus session state
    Status {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the application currently in the foreground
    Current,
    /// Check whether usage data is readable
    Access {
        /// Open the system flow that grants access
        #[arg(long)]
        request: bool,
    },
    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if !matches!(cli.command, Commands::DaemonInternalStart) {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_secs()
            .init();
    }

    let control = DaemonControl::new(&get_data_dir()?);

    match cli.command {
        Commands::Start => start_daemon(&control),
        Commands::DaemonInternalStart => run_daemon_process(&control).await,
        Commands::Stop => stop_daemon(&control).await,
        Commands::Block { apps } => block_apps(&control, apps).await,
        Commands::Unblock => unblock_apps(&control).await,
        Commands::Status { json } => show_status(&control, json).await,
        Commands::Current => show_current_app(&control).await,
        Commands::Access { request } => show_access(&control, request).await,
        Commands::Config => show_config(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_block_requires_apps() {
        assert!(Cli::try_parse_from(["smartlock", "block"]).is_err());

        let cli = Cli::try_parse_from(["smartlock", "block", "com.games.x", "firefox"]).unwrap();
        match cli.command {
            Commands::Block { apps } => assert_eq!(apps, vec!["com.games.x", "firefox"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_status_json_flag() {
        let cli = Cli::try_parse_from(["smartlock", "status", "--json"]).unwrap();
        assert!(matches!(cli.command, Commands::Status { json: true }));
    }
}

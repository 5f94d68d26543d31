//! heartbeat-watchdog - log-heartbeat health watchdog
//!
//! # Usage
//!
//! ```bash
//! # One pass (cron / systemd timer)
//! heartbeat-watchdog check
//!
//! # Replay a captured log instead of querying journald, without restarting
//! heartbeat-watchdog --dry-run check --log-file captured.log
//!
//! # Long-running: pass every schedule.interval_secs, plus the status viewer
//! heartbeat-watchdog run --serve
//!
//! # Only the status viewer
//! heartbeat-watchdog serve --addr 127.0.0.1:8080
//! ```
//!
//! # Environment Variables
//!
//! - `WATCHDOG_CONFIG`: path to the TOML config (default: `./watchdog.toml`)
//! - `RUST_LOG`: logging level (default: info)

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use heartbeat_watchdog::acquisition::{JournalctlSource, LogSource, StaticLogSource};
use heartbeat_watchdog::api::{spawn_viewer, ViewerState};
use heartbeat_watchdog::background::{run_pass, CheckScheduler};
use heartbeat_watchdog::config::WatchdogConfig;
use heartbeat_watchdog::control::{DryRunControl, ServiceControl, SystemctlControl};
use heartbeat_watchdog::storage::StatusStore;
use heartbeat_watchdog::Watchdog;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "heartbeat-watchdog")]
#[command(about = "Log-heartbeat health watchdog with rate-limited service recovery")]
#[command(version)]
struct CliArgs {
    /// Config file (overrides WATCHDOG_CONFIG and ./watchdog.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log the restart instead of performing it
    #[arg(long, global = true)]
    dry_run: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Run a single watchdog pass (default)
    Check {
        /// Read log lines from this file instead of journald
        #[arg(long, value_name = "PATH")]
        log_file: Option<PathBuf>,
    },

    /// Run passes every `schedule.interval_secs` until Ctrl+C
    Run {
        /// Also serve the status viewer
        #[arg(long)]
        serve: bool,
    },

    /// Serve the status viewer only
    Serve {
        /// Bind address (default: viewer.addr)
        #[arg(long, value_name = "HOST:PORT")]
        addr: Option<SocketAddr>,
    },

    /// Print the current status snapshot as JSON
    Status,

    /// Print the effective configuration as TOML
    PrintConfig,
}

// ============================================================================
// Setup
// ============================================================================

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(args: &CliArgs) -> Result<WatchdogConfig> {
    let mut config = match &args.config {
        Some(path) => WatchdogConfig::load_from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => WatchdogConfig::load(),
    };
    if args.dry_run {
        config.recovery.dry_run = true;
    }
    Ok(config)
}

fn service_control(config: &WatchdogConfig) -> Arc<dyn ServiceControl> {
    if config.recovery.dry_run {
        Arc::new(DryRunControl)
    } else {
        Arc::new(SystemctlControl::new(config.commands.systemctl.clone()))
    }
}

fn journal_source(config: &WatchdogConfig) -> Arc<dyn LogSource> {
    Arc::new(JournalctlSource::new(config.commands.journalctl.clone()))
}

fn shutdown_token() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let shutdown = cancel_token.clone();
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received Ctrl+C, shutting down");
        shutdown.cancel();
    });
    cancel_token
}

// ============================================================================
// Subcommands
// ============================================================================

async fn run_check(config: &WatchdogConfig, log_file: Option<PathBuf>) -> Result<()> {
    let source: Arc<dyn LogSource> = match log_file {
        Some(path) => Arc::new(
            StaticLogSource::from_file(&path)
                .with_context(|| format!("Failed to read log file {}", path.display()))?,
        ),
        None => journal_source(config),
    };
    let watchdog = Watchdog::from_config(config, source, service_control(config));

    if let Some(report) = run_pass(&watchdog, config.storage.lock_dir.as_ref()).await {
        info!(
            service = %config.service.name,
            status = %report.snapshot.status,
            "Check complete"
        );
    }
    Ok(())
}

/// Bind the viewer first so a bad address fails the command immediately.
async fn start_viewer(
    config: &WatchdogConfig,
    addr: SocketAddr,
    cancel_token: CancellationToken,
) -> Result<JoinHandle<std::io::Result<()>>> {
    let state = ViewerState::new(StatusStore::new(&config.storage.status_file));
    let (_, server) = spawn_viewer(addr, state, cancel_token)
        .await
        .with_context(|| format!("Failed to bind status viewer to {addr}"))?;
    Ok(server)
}

async fn join_viewer(server: JoinHandle<std::io::Result<()>>) -> Result<()> {
    server
        .await
        .context("Status viewer task panicked")?
        .context("Status viewer failed")
}

fn viewer_addr(config: &WatchdogConfig) -> Result<SocketAddr> {
    config
        .viewer
        .addr
        .parse()
        .with_context(|| format!("Invalid viewer.addr '{}'", config.viewer.addr))
}

async fn run_loop(config: &WatchdogConfig, serve: bool) -> Result<()> {
    let cancel_token = shutdown_token();
    let watchdog = Arc::new(Watchdog::from_config(
        config,
        journal_source(config),
        service_control(config),
    ));
    let scheduler = CheckScheduler::new(
        watchdog,
        config.schedule.interval(),
        config.storage.lock_dir.clone(),
    );

    if !serve {
        let passes = scheduler.run(cancel_token).await;
        info!(passes, "Scheduler stopped");
        return Ok(());
    }

    let mut viewer = start_viewer(config, viewer_addr(config)?, cancel_token.clone()).await?;
    let scheduler_task = scheduler.run(cancel_token.clone());
    tokio::pin!(scheduler_task);

    tokio::select! {
        passes = &mut scheduler_task => {
            info!(passes, "Scheduler stopped");
            cancel_token.cancel();
            join_viewer(viewer).await
        }
        result = &mut viewer => {
            cancel_token.cancel();
            let passes = scheduler_task.await;
            info!(passes, "Scheduler stopped");
            let outcome = result
                .context("Status viewer task panicked")
                .and_then(|served| served.context("Status viewer failed"));
            if let Err(e) = &outcome {
                error!(error = %e, "Status viewer stopped early");
            }
            outcome
        }
    }
}

fn print_status(config: &WatchdogConfig) -> Result<()> {
    let store = StatusStore::new(&config.storage.status_file);
    match store.load_view() {
        Ok(Some(snapshot)) => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Ok(None) => println!("No status data available."),
        Err(e) => {
            error!(error = %e, "Status snapshot unreadable");
            println!("No status data available.");
        }
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let config = load_config(&args)?;

    match args.command.unwrap_or(SubCommand::Check { log_file: None }) {
        SubCommand::Check { log_file } => run_check(&config, log_file).await,
        SubCommand::Run { serve } => run_loop(&config, serve).await,
        SubCommand::Serve { addr } => {
            let addr = match addr {
                Some(addr) => addr,
                None => viewer_addr(&config)?,
            };
            join_viewer(start_viewer(&config, addr, shutdown_token()).await?).await
        }
        SubCommand::Status => print_status(&config),
        SubCommand::PrintConfig => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

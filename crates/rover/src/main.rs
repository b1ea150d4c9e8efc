//! Rover - Main Entry Point

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use drive_dispatch::CommandDispatcher;
use rover::{init_logging, run_avoidance, run_manual, RoverConfig};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{info, warn};

/// How long to wait for a pending stdin read after the control loop ends
const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(200);

#[derive(Debug, Parser)]
#[command(name = "rover", version, about = "Obstacle-avoiding rover motor control")]
struct Cli {
    /// Configuration file (defaults to ./rover.toml when present)
    #[arg(short, long, env = "ROVER_CONFIG")]
    config: Option<PathBuf>,

    /// Discard motor packets instead of opening the serial port
    #[arg(long)]
    dry_run: bool,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Drive from keys typed on stdin, one per line
    Manual,
    /// Steer around obstacles from JSON detection frames on stdin
    Avoid,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    let result = runtime.block_on(run(cli));
    // Stdin reads run on a blocking thread that cannot be cancelled.
    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = RoverConfig::load(cli.config.as_deref())?;
    init_logging(config.log_level()?);

    info!("=== Rover v{} ===", env!("CARGO_PKG_VERSION"));

    let dispatcher = if cli.dry_run {
        info!("Dry run: motor packets are discarded");
        CommandDispatcher::spawn(config.dispatch.clone(), tokio::io::sink())?
    } else {
        let (dispatcher, port) = CommandDispatcher::connect(config.dispatch.clone(), &config.serial)
            .context("motor controller unavailable")?;
        info!("Motor controller on {}", port);
        dispatcher
    };
    let handle = dispatcher.handle();
    let input = BufReader::new(tokio::io::stdin());

    let outcome = tokio::select! {
        result = async {
            match cli.mode {
                Mode::Manual => run_manual(input, &handle).await,
                Mode::Avoid => run_avoidance(input, &handle, config.avoidance.clone()).await,
            }
        } => result,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted");
            Ok(())
        }
    };

    let stats = dispatcher.shutdown().await?;
    info!(
        "Motors stopped and cleaned up ({} frames sent, {} failed, final stop {})",
        stats.ticks_sent,
        stats.write_failures,
        if stats.final_stop_sent { "sent" } else { "NOT sent" }
    );

    outcome
}

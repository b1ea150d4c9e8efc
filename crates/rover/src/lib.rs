//! Rover control application
//!
//! Wires command sources (manual key input or per-frame obstacle
//! avoidance) into the shared drivetrain dispatcher.

pub mod config;
pub mod modes;

pub use config::RoverConfig;
pub use modes::{run_avoidance, run_manual, FrameProcessor};

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging(level: Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }
}

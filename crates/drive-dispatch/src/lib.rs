//! Drivetrain Command Dispatch
//!
//! Holds the current movement command and keeps the motor controller fed:
//! a background task re-encodes the command into a motor packet pair and
//! writes it to the serial link at a fixed rate, whether or not the command
//! has changed since the last tick.

mod command;
mod config;
mod dispatcher;
mod keymap;

pub use command::MovementCommand;
pub use config::DispatchConfig;
pub use dispatcher::{CommandDispatcher, CommandHandle, DispatchStats};
pub use keymap::{map_key, map_line, KeyInput};

use motor_protocol::MotorError;
use thiserror::Error;

/// Dispatch error types
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid dispatch configuration: {0}")]
    InvalidConfig(String),

    #[error("Send task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Motor(#[from] MotorError),
}

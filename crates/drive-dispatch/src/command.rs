//! Drivetrain-level movement commands

use avoidance::AvoidanceAction;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the drivetrain should currently be doing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementCommand {
    Forward,
    Backward,
    Left,
    Right,
    /// No active command; motors held at zero
    #[default]
    Idle,
}

impl MovementCommand {
    /// Signed (motor A, motor B) speeds at the given magnitude.
    ///
    /// Turns are tank turns: one side reverses while the other drives.
    pub fn motor_speeds(&self, magnitude: i32) -> (i32, i32) {
        match self {
            MovementCommand::Forward => (magnitude, magnitude),
            MovementCommand::Backward => (-magnitude, -magnitude),
            MovementCommand::Left => (-magnitude, magnitude),
            MovementCommand::Right => (magnitude, -magnitude),
            MovementCommand::Idle => (0, 0),
        }
    }

    /// Operator-facing status line
    pub fn status_label(&self) -> &'static str {
        match self {
            MovementCommand::Forward => "MOVING FORWARD",
            MovementCommand::Backward => "MOVING BACKWARD",
            MovementCommand::Left => "TURNING LEFT",
            MovementCommand::Right => "TURNING RIGHT",
            MovementCommand::Idle => "STOPPED",
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, MovementCommand::Idle)
    }
}

impl fmt::Display for MovementCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovementCommand::Forward => "FORWARD",
            MovementCommand::Backward => "BACKWARD",
            MovementCommand::Left => "LEFT",
            MovementCommand::Right => "RIGHT",
            MovementCommand::Idle => "IDLE",
        };
        f.write_str(name)
    }
}

impl From<AvoidanceAction> for MovementCommand {
    fn from(action: AvoidanceAction) -> Self {
        match action {
            AvoidanceAction::MoveForward => MovementCommand::Forward,
            AvoidanceAction::TurnLeft => MovementCommand::Left,
            AvoidanceAction::TurnRight => MovementCommand::Right,
            // The dispatcher drives at one fixed magnitude, so the only
            // slower speed available is zero.
            AvoidanceAction::SlowDown | AvoidanceAction::Stop => MovementCommand::Idle,
        }
    }
}

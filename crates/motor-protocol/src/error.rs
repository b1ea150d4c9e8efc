//! Motor Protocol Error Types

use thiserror::Error;

/// Errors that can occur talking to the motor controller
#[derive(Debug, Error)]
pub enum MotorError {
    /// None of the candidate serial devices exist
    #[error("No serial port found (tried: {})", candidates.join(", "))]
    PortNotFound { candidates: Vec<String> },

    /// Serial device exists but could not be opened
    #[error("Failed to open serial port {port}: {reason}")]
    Open { port: String, reason: String },

    /// Write to the serial link failed
    #[error("Serial I/O error: {0}")]
    Io(String),

    /// Write did not complete in time
    #[error("Timeout writing to motor controller after {0}ms")]
    Timeout(u64),

    /// Packet buffer has the wrong length
    #[error("Invalid packet length: expected 4 bytes, got {0}")]
    InvalidPacket(usize),

    /// Checksum mismatch
    #[error("Checksum mismatch: expected {expected:02X}, got {actual:02X}")]
    ChecksumMismatch { expected: u8, actual: u8 },
}

impl From<std::io::Error> for MotorError {
    fn from(err: std::io::Error) -> Self {
        MotorError::Io(err.to_string())
    }
}

//! Motor Packet Definitions
//!
//! Defines the per-channel command codes and the 4-byte packet layout
//! `[address, command, data, checksum]`.

use crate::error::MotorError;
use crate::speed;
use serde::{Deserialize, Serialize};

/// Length of a single motor packet on the wire
pub const PACKET_LEN: usize = 4;

/// Length of a full drivetrain frame (motor A packet then motor B packet)
pub const DRIVE_FRAME_LEN: usize = 2 * PACKET_LEN;

/// Motor channels on the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Motor {
    /// Channel 1 (left side)
    A,
    /// Channel 2 (right side)
    B,
}

impl Motor {
    /// Command code driving this channel forward
    pub fn forward_code(&self) -> u8 {
        match self {
            Motor::A => 0,
            Motor::B => 4,
        }
    }

    /// Command code driving this channel in reverse
    pub fn reverse_code(&self) -> u8 {
        match self {
            Motor::A => 1,
            Motor::B => 5,
        }
    }

    /// Resolve a command code back to its channel and direction.
    ///
    /// Returns `(motor, reverse)` or `None` for codes outside the table.
    pub fn from_code(code: u8) -> Option<(Motor, bool)> {
        match code {
            0 => Some((Motor::A, false)),
            1 => Some((Motor::A, true)),
            4 => Some((Motor::B, false)),
            5 => Some((Motor::B, true)),
            _ => None,
        }
    }
}

/// Compute the 7-bit packet checksum
pub fn checksum(address: u8, command: u8, data: u8) -> u8 {
    ((address as u16 + command as u16 + data as u16) & 0x7F) as u8
}

/// One addressed, checksummed command for a single motor channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MotorPacket {
    pub address: u8,
    pub command: u8,
    pub data: u8,
    pub checksum: u8,
}

impl MotorPacket {
    /// Build a packet from a raw command code.
    ///
    /// `data` is clamped to `0..=127`.
    pub fn new(address: u8, command: u8, data: i32) -> Self {
        let data = data.clamp(0, speed::MAX) as u8;
        Self {
            address,
            command,
            data,
            checksum: checksum(address, command, data),
        }
    }

    /// Serialize to wire bytes
    pub fn to_bytes(&self) -> [u8; PACKET_LEN] {
        [self.address, self.command, self.data, self.checksum]
    }

    /// Parse a wire packet and verify its checksum
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MotorError> {
        let &[address, command, data, actual] = bytes else {
            return Err(MotorError::InvalidPacket(bytes.len()));
        };

        let expected = checksum(address, command, data);
        if expected != actual {
            return Err(MotorError::ChecksumMismatch { expected, actual });
        }

        Ok(Self {
            address,
            command,
            data,
            checksum: actual,
        })
    }

    /// Signed speed this packet requests, if its command code is a drive code
    pub fn signed_speed(&self) -> Option<(Motor, i32)> {
        let (motor, reverse) = Motor::from_code(self.command)?;
        let magnitude = self.data as i32;
        Some((motor, if reverse { -magnitude } else { magnitude }))
    }
}

/// Encode a signed speed for one motor channel.
///
/// The speed is clamped to `-127..=127`; its sign picks the forward or
/// reverse command code and its magnitude becomes the data byte.
pub fn encode(address: u8, motor: Motor, signed_speed: i32) -> MotorPacket {
    let speed = signed_speed.clamp(speed::MIN, speed::MAX);
    if speed >= 0 {
        MotorPacket::new(address, motor.forward_code(), speed)
    } else {
        MotorPacket::new(address, motor.reverse_code(), -speed)
    }
}

/// Encode both channels as one contiguous frame, motor A first
pub fn encode_drive(address: u8, left: i32, right: i32) -> [u8; DRIVE_FRAME_LEN] {
    let mut frame = [0u8; DRIVE_FRAME_LEN];
    frame[..PACKET_LEN].copy_from_slice(&encode(address, Motor::A, left).to_bytes());
    frame[PACKET_LEN..].copy_from_slice(&encode(address, Motor::B, right).to_bytes());
    frame
}

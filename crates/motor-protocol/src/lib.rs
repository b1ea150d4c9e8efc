//! Motor Controller Protocol Implementation
//!
//! This crate provides the packetized serial protocol spoken by
//! dual-channel motor controllers: 4-byte addressed, checksummed command
//! packets, plus discovery and opening of the serial port they travel over.

mod error;
mod packet;
mod serial;

pub use error::MotorError;
pub use packet::{checksum, encode, encode_drive, Motor, MotorPacket, DRIVE_FRAME_LEN, PACKET_LEN};
pub use serial::{find_port, open_port, SerialConfig};

/// Controller addressing constants
pub mod address {
    /// Factory default controller address
    pub const DEFAULT: u8 = 128;
    /// Lowest address a controller in packetized mode accepts
    pub const MIN: u8 = 128;
}

/// Limits for the packet data byte
pub mod speed {
    /// Full scale magnitude for one direction
    pub const MAX: i32 = 127;
    /// Full scale magnitude in reverse
    pub const MIN: i32 = -127;
}

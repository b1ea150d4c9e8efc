//! Dispatcher configuration

use crate::DispatchError;
use motor_protocol::{address, speed};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Dispatcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Motor controller address
    pub address: u8,

    /// Send period in milliseconds (50 ms = 20 Hz)
    pub tick_ms: u64,

    /// Drive magnitude for every non-idle command (0..=127)
    pub speed: i32,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            address: address::DEFAULT,
            tick_ms: 50,
            speed: 67,
        }
    }
}

impl DispatchConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Reject settings the controller or the send loop cannot honour
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.address < address::MIN {
            return Err(DispatchError::InvalidConfig(format!(
                "address {} is below {}",
                self.address,
                address::MIN
            )));
        }
        if self.tick_ms == 0 {
            return Err(DispatchError::InvalidConfig(
                "tick_ms must be positive".to_string(),
            ));
        }
        if !(0..=speed::MAX).contains(&self.speed) {
            return Err(DispatchError::InvalidConfig(format!(
                "speed {} outside 0..={}",
                self.speed,
                speed::MAX
            )));
        }
        Ok(())
    }
}

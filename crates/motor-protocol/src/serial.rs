//! Serial Link to the Motor Controller
//!
//! Locates the UART device and opens it with the controller's framing
//! (8 data bits, no parity, one stop bit).

use crate::error::MotorError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, info};

/// Default baud rate (controller DIP switches set for 9600)
const DEFAULT_BAUD_RATE: u32 = 9600;

/// Read/write timeout for the port
const PORT_TIMEOUT: Duration = Duration::from_secs(1);

/// Serial link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SerialConfig {
    /// Device paths probed in order; the first one that exists is used
    pub candidates: Vec<String>,
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                "/dev/serial0".to_string(),
                "/dev/ttyAMA0".to_string(),
                "/dev/ttyS0".to_string(),
            ],
            baud_rate: DEFAULT_BAUD_RATE,
        }
    }
}

/// Return the first candidate device path that exists
pub fn find_port(candidates: &[String]) -> Result<String, MotorError> {
    for candidate in candidates {
        debug!("Probing serial device {}", candidate);
        if Path::new(candidate).exists() {
            return Ok(candidate.clone());
        }
    }

    Err(MotorError::PortNotFound {
        candidates: candidates.to_vec(),
    })
}

/// Find and open the controller's serial port.
///
/// Must be called from within a tokio runtime. Returns the chosen device
/// path along with the open stream.
pub fn open_port(config: &SerialConfig) -> Result<(String, SerialStream), MotorError> {
    let port = find_port(&config.candidates)?;

    let stream = tokio_serial::new(&port, config.baud_rate)
        .data_bits(DataBits::Eight)
        .parity(Parity::None)
        .stop_bits(StopBits::One)
        .timeout(PORT_TIMEOUT)
        .open_native_async()
        .map_err(|e| MotorError::Open {
            port: port.clone(),
            reason: e.to_string(),
        })?;

    info!("Connected to {} at {} baud", port, config.baud_rate);
    Ok((port, stream))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_port_picks_first_existing() {
        let existing = env!("CARGO_MANIFEST_DIR").to_string();
        let candidates = vec![
            "/definitely/not/a/tty".to_string(),
            existing.clone(),
            "/dev/null".to_string(),
        ];
        assert_eq!(find_port(&candidates).unwrap(), existing);
    }

    #[test]
    fn test_find_port_reports_all_candidates() {
        let candidates = vec!["/nope/a".to_string(), "/nope/b".to_string()];
        match find_port(&candidates) {
            Err(MotorError::PortNotFound { candidates: tried }) => assert_eq!(tried, candidates),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_default_config() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.candidates[0], "/dev/serial0");
    }

    #[tokio::test]
    async fn test_open_port_without_device_is_config_error() {
        let config = SerialConfig {
            candidates: vec!["/nope/serial".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            open_port(&config),
            Err(MotorError::PortNotFound { .. })
        ));
    }
}

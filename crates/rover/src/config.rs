//! Layered rover configuration (TOML file + `ROVER__` environment overrides)

use anyhow::{Context, Result};
use avoidance::AvoidanceConfig;
use config::{Config, Environment, File};
use drive_dispatch::DispatchConfig;
use motor_protocol::SerialConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::Level;

/// Config file read when no path is given; missing is not an error
pub const DEFAULT_CONFIG_FILE: &str = "rover.toml";

/// Complete rover configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoverConfig {
    pub serial: SerialConfig,
    pub dispatch: DispatchConfig,
    pub avoidance: AvoidanceConfig,
    pub log_level: String,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            dispatch: DispatchConfig::default(),
            avoidance: AvoidanceConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl RoverConfig {
    /// Load from `path` (required) or `rover.toml` (optional), then apply
    /// environment overrides such as `ROVER__DISPATCH__TICK_MS=40`.
    /// List settings take comma-separated values, e.g.
    /// `ROVER__SERIAL__CANDIDATES=/dev/ttyUSB0,/dev/ttyS0`.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: RoverConfig = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("ROVER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("serial.candidates")
                    .with_list_parse_key("avoidance.labels"),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Check every section before anything touches hardware
    pub fn validate(&self) -> Result<()> {
        self.dispatch.validate()?;
        self.log_level()?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level> {
        Level::from_str(&self.log_level)
            .map_err(|_| anyhow::anyhow!("unknown log level '{}'", self.log_level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = RoverConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.log_level().unwrap(), Level::INFO);
        assert_eq!(config.dispatch.address, 128);
        assert_eq!(config.dispatch.tick_ms, 50);
        assert_eq!(config.dispatch.speed, 67);
        assert_eq!(config.serial.baud_rate, 9600);
    }

    #[test]
    fn test_load_file_overrides_sections() {
        let path = std::env::temp_dir().join(format!("rover-config-{}.toml", std::process::id()));
        fs::write(
            &path,
            r#"
log_level = "debug"

[dispatch]
speed = 40

[avoidance]
labels = ["person", "chair"]
"#,
        )
        .unwrap();

        let config = RoverConfig::load(Some(&path)).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.dispatch.speed, 40);
        assert_eq!(config.dispatch.tick_ms, 50);
        assert_eq!(config.avoidance.labels, vec!["person", "chair"]);
        assert_eq!(config.log_level().unwrap(), Level::DEBUG);
    }

    #[test]
    fn test_env_overrides_list_settings() {
        std::env::set_var("ROVER__SERIAL__CANDIDATES", "/dev/ttyUSB0,/dev/ttyS1");
        let loaded = RoverConfig::load(None);
        std::env::remove_var("ROVER__SERIAL__CANDIDATES");

        let config = loaded.unwrap();
        assert_eq!(config.serial.candidates, vec!["/dev/ttyUSB0", "/dev/ttyS1"]);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        assert!(RoverConfig::load(Some(Path::new("/nope/rover.toml"))).is_err());
    }

    #[test]
    fn test_bad_values_rejected() {
        let config = RoverConfig {
            log_level: "loud".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RoverConfig {
            dispatch: DispatchConfig {
                speed: 200,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

//! Configuration for bus device connections
//!
//! Settings apply at `open` time. Changing them never affects devices that
//! are already open.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default baud rate for serial and USB-serial devices (BPS)
pub const DEFAULT_BAUD_RATE: u32 = 460_800;

/// Default blocking read timeout in milliseconds
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 500;

/// Default TCP port when a device name gives only an IPv4 address
pub const DEFAULT_TCP_PORT: u16 = 4001;

/// Connection settings shared by all bus device transports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusConfig {
    /// Baud rate applied to serial and USB-serial devices on open.
    /// TCP devices ignore it.
    pub baud_rate: u32,
    /// How long a single-byte read blocks before giving up
    pub read_timeout_ms: u64,
    /// Port used for TCP device names without an explicit `:port` suffix
    pub tcp_port: u16,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            tcp_port: DEFAULT_TCP_PORT,
        }
    }
}

impl BusConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Read timeout as a `Duration`
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BusConfig::default();
        assert_eq!(config.baud_rate, 460_800);
        assert_eq!(config.read_timeout_ms, 500);
        assert_eq!(config.tcp_port, 4001);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = BusConfig {
            baud_rate: 115_200,
            read_timeout_ms: 250,
            tcp_port: 5002,
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: BusConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_parses_literal_toml() {
        let toml_str = r#"
            baud_rate = 9600
            read_timeout_ms = 1000
            tcp_port = 4001
        "#;
        let config: BusConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.read_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_missing_file() {
        assert!(BusConfig::from_file("/nonexistent/drivebus.toml").is_err());
    }
}

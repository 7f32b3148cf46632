//! Error types for the drivebus library

use crate::bus::BusHandle;
use thiserror::Error;

/// Main error type for drivebus operations
#[derive(Error, Debug)]
pub enum Error {
    /// Serial port error
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Handle does not refer to an open bus device
    #[error("Invalid or closed bus handle {0}")]
    InvalidHandle(BusHandle),

    /// Every slot in the bus device table is in use
    #[error("All bus device slots are in use")]
    NoFreeSlot,

    /// Device name did not match any supported transport
    #[error("Device name {0:?} does not match any supported transport")]
    UnsupportedDevice(String),

    /// No attached device answered to the given name
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Transmit buffer is full, `transmit` must run before more writes
    #[error("Transmit buffer full ({0} bytes)")]
    TransmitBufferFull(usize),

    /// Driver accepted only part of the transmit buffer
    #[error("Short transmit: {written} of {expected} bytes went out")]
    TransmitIncomplete { written: usize, expected: usize },

    /// No byte arrived within the configured read timeout
    #[error("Communication timeout")]
    Timeout,

    /// Built without the `usb` feature
    #[error("USB-serial support not compiled in")]
    UsbSupportDisabled,

    /// Configuration file parse error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Configuration file serialization error
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
}

/// Result type alias for drivebus operations
pub type Result<T> = std::result::Result<T, Error>;

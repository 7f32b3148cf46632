//! USB-serial adapter transport
//!
//! Fallback driver for device names that are neither serial port paths nor
//! IPv4 addresses. FTDI adapters are addressed as `FTDI<n>` by enumeration
//! index, or by the product or serial string programmed into the adapter
//! EEPROM. I/O goes through the OS serial port the adapter enumerates as.

use super::serial::SerialTransport;
use super::Transport;
use crate::bus::BusDeviceInfo;
use crate::error::{Error, Result};
use serialport::{SerialPortType, UsbPortInfo};
use std::time::Duration;

/// USB vendor ID of FTDI adapters
const FTDI_VID: u16 = 0x0403;

/// All FTDI adapters visible to the OS, in enumeration order
fn ftdi_ports() -> Result<Vec<(String, UsbPortInfo)>> {
    let mut ports = Vec::new();
    for port in serialport::available_ports()? {
        if let SerialPortType::UsbPort(info) = port.port_type {
            if info.vid == FTDI_VID {
                ports.push((port.port_name, info));
            }
        }
    }
    Ok(ports)
}

/// Enumerate detected USB-serial adapters as bus device descriptions
pub(crate) fn detect_devices() -> Result<Vec<BusDeviceInfo>> {
    let devices = ftdi_ports()?
        .into_iter()
        .enumerate()
        .map(|(index, (port_name, info))| BusDeviceInfo {
            device_name: format!("FTDI{}", index),
            port_name,
            serial_number: info.serial_number,
            manufacturer: info.manufacturer,
            product: info.product,
            vid: info.vid,
            pid: info.pid,
        })
        .collect();
    Ok(devices)
}

/// Parse an index-style adapter name, `FTDI2` -> 2
fn parse_index_name(name: &str) -> Option<usize> {
    name.strip_prefix("FTDI")?.parse().ok()
}

/// Transport over a USB-serial adapter
pub struct UsbSerialTransport {
    inner: SerialTransport,
}

impl UsbSerialTransport {
    /// Open a USB-serial adapter by index name or EEPROM string
    ///
    /// # Arguments
    ///
    /// * `name` - `FTDI<n>`, or the adapter's product or serial string
    /// * `baud_rate` - Line speed in BPS
    /// * `timeout` - Blocking read timeout
    pub fn open(name: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let ports = ftdi_ports()?;
        let path = match parse_index_name(name) {
            Some(index) => ports.get(index).map(|(path, _)| path.clone()),
            None => ports
                .iter()
                .find(|(_, info)| {
                    info.product.as_deref() == Some(name)
                        || info.serial_number.as_deref() == Some(name)
                })
                .map(|(path, _)| path.clone()),
        }
        .ok_or_else(|| Error::DeviceNotFound(name.to_string()))?;

        log::info!("USB-serial device {} resolved to {}", name, path);
        let inner = SerialTransport::open(&path, baud_rate, timeout)?;
        Ok(Self { inner })
    }
}

impl Transport for UsbSerialTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        self.inner.read(buffer)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.inner.write(data)
    }

    fn flush(&mut self) -> Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_index_name() {
        assert_eq!(parse_index_name("FTDI0"), Some(0));
        assert_eq!(parse_index_name("FTDI12"), Some(12));
        assert_eq!(parse_index_name("FTDI"), None);
        assert_eq!(parse_index_name("FTDIx"), None);
        assert_eq!(parse_index_name("TTL232R"), None);
    }

    #[test]
    fn test_open_unknown_adapter_fails() {
        let result =
            UsbSerialTransport::open("NoSuchAdapter99", 460_800, Duration::from_millis(100));
        assert!(result.is_err());
    }
}

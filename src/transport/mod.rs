//! Transport abstraction for bus device communication
//!
//! Every bus device speaks through the [`Transport`] trait regardless of the
//! physical link. [`classify`] decides which transport a device name maps to;
//! the bus layer then opens the matching implementation.

mod mock;
mod serial;
mod tcp;
#[cfg(feature = "usb")]
mod usb;

pub use mock::MockTransport;
pub use serial::SerialTransport;
pub use tcp::TcpTransport;
#[cfg(feature = "usb")]
pub use usb::UsbSerialTransport;

#[cfg(feature = "usb")]
pub(crate) use usb::detect_devices;

use crate::error::Result;
use std::fmt;

/// Transport trait for bus device communication
///
/// Implementations are blocking: `read` waits up to the transport's
/// configured timeout, `write` hands bytes to the driver and reports how
/// many it took.
pub trait Transport: Send {
    /// Read into the buffer, returning bytes read (0 on timeout)
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Write data to the transport, returning bytes accepted
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Flush any buffered writes to the device
    fn flush(&mut self) -> Result<()>;
}

/// The transport family a bus device belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Local serial port (`COM*`, `/dev/tty*`, `/dev/cu.*`)
    Serial,
    /// Raw TCP socket (`a.b.c.d` or `a.b.c.d:port`)
    Tcp,
    /// USB-serial adapter addressed by index or EEPROM name
    UsbSerial,
    /// Caller-supplied transport attached directly to a slot
    Attached,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::Serial => write!(f, "serial"),
            TransportKind::Tcp => write!(f, "TCP"),
            TransportKind::UsbSerial => write!(f, "USB-serial"),
            TransportKind::Attached => write!(f, "attached"),
        }
    }
}

/// Classify a device name into its transport family
///
/// Pure name inspection, no device access. Serial port prefixes win first,
/// then IPv4 addresses with an optional `:port` suffix. Anything else is
/// taken as a USB-serial index (`FTDI2`) or EEPROM product name, whether or
/// not the `usb` feature is compiled in.
///
/// # Arguments
///
/// * `name` - Device name as passed to `BusManager::open`
///
/// # Example
///
/// ```
/// use drivebus::{classify, TransportKind};
///
/// assert_eq!(classify("/dev/ttyUSB0"), TransportKind::Serial);
/// assert_eq!(classify("192.168.1.50:4001"), TransportKind::Tcp);
/// assert_eq!(classify("FTDI0"), TransportKind::UsbSerial);
/// ```
pub fn classify(name: &str) -> TransportKind {
    if name.starts_with("COM") || name.starts_with("/dev/tty") || name.starts_with("/dev/cu.") {
        TransportKind::Serial
    } else if tcp::parse_device_address(name).is_some() {
        TransportKind::Tcp
    } else {
        TransportKind::UsbSerial
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_serial_prefixes() {
        assert_eq!(classify("COM1"), TransportKind::Serial);
        assert_eq!(classify("COM17"), TransportKind::Serial);
        assert_eq!(classify("/dev/ttyUSB0"), TransportKind::Serial);
        assert_eq!(classify("/dev/ttyS3"), TransportKind::Serial);
        assert_eq!(classify("/dev/cu.usbserial-A1B2"), TransportKind::Serial);
    }

    #[test]
    fn test_classify_tcp_addresses() {
        assert_eq!(classify("192.168.1.5"), TransportKind::Tcp);
        assert_eq!(classify("192.168.1.5:4001"), TransportKind::Tcp);
        assert_eq!(classify("10.0.0.1:80"), TransportKind::Tcp);
        assert_eq!(classify("127.0.0.1"), TransportKind::Tcp);
    }

    #[test]
    fn test_classify_rejects_bad_addresses() {
        // Malformed addresses fall through to the USB-serial family
        assert_eq!(classify("256.1.1.1"), TransportKind::UsbSerial);
        assert_eq!(classify("192.168.1"), TransportKind::UsbSerial);
        assert_eq!(classify("192.168.1.5:notaport"), TransportKind::UsbSerial);
        assert_eq!(classify("192.168.1.5:99999"), TransportKind::UsbSerial);
    }

    #[test]
    fn test_classify_usb_fallback() {
        assert_eq!(classify("FTDI0"), TransportKind::UsbSerial);
        assert_eq!(classify("TTL232R"), TransportKind::UsbSerial);
        assert_eq!(classify(""), TransportKind::UsbSerial);
    }

    #[test]
    fn test_classify_prefix_wins_over_address() {
        // A name starting with a serial prefix is serial even if the rest
        // looks odd
        assert_eq!(classify("COM"), TransportKind::Serial);
        assert_eq!(classify("/dev/ttyACM0:4001"), TransportKind::Serial);
    }
}

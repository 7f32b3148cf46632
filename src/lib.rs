//! # drivebus
//!
//! Handle-based transport layer for motor drive communication. A fixed
//! table of bus device slots hides whether a drive sits behind a local
//! serial port, a serial-to-Ethernet bridge on raw TCP, or a USB-serial
//! adapter; the protocol layer above only ever sees handles and bytes.
//!
//! ## Device names
//!
//! The transport is picked purely from the name passed to
//! [`BusManager::open`]:
//!
//! - `COM*`, `/dev/tty*`, `/dev/cu.*` - local serial port
//! - `a.b.c.d` or `a.b.c.d:port` - raw TCP to a bus bridge
//! - anything else - USB-serial adapter by `FTDI<n>` index or EEPROM name
//!   (needs the `usb` feature, on by default)
//!
//! ## Quick start
//!
//! ```no_run
//! use drivebus::{BusManager, Result};
//!
//! fn main() -> Result<()> {
//!     let mut bus = BusManager::new();
//!     let handle = bus.open("192.168.1.50:4001")?;
//!
//!     for byte in [0x02, 0x44, 0x1F] {
//!         bus.write(handle, byte)?;
//!     }
//!     bus.transmit(handle)?;
//!     let reply = bus.read(handle)?;
//!     println!("drive answered 0x{:02X}", reply);
//!
//!     bus.close(handle)?;
//!     Ok(())
//! }
//! ```
//!
//! Writes are buffered per device and go out as one burst on
//! [`BusManager::transmit`]; reads block for one byte up to the configured
//! timeout. The model is single-threaded and blocking throughout, one
//! request-response exchange at a time per device.

pub mod bus;
pub mod config;
pub mod error;
pub mod transport;

pub use bus::{
    detected_device_count, detected_device_info, BusDeviceInfo, BusHandle, BusManager, MAX_BUSES,
    TRANSMIT_BUFFER_CAPACITY,
};
pub use config::BusConfig;
pub use error::{Error, Result};
pub use transport::{classify, MockTransport, Transport, TransportKind};

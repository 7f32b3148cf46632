//! Bus device table and handle-based operations
//!
//! A [`BusManager`] owns a fixed table of bus device slots. Opening a device
//! claims the lowest free slot and returns its index as a [`BusHandle`];
//! every later operation takes that handle. Each open slot carries its own
//! transport, transmit buffer and cumulative status word, so devices on
//! different buses never share state.

use crate::config::BusConfig;
use crate::error::{Error, Result};
#[cfg(feature = "usb")]
use crate::transport::UsbSerialTransport;
use crate::transport::{classify, SerialTransport, TcpTransport, Transport, TransportKind};
use std::fmt;

/// Number of slots in the bus device table
pub const MAX_BUSES: usize = 5;

/// Capacity of the per-device transmit buffer in bytes
pub const TRANSMIT_BUFFER_CAPACITY: usize = 128;

/// Index of an open slot in the bus device table
///
/// Handles are plain indexes. Closing a device frees its slot for reuse, so
/// a stale handle can start referring to a different device after a later
/// `open`. Callers must not use a handle past `close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BusHandle(usize);

impl BusHandle {
    /// Slot index behind this handle
    pub fn index(self) -> usize {
        self.0
    }
}

impl From<usize> for BusHandle {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl fmt::Display for BusHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Description of a detected USB-serial bus device
#[derive(Debug, Clone)]
pub struct BusDeviceInfo {
    /// Name accepted by [`BusManager::open`], `FTDI<n>`
    pub device_name: String,
    /// OS serial port the adapter enumerates as
    pub port_name: String,
    /// Serial string from the adapter EEPROM
    pub serial_number: Option<String>,
    /// Manufacturer string from the adapter EEPROM
    pub manufacturer: Option<String>,
    /// Product string from the adapter EEPROM
    pub product: Option<String>,
    /// USB vendor ID
    pub vid: u16,
    /// USB product ID
    pub pid: u16,
}

/// State of one open bus device
struct BusLink {
    kind: TransportKind,
    name: String,
    transport: Box<dyn Transport>,
    tx: [u8; TRANSMIT_BUFFER_CAPACITY],
    tx_used: usize,
    cumulative_status: u32,
}

impl BusLink {
    fn new(kind: TransportKind, name: String, transport: Box<dyn Transport>) -> Self {
        Self {
            kind,
            name,
            transport,
            tx: [0; TRANSMIT_BUFFER_CAPACITY],
            tx_used: 0,
            cumulative_status: 0,
        }
    }
}

/// Fixed-size table of bus devices
///
/// # Example
///
/// ```no_run
/// use drivebus::{BusManager, Result};
///
/// fn main() -> Result<()> {
///     let mut bus = BusManager::new();
///     let handle = bus.open("/dev/ttyUSB0")?;
///     for byte in [0x02, 0x44, 0x1F] {
///         bus.write(handle, byte)?;
///     }
///     bus.transmit(handle)?;
///     let reply = bus.read(handle)?;
///     println!("drive answered 0x{:02X}", reply);
///     bus.close(handle)?;
///     Ok(())
/// }
/// ```
pub struct BusManager {
    slots: [Option<BusLink>; MAX_BUSES],
    config: BusConfig,
}

impl BusManager {
    // === Lifecycle ===

    /// New manager with default connection settings
    pub fn new() -> Self {
        Self::with_config(BusConfig::default())
    }

    /// New manager with explicit connection settings
    pub fn with_config(config: BusConfig) -> Self {
        Self {
            slots: std::array::from_fn(|_| None),
            config,
        }
    }

    /// Open a bus device by name and claim a table slot
    ///
    /// The transport is picked by name syntax, see [`classify`]. A slot is
    /// claimed only once the transport is up; on any failure the table is
    /// left as it was.
    ///
    /// # Arguments
    ///
    /// * `name` - Serial port path, IPv4 address with optional `:port`, or
    ///   USB-serial adapter name
    pub fn open(&mut self, name: &str) -> Result<BusHandle> {
        let index = self.free_slot()?;
        let kind = classify(name);
        let transport = self.open_transport(kind, name)?;

        log::info!(
            "BusManager: opened {} device {} (handle {})",
            kind,
            name,
            index
        );
        self.slots[index] = Some(BusLink::new(kind, name.to_string(), transport));
        Ok(BusHandle(index))
    }

    /// Attach a caller-supplied transport to a free slot
    ///
    /// The slot behaves exactly like one claimed by [`open`](Self::open).
    /// Used for drive simulators and tests.
    pub fn attach<T: Transport + 'static>(&mut self, transport: T) -> Result<BusHandle> {
        let index = self.free_slot()?;
        log::info!("BusManager: attached external transport (handle {})", index);
        self.slots[index] = Some(BusLink::new(
            TransportKind::Attached,
            String::from("attached"),
            Box::new(transport),
        ));
        Ok(BusHandle(index))
    }

    /// Whether the handle refers to an open bus device
    ///
    /// Any handle value may be asked, including out-of-range ones.
    pub fn is_open(&self, handle: BusHandle) -> bool {
        self.slots
            .get(handle.0)
            .map_or(false, |slot| slot.is_some())
    }

    /// Close a bus device and free its slot
    ///
    /// Fails on a closed or out-of-range handle and leaves the table
    /// untouched in that case.
    pub fn close(&mut self, handle: BusHandle) -> Result<()> {
        let slot = self
            .slots
            .get_mut(handle.0)
            .ok_or(Error::InvalidHandle(handle))?;
        match slot.take() {
            Some(link) => {
                log::info!(
                    "BusManager: closed {} device {} (handle {})",
                    link.kind,
                    link.name,
                    handle
                );
                Ok(())
            }
            None => Err(Error::InvalidHandle(handle)),
        }
    }

    // === Data path ===

    /// Append one byte to the device's transmit buffer
    ///
    /// Nothing touches the wire until [`transmit`](Self::transmit). Fails
    /// once the buffer holds [`TRANSMIT_BUFFER_CAPACITY`] bytes.
    pub fn write(&mut self, handle: BusHandle, byte: u8) -> Result<()> {
        let link = self.link_mut(handle)?;
        if link.tx_used >= TRANSMIT_BUFFER_CAPACITY {
            return Err(Error::TransmitBufferFull(TRANSMIT_BUFFER_CAPACITY));
        }
        link.tx[link.tx_used] = byte;
        link.tx_used += 1;
        Ok(())
    }

    /// Push the transmit buffer out to the device
    ///
    /// The buffer empties whether or not the driver takes the bytes, so a
    /// failed transmit never leaves stale data queued for the next one.
    /// Anything short of a full write is an error.
    pub fn transmit(&mut self, handle: BusHandle) -> Result<()> {
        let link = self.link_mut(handle)?;
        let used = link.tx_used;
        if used == 0 {
            return Ok(());
        }

        log::debug!(
            "BusManager: TX {} bytes on handle {}: {:02X?}",
            used,
            handle,
            &link.tx[..used]
        );
        let outcome = link.transport.write(&link.tx[..used]);
        link.tx_used = 0;

        let written = outcome?;
        if written != used {
            return Err(Error::TransmitIncomplete {
                written,
                expected: used,
            });
        }
        link.transport.flush()
    }

    /// Read one byte, blocking up to the configured read timeout
    pub fn read(&mut self, handle: BusHandle) -> Result<u8> {
        let link = self.link_mut(handle)?;
        let mut buf = [0u8; 1];
        let count = link.transport.read(&mut buf)?;
        if count == 1 {
            Ok(buf[0])
        } else {
            Err(Error::Timeout)
        }
    }

    // === Status ===

    /// Cumulative status word of an open device, zero since open until
    /// [`merge_status`](Self::merge_status) sets bits
    pub fn cumulative_status(&self, handle: BusHandle) -> Result<u32> {
        Ok(self.link(handle)?.cumulative_status)
    }

    /// OR status bits into the device's cumulative status word
    pub fn merge_status(&mut self, handle: BusHandle, status: u32) -> Result<()> {
        self.link_mut(handle)?.cumulative_status |= status;
        Ok(())
    }

    // === Configuration ===

    /// Connection settings used for the next `open`
    pub fn config(&self) -> &BusConfig {
        &self.config
    }

    /// Set the baud rate for devices opened after this call
    ///
    /// Devices already open keep the speed they were opened with.
    pub fn set_baud_rate(&mut self, baud_rate: u32) {
        self.config.baud_rate = baud_rate;
    }

    // === Internal ===

    fn free_slot(&self) -> Result<usize> {
        self.slots
            .iter()
            .position(|slot| slot.is_none())
            .ok_or(Error::NoFreeSlot)
    }

    fn link(&self, handle: BusHandle) -> Result<&BusLink> {
        self.slots
            .get(handle.0)
            .and_then(|slot| slot.as_ref())
            .ok_or(Error::InvalidHandle(handle))
    }

    fn link_mut(&mut self, handle: BusHandle) -> Result<&mut BusLink> {
        self.slots
            .get_mut(handle.0)
            .and_then(|slot| slot.as_mut())
            .ok_or(Error::InvalidHandle(handle))
    }

    fn open_transport(&self, kind: TransportKind, name: &str) -> Result<Box<dyn Transport>> {
        let timeout = self.config.read_timeout();
        match kind {
            TransportKind::Serial => Ok(Box::new(SerialTransport::open(
                name,
                self.config.baud_rate,
                timeout,
            )?)),
            TransportKind::Tcp => Ok(Box::new(TcpTransport::connect(
                name,
                self.config.tcp_port,
                timeout,
            )?)),
            #[cfg(feature = "usb")]
            TransportKind::UsbSerial => Ok(Box::new(UsbSerialTransport::open(
                name,
                self.config.baud_rate,
                timeout,
            )?)),
            #[cfg(not(feature = "usb"))]
            TransportKind::UsbSerial => {
                log::debug!(
                    "BusManager: device name {:?} did not match any supported transport",
                    name
                );
                Err(Error::UnsupportedDevice(name.to_string()))
            }
            // classify never yields Attached, slots get it via attach only
            TransportKind::Attached => Err(Error::UnsupportedDevice(name.to_string())),
        }
    }
}

impl Default for BusManager {
    fn default() -> Self {
        Self::new()
    }
}

// === Device enumeration ===

/// Number of USB-serial bus devices currently detected
///
/// Re-enumerates on every call, so the count can change as adapters come
/// and go. Zero when the `usb` feature is off or enumeration fails.
#[cfg(feature = "usb")]
pub fn detected_device_count() -> usize {
    match crate::transport::detect_devices() {
        Ok(devices) => devices.len(),
        Err(e) => {
            log::warn!("BusManager: USB enumeration failed: {}", e);
            0
        }
    }
}

/// Number of USB-serial bus devices currently detected
///
/// Always zero in builds without the `usb` feature.
#[cfg(not(feature = "usb"))]
pub fn detected_device_count() -> usize {
    0
}

/// Details of the `index`-th detected USB-serial bus device
///
/// Indexes follow the order of [`detected_device_count`] at the time of the
/// call.
#[cfg(feature = "usb")]
pub fn detected_device_info(index: usize) -> Result<BusDeviceInfo> {
    let mut devices = crate::transport::detect_devices()?;
    if index < devices.len() {
        Ok(devices.swap_remove(index))
    } else {
        Err(Error::DeviceNotFound(format!("FTDI{}", index)))
    }
}

/// Details of the `index`-th detected USB-serial bus device
///
/// Always fails in builds without the `usb` feature.
#[cfg(not(feature = "usb"))]
pub fn detected_device_info(_index: usize) -> Result<BusDeviceInfo> {
    Err(Error::UsbSupportDisabled)
}

//! TCP socket transport
//!
//! Connects to serial-to-Ethernet bridges that expose a drive bus as a raw
//! TCP stream. Baud rate has no meaning here; the bridge fixes the line
//! speed on its own serial side.

use super::Transport;
use crate::error::{Error, Result};
use std::io::{Read, Write};
use std::net::{Ipv4Addr, Shutdown, SocketAddr, TcpStream};
use std::time::Duration;

/// How long to wait for the bridge to accept the connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Parse a device name of the form `a.b.c.d` or `a.b.c.d:port`
///
/// Returns `None` unless the address part is a well-formed IPv4 dotted quad
/// and the port, when present, fits in a `u16`.
pub(crate) fn parse_device_address(name: &str) -> Option<(Ipv4Addr, Option<u16>)> {
    match name.split_once(':') {
        Some((ip, port)) => {
            let ip: Ipv4Addr = ip.parse().ok()?;
            let port: u16 = port.parse().ok()?;
            Some((ip, Some(port)))
        }
        None => name.parse().ok().map(|ip| (ip, None)),
    }
}

/// Transport over a raw TCP connection
pub struct TcpTransport {
    stream: TcpStream,
}

impl TcpTransport {
    /// Connect to a TCP bus device
    ///
    /// # Arguments
    ///
    /// * `name` - `a.b.c.d` or `a.b.c.d:port` device name
    /// * `default_port` - Port used when the name carries none
    /// * `read_timeout` - Blocking read timeout once connected
    pub fn connect(name: &str, default_port: u16, read_timeout: Duration) -> Result<Self> {
        let (ip, port) = parse_device_address(name)
            .ok_or_else(|| Error::UnsupportedDevice(name.to_string()))?;
        let addr = SocketAddr::from((ip, port.unwrap_or(default_port)));

        let stream = TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT)?;
        stream.set_nodelay(true)?;
        stream.set_read_timeout(Some(read_timeout))?;

        log::info!("Connected to TCP bus device at {}", addr);
        Ok(Self { stream })
    }
}

impl Transport for TcpTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.stream.read(buffer) {
            // A closed peer reads as 0 bytes, same as a quiet line
            Ok(n) => Ok(n),
            Err(e)
                if e.kind() == std::io::ErrorKind::WouldBlock
                    || e.kind() == std::io::ErrorKind::TimedOut =>
            {
                Ok(0)
            }
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let written = self.stream.write(data)?;
        Ok(written)
    }

    fn flush(&mut self) -> Result<()> {
        self.stream.flush()?;
        Ok(())
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

//! Serial port transport
//!
//! Drives a local serial port (`COM*` on Windows, `/dev/tty*` and
//! `/dev/cu.*` elsewhere) in the 8N1 framing motor drives expect.

use super::Transport;
use crate::error::{Error, Result};
use serialport::SerialPort;
use std::io::{Read, Write};
use std::time::Duration;

/// Transport over a local serial port
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open a serial port in 8N1 mode with no flow control
    ///
    /// # Arguments
    ///
    /// * `path` - Port path, e.g. `/dev/ttyUSB0` or `COM3`
    /// * `baud_rate` - Line speed in BPS
    /// * `timeout` - Blocking read timeout
    pub fn open(path: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(path, baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(timeout)
            .open()?;

        log::info!("Opened serial port {} at {} baud", path, baud_rate);
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        match self.port.read(buffer) {
            Ok(n) => Ok(n),
            // Timeout means no data arrived, not a broken port
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(0),
            Err(e) => Err(Error::Io(e)),
        }
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let written = self.port.write(data)?;
        Ok(written)
    }

    fn flush(&mut self) -> Result<()> {
        self.port.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_port_fails() {
        let result = SerialTransport::open(
            "/dev/ttyDOESNOTEXIST99",
            460_800,
            Duration::from_millis(100),
        );
        assert!(result.is_err());
    }
}

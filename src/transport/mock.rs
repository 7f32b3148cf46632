//! Mock transport for tests and drive simulators
//!
//! Records everything written and replays bytes queued by the test. Clones
//! share the same buffers, so a test can keep one handle for inspection
//! after attaching the other to a bus slot.

use super::Transport;
use crate::error::Result;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// In-memory transport double
#[derive(Clone)]
pub struct MockTransport {
    inner: Arc<Mutex<MockInner>>,
}

struct MockInner {
    read_queue: VecDeque<u8>,
    written: Vec<u8>,
    loopback: bool,
    write_limit: Option<usize>,
}

impl MockTransport {
    /// New silent mock: reads return nothing until bytes are pushed
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockInner {
                read_queue: VecDeque::new(),
                written: Vec::new(),
                loopback: false,
                write_limit: None,
            })),
        }
    }

    /// New loopback mock: every accepted write becomes readable
    pub fn loopback() -> Self {
        let mock = Self::new();
        mock.inner.lock().unwrap().loopback = true;
        mock
    }

    /// Queue bytes for subsequent reads
    pub fn push_read(&self, data: &[u8]) {
        self.inner.lock().unwrap().read_queue.extend(data);
    }

    /// Everything written so far
    pub fn written(&self) -> Vec<u8> {
        self.inner.lock().unwrap().written.clone()
    }

    /// Forget recorded writes
    pub fn clear_written(&self) {
        self.inner.lock().unwrap().written.clear();
    }

    /// Cap how many bytes a single write accepts, `None` for no cap
    pub fn set_write_limit(&self, limit: Option<usize>) {
        self.inner.lock().unwrap().write_limit = limit;
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        let count = buffer.len().min(inner.read_queue.len());
        for slot in buffer.iter_mut().take(count) {
            if let Some(byte) = inner.read_queue.pop_front() {
                *slot = byte;
            }
        }
        Ok(count)
    }

    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut inner = self.inner.lock().unwrap();
        let accepted = match inner.write_limit {
            Some(limit) => data.len().min(limit),
            None => data.len(),
        };
        inner.written.extend_from_slice(&data[..accepted]);
        if inner.loopback {
            inner.read_queue.extend(&data[..accepted]);
        }
        Ok(accepted)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_read_then_read() {
        let mock = MockTransport::new();
        mock.push_read(&[1, 2, 3]);

        let mut reader = mock.clone();
        let mut buf = [0u8; 2];
        assert_eq!(reader.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(reader.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 3);
        assert_eq!(reader.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_write_is_recorded() {
        let mock = MockTransport::new();
        let mut writer = mock.clone();
        assert_eq!(writer.write(&[0xDE, 0xAD]).unwrap(), 2);
        assert_eq!(mock.written(), vec![0xDE, 0xAD]);
        mock.clear_written();
        assert!(mock.written().is_empty());
    }

    #[test]
    fn test_loopback_echoes_writes() {
        let mock = MockTransport::loopback();
        let mut transport = mock.clone();
        transport.write(&[7, 8]).unwrap();

        let mut buf = [0u8; 4];
        assert_eq!(transport.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[7, 8]);
    }

    #[test]
    fn test_write_limit_truncates() {
        let mock = MockTransport::new();
        mock.set_write_limit(Some(3));
        let mut writer = mock.clone();
        assert_eq!(writer.write(&[1, 2, 3, 4, 5]).unwrap(), 3);
        assert_eq!(mock.written(), vec![1, 2, 3]);
    }
}

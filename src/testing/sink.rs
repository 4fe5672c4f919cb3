//! In-memory datagram sink

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::net::DatagramSink;

/// Keeps every datagram it is given
#[derive(Debug, Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<Vec<u8>>>,
    failing: AtomicBool,
}

impl RecordingSink {
    /// Empty sink that accepts everything
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends fail with `WouldBlock`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Datagrams accepted so far
    #[must_use]
    pub fn datagrams(&self) -> Vec<Vec<u8>> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of datagrams accepted
    #[must_use]
    pub fn len(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether nothing has been accepted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DatagramSink for RecordingSink {
    fn send_datagram(&self, payload: &[u8]) -> io::Result<usize> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::WouldBlock, "sink full"));
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(payload.to_vec());
        Ok(payload.len())
    }
}

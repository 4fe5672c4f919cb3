//! Network layer
//!
//! Interface selection and the multicast UDP transmit primitive shared by the
//! media stream and the session announcements.

mod interface;
mod multicast;

#[cfg(test)]
mod tests;

pub use interface::{default_multicast_group, pick_ipv4, select_interface};
pub use multicast::MulticastSender;

use std::io;

/// Fire-and-forget datagram transmit
///
/// Implementations must not block: a send that cannot complete immediately
/// fails and the datagram is lost.
pub trait DatagramSink: Send + Sync {
    /// Send one datagram to the sink's destination
    fn send_datagram(&self, payload: &[u8]) -> io::Result<usize>;
}

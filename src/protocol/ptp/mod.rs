//! Precision Time Protocol (PTP, IEEE 1588) clock interface.
//!
//! AES67 senders stamp media with the PTP time of the first sample in each
//! packet. This module holds the timestamp type, its mapping onto the media
//! clock and the [`ClockSource`] abstraction over the external PTP client.

pub mod clock;
pub mod timestamp;

#[cfg(test)]
mod tests;

pub use clock::{ClockSource, SystemClock, wait_for_source};
pub use timestamp::PtpTimestamp;

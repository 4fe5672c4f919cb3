//! State shared between the capture callback and the drift timer

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::Serialize;

/// Observation count lives in the low bits of the packed drift word
const COUNT_BITS: u32 = 20;
const COUNT_MASK: u64 = (1 << COUNT_BITS) - 1;

/// Largest offset recorded for a single observation
pub(crate) const MAX_OFFSET: u32 = (1 << 24) - 1;

/// Counters and flags touched from more than one context
///
/// Mutation points:
/// - capture callback: [`take_resync`](Self::take_resync),
///   [`record_offset`](Self::record_offset) and the packet counters
/// - drift timer: [`take_window`](Self::take_window),
///   [`request_resync`](Self::request_resync)
///
/// The drift window is a single atomic word holding both the offset sum and
/// the observation count, so the timer reads and clears it in one swap.
#[derive(Debug)]
pub struct SyncState {
    needs_resync: AtomicBool,
    drift_window: AtomicU64,
    packets_sent: AtomicU64,
    packets_dropped: AtomicU64,
    send_errors: AtomicU64,
    resyncs: AtomicU64,
}

impl Default for SyncState {
    fn default() -> Self {
        Self::new()
    }
}

impl SyncState {
    /// Create state for a new stream
    ///
    /// A resync is pending so the first packet anchors to the wall clock.
    #[must_use]
    pub fn new() -> Self {
        Self {
            needs_resync: AtomicBool::new(true),
            drift_window: AtomicU64::new(0),
            packets_sent: AtomicU64::new(0),
            packets_dropped: AtomicU64::new(0),
            send_errors: AtomicU64::new(0),
            resyncs: AtomicU64::new(0),
        }
    }

    /// Ask the synchronizer to realign on its next packet
    pub fn request_resync(&self) {
        self.needs_resync.store(true, Ordering::Release);
    }

    /// Consume a pending resync request
    pub fn take_resync(&self) -> bool {
        self.needs_resync.swap(false, Ordering::AcqRel)
    }

    /// Whether a resync is pending
    #[must_use]
    pub fn resync_pending(&self) -> bool {
        self.needs_resync.load(Ordering::Acquire)
    }

    /// Add one offset observation to the current window
    ///
    /// Offsets are clamped to 24 bits. Once the window holds its maximum
    /// number of observations, further ones are ignored until it is reset.
    pub fn record_offset(&self, offset: u32) {
        if self.drift_window.load(Ordering::Relaxed) & COUNT_MASK == COUNT_MASK {
            return;
        }
        let offset = u64::from(offset.min(MAX_OFFSET));
        self.drift_window
            .fetch_add((offset << COUNT_BITS) | 1, Ordering::AcqRel);
    }

    /// Read and reset the current window, returning `(sum, count)`
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Masked to COUNT_BITS"
    )]
    pub fn take_window(&self) -> (u64, u32) {
        let packed = self.drift_window.swap(0, Ordering::AcqRel);
        (packed >> COUNT_BITS, (packed & COUNT_MASK) as u32)
    }

    pub(crate) fn packet_sent(&self) {
        self.packets_sent.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn packet_dropped(&self) {
        self.packets_dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn send_failed(&self) {
        self.send_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn resync_requested(&self) {
        self.resyncs.fetch_add(1, Ordering::Relaxed);
    }

    /// Snapshot of the stream counters
    #[must_use]
    pub fn stats(&self) -> StreamStats {
        StreamStats {
            packets_sent: self.packets_sent.load(Ordering::Relaxed),
            packets_dropped: self.packets_dropped.load(Ordering::Relaxed),
            send_errors: self.send_errors.load(Ordering::Relaxed),
            resyncs: self.resyncs.load(Ordering::Relaxed),
        }
    }
}

/// Stream statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    /// Packets handed to the network
    pub packets_sent: u64,
    /// Batches discarded before transmission (malformed or unconvertible)
    pub packets_dropped: u64,
    /// Packets the network refused
    pub send_errors: u64,
    /// Resyncs requested by the drift monitor
    pub resyncs: u64,
}

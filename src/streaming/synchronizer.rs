//! Media timestamp generation
//!
//! The outgoing timestamp is a running estimate that advances by exactly one
//! packet per packet. The wall clock is only consulted to anchor it, on the
//! first packet and whenever the drift monitor asks for a resync, and to
//! report how far the estimate has wandered.

use std::sync::Arc;

use super::state::SyncState;
use crate::protocol::ptp::ClockSource;

/// Round a media time down to the nearest packet boundary
#[must_use]
pub fn snap_to_packet(media_time: u32, frames_per_packet: u32) -> u32 {
    if frames_per_packet == 0 {
        return media_time;
    }
    media_time / frames_per_packet * frames_per_packet
}

/// Distance between two media times on the 32-bit circle
fn wrapping_distance(a: u32, b: u32) -> u32 {
    let d = a.wrapping_sub(b);
    d.min(d.wrapping_neg())
}

/// Maintains the timestamp of the next outgoing packet
#[derive(Debug)]
pub struct TimestampSynchronizer {
    estimate: u32,
    frames_per_packet: u32,
    sample_rate: u32,
    state: Arc<SyncState>,
}

impl TimestampSynchronizer {
    /// Create a synchronizer that anchors on its first packet
    #[must_use]
    pub fn new(frames_per_packet: u32, sample_rate: u32, state: Arc<SyncState>) -> Self {
        Self {
            estimate: 0,
            frames_per_packet,
            sample_rate,
            state,
        }
    }

    /// Create a synchronizer already anchored at `estimate`
    ///
    /// Clears any pending resync on `state`.
    #[must_use]
    pub fn with_estimate(
        estimate: u32,
        frames_per_packet: u32,
        sample_rate: u32,
        state: Arc<SyncState>,
    ) -> Self {
        state.take_resync();
        Self {
            estimate,
            frames_per_packet,
            sample_rate,
            state,
        }
    }

    /// Current estimate, without consulting the clock
    #[must_use]
    pub fn estimate(&self) -> u32 {
        self.estimate
    }

    /// Timestamp for the packet about to be sent
    ///
    /// Realigns to the clock, snapped to a packet boundary, if a resync is
    /// pending. Otherwise returns the running estimate unchanged.
    pub fn next_timestamp(&mut self, clock: &dyn ClockSource) -> u32 {
        if self.state.take_resync() {
            let media_time = clock.now().to_media_time(self.sample_rate);
            self.estimate = snap_to_packet(media_time, self.frames_per_packet);
        }
        self.estimate
    }

    /// Report the current gap between the estimate and the clock
    ///
    /// Returns the offset in samples that was recorded.
    pub fn observe(&self, clock: &dyn ClockSource) -> u32 {
        let media_time = clock.now().to_media_time(self.sample_rate);
        let offset = wrapping_distance(media_time, self.estimate);
        self.state.record_offset(offset);
        offset
    }

    /// Move the estimate to the next packet
    pub fn advance(&mut self) {
        self.estimate = self.estimate.wrapping_add(self.frames_per_packet);
    }
}

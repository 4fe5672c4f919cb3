//! Drift window evaluation

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use super::state::SyncState;
use crate::audio::PacketTime;

/// Outcome of one drift window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftDecision {
    /// No observations were made
    Idle,
    /// Average offset within one packet
    InSync {
        /// Rounded average offset in samples
        average: u64,
    },
    /// Average offset exceeds one packet; realign
    Resync {
        /// Rounded average offset in samples
        average: u64,
    },
}

/// Decide whether a window with `sum` over `count` observations needs a resync
///
/// The average is rounded half up. An empty window is never a resync.
#[must_use]
pub fn evaluate_window(sum: u64, count: u32, frames_per_packet: u32) -> DriftDecision {
    if count == 0 {
        return DriftDecision::Idle;
    }
    let count = u64::from(count);
    let average = (sum + count / 2) / count;
    if average > u64::from(frames_per_packet) {
        DriftDecision::Resync { average }
    } else {
        DriftDecision::InSync { average }
    }
}

/// Periodically checks the synchronizer's drift and requests resyncs
#[derive(Debug)]
pub struct DriftMonitor {
    state: Arc<SyncState>,
    frames_per_packet: u32,
    packet_time: PacketTime,
    window: Duration,
}

impl DriftMonitor {
    /// Create a monitor evaluating every `window`
    #[must_use]
    pub fn new(
        state: Arc<SyncState>,
        frames_per_packet: u32,
        packet_time: PacketTime,
        window: Duration,
    ) -> Self {
        Self {
            state,
            frames_per_packet,
            packet_time,
            window,
        }
    }

    /// Close the current window and act on it
    ///
    /// The window is reset whatever the outcome.
    pub fn check_window(&self) -> DriftDecision {
        let (sum, count) = self.state.take_window();
        let decision = evaluate_window(sum, count, self.frames_per_packet);

        if let DriftDecision::Resync { average } = decision {
            self.state.request_resync();
            self.state.resync_requested();
            tracing::info!(
                "Resyncing, offset {:.3} ms",
                self.offset_millis(average)
            );
        }

        decision
    }

    /// Convert an offset in samples to milliseconds
    #[allow(
        clippy::cast_precision_loss,
        reason = "Offsets are at most 24 bits"
    )]
    #[must_use]
    pub fn offset_millis(&self, average: u64) -> f64 {
        if self.frames_per_packet == 0 {
            return 0.0;
        }
        average as f64 / f64::from(self.frames_per_packet) * self.packet_time.as_millis_f64()
    }

    /// Evaluate a window every period until cancelled
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = interval(self.window);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    tracing::debug!("Drift monitor stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.check_window();
                }
            }
        }
    }
}

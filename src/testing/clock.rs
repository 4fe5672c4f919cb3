//! Hand-driven clock

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::watch;

use crate::protocol::ptp::{ClockSource, PtpTimestamp};

/// Clock whose time and source are set explicitly
///
/// Starts at the epoch with no time source.
#[derive(Debug)]
pub struct ManualClock {
    nanos: AtomicU64,
    source: watch::Sender<Option<String>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    /// Unsynchronized clock at time zero
    #[must_use]
    pub fn new() -> Self {
        let (source, _) = watch::channel(None);
        Self {
            nanos: AtomicU64::new(0),
            source,
        }
    }

    /// Clock already following `identity`, reading `seconds.nanoseconds`
    #[must_use]
    pub fn synced(identity: &str, seconds: u64, nanoseconds: u32) -> Self {
        let clock = Self::new();
        clock.set(PtpTimestamp::new(seconds, nanoseconds));
        clock.acquire(identity);
        clock
    }

    /// Report `identity` as the acquired time source
    pub fn acquire(&self, identity: &str) {
        self.source.send_replace(Some(identity.to_string()));
    }

    /// Jump to `time`
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Test clocks stay within u64 nanoseconds"
    )]
    pub fn set(&self, time: PtpTimestamp) {
        self.nanos.store(time.to_nanos() as u64, Ordering::SeqCst);
    }

    /// Move forward by `by`
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Test clocks stay within u64 nanoseconds"
    )]
    pub fn advance(&self, by: Duration) {
        self.nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> PtpTimestamp {
        PtpTimestamp::from_duration(Duration::from_nanos(self.nanos.load(Ordering::SeqCst)))
    }

    fn acquired(&self) -> watch::Receiver<Option<String>> {
        self.source.subscribe()
    }
}

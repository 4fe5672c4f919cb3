use std::sync::Arc;
use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tokio_util::sync::CancellationToken;

use super::descriptor::SessionDescriptor;
use crate::net::DatagramSink;

/// Repeats the session announcement until cancelled
pub struct SessionAnnouncer {
    descriptor: Arc<SessionDescriptor>,
    sink: Arc<dyn DatagramSink>,
    interval: Duration,
}

impl std::fmt::Debug for SessionAnnouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAnnouncer")
            .field("session", &self.descriptor.parameters().session_name)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

impl SessionAnnouncer {
    /// Create an announcer sending through `sink` every `interval`
    #[must_use]
    pub fn new(
        descriptor: Arc<SessionDescriptor>,
        sink: Arc<dyn DatagramSink>,
        interval: Duration,
    ) -> Self {
        Self {
            descriptor,
            sink,
            interval,
        }
    }

    /// Send the announcement once
    pub fn announce(&self) {
        match self.sink.send_datagram(self.descriptor.announcement()) {
            Ok(_) => tracing::debug!("Sent SAP announcement"),
            Err(e) => tracing::warn!("Failed to send SAP announcement: {}", e),
        }
    }

    /// Send the deletion once
    pub fn withdraw(&self) {
        match self.sink.send_datagram(self.descriptor.deletion()) {
            Ok(_) => tracing::debug!("Sent SAP deletion"),
            Err(e) => tracing::warn!("Failed to send SAP deletion: {}", e),
        }
    }

    /// Announce now and on every interval; withdraw the session when cancelled
    pub async fn run(self, cancel: CancellationToken) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            "Announcing session \"{}\" every {:?}",
            self.descriptor.parameters().session_name,
            self.interval
        );

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    self.withdraw();
                    break;
                }
                _ = ticker.tick() => self.announce(),
            }
        }
    }
}

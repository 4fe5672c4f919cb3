//! Wall clock collaborator.
//!
//! The PTP client itself lives outside this crate. It disciplines a clock and
//! reports which grandmaster it follows; the stream only needs to read the
//! current time without blocking and to learn, once, that a time source has
//! been acquired.

use std::time::Duration;

use tokio::sync::watch;

use super::timestamp::PtpTimestamp;
use crate::error::Aes67Error;

/// A synchronized wall clock.
pub trait ClockSource: Send + Sync {
    /// Current wall-clock time. Must not block.
    fn now(&self) -> PtpTimestamp;

    /// Subscribe to the identity of the current time source.
    ///
    /// The value is `None` until a source has been acquired.
    fn acquired(&self) -> watch::Receiver<Option<String>>;

    /// Identity of the current time source, if any.
    fn source_identity(&self) -> Option<String> {
        self.acquired().borrow().clone()
    }
}

/// Wait until `clock` reports a time source.
///
/// # Errors
///
/// Returns `Aes67Error::ClockNotSynchronized` if no source is reported within
/// `timeout`, or if the clock goes away while waiting.
pub async fn wait_for_source(
    clock: &dyn ClockSource,
    timeout: Duration,
) -> Result<String, Aes67Error> {
    let mut rx = clock.acquired();
    let not_synced = Aes67Error::ClockNotSynchronized { timeout };

    match tokio::time::timeout(timeout, rx.wait_for(Option::is_some)).await {
        Ok(Ok(identity)) => identity.clone().ok_or(not_synced),
        Ok(Err(_)) | Err(_) => Err(not_synced),
    }
}

/// Clock backed by the host's system time.
///
/// For hosts whose system clock is already disciplined to the PTP
/// grandmaster by an external daemon. The grandmaster identity is supplied by
/// the caller.
#[derive(Debug)]
pub struct SystemClock {
    identity: watch::Sender<Option<String>>,
}

impl SystemClock {
    /// Create a clock following the grandmaster `identity`
    /// (e.g. `00-1D-C1-FF-FE-12-34-56:0`).
    #[must_use]
    pub fn new(identity: impl Into<String>) -> Self {
        let (identity, _) = watch::channel(Some(identity.into()));
        Self { identity }
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> PtpTimestamp {
        PtpTimestamp::now()
    }

    fn acquired(&self) -> watch::Receiver<Option<String>> {
        self.identity.subscribe()
    }
}

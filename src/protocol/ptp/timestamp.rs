//! PTP time and its projection onto the RTP media clock.
//!
//! With `a=mediaclk:direct=0` the RTP timestamp of a sample is simply the PTP
//! time of that sample counted in sample periods, wrapped to 32 bits.

use std::fmt;
use std::ops::Add;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// An instant on the PTP timescale
///
/// Ordering is chronological: seconds first, then nanoseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PtpTimestamp {
    /// Whole seconds since the epoch
    pub seconds: u64,
    /// Sub-second part, always below [`PtpTimestamp::NANOS_PER_SEC`]
    pub nanoseconds: u32,
}

impl PtpTimestamp {
    /// Length of one second in nanoseconds
    pub const NANOS_PER_SEC: u32 = 1_000_000_000;

    /// The epoch
    pub const ZERO: Self = Self::new(0, 0);

    /// Build a timestamp. A nanosecond count of a full second or more is
    /// pinned to the last nanosecond of `seconds`.
    #[must_use]
    pub const fn new(seconds: u64, nanoseconds: u32) -> Self {
        let nanoseconds = if nanoseconds < Self::NANOS_PER_SEC {
            nanoseconds
        } else {
            Self::NANOS_PER_SEC - 1
        };
        Self {
            seconds,
            nanoseconds,
        }
    }

    /// Host time, read as PTP time
    ///
    /// Only meaningful when the host clock is disciplined by a PTP daemon.
    #[must_use]
    pub fn now() -> Self {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(Self::from)
            .unwrap_or_default()
    }

    /// Nanoseconds since the epoch
    #[must_use]
    pub fn to_nanos(&self) -> u128 {
        u128::from(self.seconds) * u128::from(Self::NANOS_PER_SEC) + u128::from(self.nanoseconds)
    }

    /// RTP timestamp of this instant for a stream at `sample_rate` Hz
    ///
    /// The sub-second part is rounded half up to the nearest sample.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "RTP timestamps wrap at 2^32"
    )]
    pub fn to_media_time(&self, sample_rate: u32) -> u32 {
        let rate = u64::from(sample_rate);
        let second = u64::from(Self::NANOS_PER_SEC);
        let samples_in_second = (u64::from(self.nanoseconds) * rate + second / 2) / second;
        (self.seconds.wrapping_mul(rate).wrapping_add(samples_in_second)) as u32
    }

    /// Time since the epoch
    #[must_use]
    pub fn to_duration(&self) -> Duration {
        Duration::new(self.seconds, self.nanoseconds)
    }

    /// Instant `d` after the epoch
    #[must_use]
    pub fn from_duration(d: Duration) -> Self {
        Self::new(d.as_secs(), d.subsec_nanos())
    }

    /// Instant `d` later
    #[must_use]
    pub fn add_duration(&self, d: Duration) -> Self {
        *self + d
    }
}

impl Add<Duration> for PtpTimestamp {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self::from_duration(self.to_duration() + rhs)
    }
}

impl fmt::Display for PtpTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:09}", self.seconds, self.nanoseconds)
    }
}

impl From<Duration> for PtpTimestamp {
    fn from(d: Duration) -> Self {
        Self::from_duration(d)
    }
}

impl From<PtpTimestamp> for Duration {
    fn from(ts: PtpTimestamp) -> Self {
        ts.to_duration()
    }
}

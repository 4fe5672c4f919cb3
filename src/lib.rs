//! # aes67-send
//!
//! Stream live audio as an AES67 multicast RTP stream, clocked from PTP and
//! announced over SAP.
//!
//! ## Features
//!
//! - L16/L24 linear PCM at 44.1 to 96 kHz, up to eight channels
//! - RTP timestamps anchored to a PTP-disciplined wall clock, with drift
//!   detection and packet-aligned resync
//! - SAP/SDP session announcements
//! - Explicit interface binding for multi-homed hosts
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use aes67_send::audio::create_default_capture;
//! use aes67_send::protocol::ptp::SystemClock;
//! use aes67_send::{Aes67Session, SessionConfig};
//!
//! # async fn example() -> Result<(), aes67_send::Aes67Error> {
//! let config = SessionConfig::builder().stream_name("Stage Left").build();
//! let clock = Arc::new(SystemClock::new("00-1D-C1-FF-FE-12-34-56:0"));
//! let capture = create_default_capture()?;
//!
//! let session = Aes67Session::start(config, clock, capture).await?;
//! // ...
//! session.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Session**: `Aes67Session` - startup ordering and lifecycle
//! - **Streaming**: conversion, timestamping and packet assembly on the
//!   capture thread, drift evaluation on a timer
//! - **Protocol**: RTP, SAP, SDP and PTP time handling

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Public modules
/// Error types
pub mod error;
/// Core types
pub mod types;

/// Testing utilities
pub mod testing;

pub mod audio;
pub mod discovery;
pub mod net;
pub mod protocol;
pub mod session;
pub mod streaming;

// Re-exports
pub use audio::{PacketTime, SampleRate, StreamFormat, WireEncoding};
pub use error::Aes67Error;
pub use session::{Aes67Session, RunningSession, Transport};
pub use streaming::StreamStats;
pub use types::SessionConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
///
/// Convenient re-exports
pub mod prelude {
    pub use crate::{
        Aes67Error, Aes67Session, PacketTime, RunningSession, SampleRate, SessionConfig,
        StreamStats, WireEncoding,
    };
}

//! Deterministic collaborators for tests, benches and demos
//!
//! Stand-ins for the clock, the network and the capture hardware. None of
//! them touch real devices or sockets.

mod capture;
mod clock;
mod sink;

#[cfg(test)]
mod tests;

pub use capture::{CaptureHandle, ScriptedCapture};
pub use clock::ManualClock;
pub use sink::RecordingSink;

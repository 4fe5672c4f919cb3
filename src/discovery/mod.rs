//! Session discovery via SAP announcements
//!
//! Receivers learn about the stream from an SDP description multicast on the
//! well-known SAP group. The description is built once, when the clock is
//! known to be synchronized, and repeated until the session ends.

mod announcer;
mod descriptor;


pub use announcer::SessionAnnouncer;
pub use descriptor::{SessionDescriptor, SessionParameters};

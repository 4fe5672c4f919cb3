//! Real-time packetization engine
//!
//! Everything here runs either inside the capture callback (conversion,
//! timestamping, packet assembly) or on the drift window timer. The two
//! contexts share a single [`SyncState`] and nothing else.

mod assembler;
mod drift;
mod state;
mod synchronizer;


pub use assembler::{AssembleError, PacketAssembler};
pub use drift::{DriftDecision, DriftMonitor, evaluate_window};
pub use state::{StreamStats, SyncState};
pub use synchronizer::{TimestampSynchronizer, snap_to_packet};

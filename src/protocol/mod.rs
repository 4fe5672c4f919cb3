//! Wire protocols: RTP media packets, SAP announcements carrying SDP, and
//! the PTP clock interface.

pub mod ptp;
pub mod rtp;
pub mod sap;
pub mod sdp;

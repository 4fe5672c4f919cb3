//! RTP packet format for the AES67 media stream

#![allow(missing_docs)]

mod packet;


pub use packet::{DYNAMIC_PAYLOAD_TYPE, RtpDecodeError, RtpHeader, RtpPacket};

/// RTP constants for AES67
pub mod constants {
    /// Default RTP media port
    pub const MEDIA_PORT: u16 = 5004;
}

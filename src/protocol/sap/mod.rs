//! SAP (Session Announcement Protocol, RFC 2974)
//!
//! Session descriptions are multicast periodically to a well-known group so
//! that receivers on the local network can find the stream.

#[cfg(test)]
mod tests;

use std::net::Ipv4Addr;

use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Administratively scoped SAP group used by AES67 devices
pub const SAP_MULTICAST_GROUP: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 255);

/// Well-known SAP port
pub const SAP_PORT: u16 = 9875;

/// Payload type tag for SDP bodies
pub const SDP_CONTENT_TYPE: &str = "application/sdp";

/// Message identifier hash sent with every announcement
pub const DEFAULT_MESSAGE_ID_HASH: u16 = 0xEFEF;

const SAP_VERSION: u8 = 1;
const FLAG_IPV6: u8 = 0x10;
const FLAG_DELETION: u8 = 0x04;
const FLAG_ENCRYPTED: u8 = 0x02;
const FLAG_COMPRESSED: u8 = 0x01;

/// SAP message type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SapMessageType {
    /// Session is (still) available
    Announcement,
    /// Session has ended
    Deletion,
}

/// SAP decode errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SapDecodeError {
    /// Packet shorter than its header
    #[error("buffer too small: need {needed} bytes, have {have}")]
    BufferTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes available
        have: usize,
    },

    /// Version other than 1
    #[error("unsupported SAP version: {0}")]
    UnsupportedVersion(u8),

    /// IPv6 origin, encrypted or compressed payload
    #[error("unsupported SAP flags: 0x{0:02x}")]
    UnsupportedFlags(u8),

    /// Payload type tag lacks its NUL terminator
    #[error("payload type is not terminated")]
    UnterminatedPayloadType,

    /// Payload type or body is not UTF-8
    #[error("payload is not valid UTF-8")]
    InvalidUtf8,
}

/// Fixed SAP header for an IPv4 originator without authentication
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SapHeader {
    /// Announcement or deletion
    pub message_type: SapMessageType,
    /// Message identifier hash
    pub message_id_hash: u16,
    /// Originating source address
    pub origin: Ipv4Addr,
}

impl SapHeader {
    /// Encoded header size
    pub const SIZE: usize = 8;

    /// Create an announcement header
    #[must_use]
    pub fn announcement(origin: Ipv4Addr) -> Self {
        Self {
            message_type: SapMessageType::Announcement,
            message_id_hash: DEFAULT_MESSAGE_ID_HASH,
            origin,
        }
    }

    /// First header byte: V=1, IPv4, not encrypted, not compressed
    ///
    /// `0x20` for announcements, `0x24` for deletions.
    #[must_use]
    pub fn flags_byte(&self) -> u8 {
        let mut flags = SAP_VERSION << 5;
        if self.message_type == SapMessageType::Deletion {
            flags |= FLAG_DELETION;
        }
        flags
    }

    /// Append the header to `buf`
    pub fn encode_into(&self, buf: &mut impl BufMut) {
        buf.put_u8(self.flags_byte());
        // No authentication data
        buf.put_u8(0);
        buf.put_u16(self.message_id_hash);
        buf.put_slice(&self.origin.octets());
    }
}

/// Complete SAP message: header, payload type tag and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SapPacket {
    /// Packet header
    pub header: SapHeader,
    /// MIME payload type, e.g. `application/sdp`
    pub payload_type: String,
    /// Session description text
    pub payload: String,
}

impl SapPacket {
    /// Create an SDP announcement
    #[must_use]
    pub fn sdp(header: SapHeader, sdp: impl Into<String>) -> Self {
        Self {
            header,
            payload_type: SDP_CONTENT_TYPE.to_string(),
            payload: sdp.into(),
        }
    }

    /// Encode the packet to bytes
    #[must_use]
    pub fn encode(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(
            SapHeader::SIZE + self.payload_type.len() + 1 + self.payload.len(),
        );
        self.header.encode_into(&mut buf);
        buf.put_slice(self.payload_type.as_bytes());
        buf.put_u8(0);
        buf.put_slice(self.payload.as_bytes());
        buf.freeze()
    }

    /// Decode a packet
    ///
    /// Authentication data is skipped. Encrypted, compressed and IPv6
    /// originated packets are rejected.
    ///
    /// # Errors
    ///
    /// Returns `SapDecodeError` if the packet is truncated or unsupported.
    pub fn decode(buf: &[u8]) -> Result<Self, SapDecodeError> {
        if buf.len() < SapHeader::SIZE {
            return Err(SapDecodeError::BufferTooSmall {
                needed: SapHeader::SIZE,
                have: buf.len(),
            });
        }

        let flags = buf[0];
        let version = flags >> 5;
        if version != SAP_VERSION {
            return Err(SapDecodeError::UnsupportedVersion(version));
        }
        if flags & (FLAG_IPV6 | FLAG_ENCRYPTED | FLAG_COMPRESSED) != 0 {
            return Err(SapDecodeError::UnsupportedFlags(flags));
        }

        let auth_len = usize::from(buf[1]) * 4;
        let body_start = SapHeader::SIZE + auth_len;
        if buf.len() < body_start {
            return Err(SapDecodeError::BufferTooSmall {
                needed: body_start,
                have: buf.len(),
            });
        }

        let header = SapHeader {
            message_type: if flags & FLAG_DELETION == 0 {
                SapMessageType::Announcement
            } else {
                SapMessageType::Deletion
            },
            message_id_hash: u16::from_be_bytes([buf[2], buf[3]]),
            origin: Ipv4Addr::new(buf[4], buf[5], buf[6], buf[7]),
        };

        let body = &buf[body_start..];
        // The payload type is optional; a bare SDP body starts with "v=0"
        let (payload_type, payload) = if body.starts_with(b"v=0") {
            (SDP_CONTENT_TYPE.to_string(), body)
        } else {
            let nul = body
                .iter()
                .position(|&b| b == 0)
                .ok_or(SapDecodeError::UnterminatedPayloadType)?;
            let payload_type =
                std::str::from_utf8(&body[..nul]).map_err(|_| SapDecodeError::InvalidUtf8)?;
            (payload_type.to_string(), &body[nul + 1..])
        };

        let payload = std::str::from_utf8(payload).map_err(|_| SapDecodeError::InvalidUtf8)?;

        Ok(Self {
            header,
            payload_type,
            payload: payload.to_string(),
        })
    }
}

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;
use thiserror::Error;

/// Dynamic payload type used for the AES67 linear PCM stream
pub const DYNAMIC_PAYLOAD_TYPE: u8 = 96;

const VERSION: u8 = 2;
const VERSION_SHIFT: u8 = 6;
const PADDING_BIT: u8 = 0x20;
const EXTENSION_BIT: u8 = 0x10;
const CSRC_COUNT_MASK: u8 = 0x0F;
const MARKER_BIT: u8 = 0x80;
const PAYLOAD_TYPE_MASK: u8 = 0x7F;

/// Fixed RTP header as sent by this crate
///
/// Outgoing headers never carry padding, an extension or contributing
/// sources, so the first octet is always `0x80`. Decoding skips a CSRC list
/// and header extension if a peer sends one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RtpHeader {
    pub marker: bool,
    pub payload_type: u8,
    pub sequence: u16,
    pub timestamp: u32,
    pub ssrc: u32,
}

impl RtpHeader {
    /// Encoded size of the fixed header
    pub const SIZE: usize = 12;

    /// Audio header with the marker clear
    #[must_use]
    pub fn new_audio(sequence: u16, timestamp: u32, ssrc: u32, payload_type: u8) -> Self {
        Self {
            marker: false,
            payload_type,
            sequence,
            timestamp,
            ssrc,
        }
    }

    /// Write the header over the first [`RtpHeader::SIZE`] bytes of `buf`
    ///
    /// # Panics
    ///
    /// Panics if `buf` is shorter than [`RtpHeader::SIZE`].
    pub fn encode_into(&self, buf: &mut [u8]) {
        buf[0] = VERSION << VERSION_SHIFT;
        buf[1] = (self.payload_type & PAYLOAD_TYPE_MASK) | if self.marker { MARKER_BIT } else { 0 };
        BigEndian::write_u16(&mut buf[2..4], self.sequence);
        BigEndian::write_u32(&mut buf[4..8], self.timestamp);
        BigEndian::write_u32(&mut buf[8..12], self.ssrc);
    }

    /// Encoded header
    #[must_use]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        self.encode_into(&mut buf);
        buf
    }

    /// Decode the fixed header
    ///
    /// # Errors
    ///
    /// Returns `RtpDecodeError` if `buf` is shorter than the fixed header or
    /// the version is not 2.
    pub fn decode(buf: &[u8]) -> Result<Self, RtpDecodeError> {
        Self::decode_with_length(buf).map(|(header, _)| header)
    }

    /// Decode the header and return the offset of the payload
    fn decode_with_length(buf: &[u8]) -> Result<(Self, usize), RtpDecodeError> {
        ensure_len(buf, Self::SIZE)?;

        let version = buf[0] >> VERSION_SHIFT;
        if version != VERSION {
            return Err(RtpDecodeError::InvalidVersion(version));
        }

        let header = Self {
            marker: buf[1] & MARKER_BIT != 0,
            payload_type: buf[1] & PAYLOAD_TYPE_MASK,
            sequence: BigEndian::read_u16(&buf[2..4]),
            timestamp: BigEndian::read_u32(&buf[4..8]),
            ssrc: BigEndian::read_u32(&buf[8..12]),
        };

        let mut offset = Self::SIZE + 4 * usize::from(buf[0] & CSRC_COUNT_MASK);
        if buf[0] & EXTENSION_BIT != 0 {
            ensure_len(buf, offset + 4)?;
            let words = BigEndian::read_u16(&buf[offset + 2..offset + 4]);
            offset += 4 + 4 * usize::from(words);
        }
        ensure_len(buf, offset)?;

        Ok((header, offset))
    }
}

fn ensure_len(buf: &[u8], needed: usize) -> Result<(), RtpDecodeError> {
    if buf.len() < needed {
        return Err(RtpDecodeError::BufferTooSmall {
            needed,
            have: buf.len(),
        });
    }
    Ok(())
}

/// RTP decode errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RtpDecodeError {
    #[error("buffer too small: need {needed} bytes, have {have}")]
    BufferTooSmall { needed: usize, have: usize },

    #[error("invalid RTP version: {0}")]
    InvalidVersion(u8),
}

/// Header plus payload, as seen by a receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RtpPacket {
    pub header: RtpHeader,
    pub payload: Bytes,
}

impl RtpPacket {
    #[must_use]
    pub fn new(header: RtpHeader, payload: impl Into<Bytes>) -> Self {
        Self {
            header,
            payload: payload.into(),
        }
    }

    /// Wire form
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(RtpHeader::SIZE + self.payload.len());
        buf.extend_from_slice(&self.header.encode());
        buf.extend_from_slice(&self.payload);
        buf
    }

    /// Decode a datagram, dropping any trailing padding
    ///
    /// # Errors
    ///
    /// Returns `RtpDecodeError` if the header cannot be decoded or the
    /// datagram is shorter than its header claims.
    pub fn decode(buf: &[u8]) -> Result<Self, RtpDecodeError> {
        let (header, offset) = RtpHeader::decode_with_length(buf)?;

        let mut end = buf.len();
        if buf[0] & PADDING_BIT != 0 {
            let padding = usize::from(buf[end - 1]);
            ensure_len(buf, offset + padding)?;
            end -= padding;
        }

        Ok(Self::new(header, Bytes::copy_from_slice(&buf[offset..end])))
    }

    /// Payload samples of a 24-bit stream, sign-extended
    pub fn l24_samples(&self) -> impl Iterator<Item = i32> + '_ {
        self.payload
            .chunks_exact(3)
            .map(BigEndian::read_i24)
    }
}

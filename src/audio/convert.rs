//! Captured sample to wire sample conversion
//!
//! Captured audio is signed 16-bit little-endian. On the wire each sample is
//! big-endian and, for L24, the captured value occupies the high-order 16 bits
//! with the low byte zero-filled. No dithering or resampling is applied.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use thiserror::Error;

use super::format::{CAPTURE_SAMPLE_BYTES, WireEncoding};

/// Sample conversion errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConvertError {
    /// Input does not hold a whole number of 16-bit frames
    #[error("batch of {len} bytes is not a whole number of {channels}-channel 16-bit frames")]
    Misaligned {
        /// Input length in bytes
        len: usize,
        /// Channel count
        channels: u8,
    },

    /// Output buffer cannot hold the converted samples
    #[error("output buffer too small: need {needed} bytes, have {have}")]
    OutputTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes available
        have: usize,
    },
}

/// Number of bytes `input` converts to
///
/// # Errors
///
/// Returns `ConvertError::Misaligned` if `input` is not a whole number of
/// frames of `channels` 16-bit samples.
pub fn converted_len(
    input: &[u8],
    channels: u8,
    encoding: WireEncoding,
) -> Result<usize, ConvertError> {
    let frame_bytes = CAPTURE_SAMPLE_BYTES * usize::from(channels);
    if frame_bytes == 0 || input.len() % frame_bytes != 0 {
        return Err(ConvertError::Misaligned {
            len: input.len(),
            channels,
        });
    }
    Ok(input.len() / CAPTURE_SAMPLE_BYTES * encoding.bytes_per_sample())
}

/// Convert captured samples into `output`, returning the bytes written
///
/// All checks run before the first byte is written, so on error `output` is
/// untouched.
///
/// # Errors
///
/// Returns `ConvertError` if the input is misaligned or `output` is too small.
pub fn convert_into(
    input: &[u8],
    channels: u8,
    encoding: WireEncoding,
    output: &mut [u8],
) -> Result<usize, ConvertError> {
    let needed = converted_len(input, channels, encoding)?;
    if output.len() < needed {
        return Err(ConvertError::OutputTooSmall {
            needed,
            have: output.len(),
        });
    }

    let width = encoding.bytes_per_sample();
    for (src, dst) in input
        .chunks_exact(CAPTURE_SAMPLE_BYTES)
        .zip(output[..needed].chunks_exact_mut(width))
    {
        BigEndian::write_i16(&mut dst[..2], LittleEndian::read_i16(src));
        // Low-order padding: no higher source resolution exists
        dst[2..].fill(0);
    }

    Ok(needed)
}

/// Convert captured samples into a newly allocated buffer
///
/// # Errors
///
/// Returns `ConvertError::Misaligned` if the input is misaligned.
pub fn convert_samples(
    input: &[u8],
    channels: u8,
    encoding: WireEncoding,
) -> Result<Vec<u8>, ConvertError> {
    let mut output = vec![0u8; converted_len(input, channels, encoding)?];
    convert_into(input, channels, encoding, &mut output)?;
    Ok(output)
}

//! Fixed-size batching of captured audio
//!
//! Capture backends do not always honour a requested buffer size. The
//! accumulator regroups whatever they deliver into batches of exactly one
//! packet period, using storage allocated once up front.

use super::format::CAPTURE_SAMPLE_BYTES;

/// Regroups capture buffers into fixed-size frame batches
#[derive(Debug)]
pub struct FrameAccumulator {
    buf: Vec<u8>,
    filled: usize,
}

impl FrameAccumulator {
    /// Create an accumulator emitting batches of `batch_len` bytes
    ///
    /// `batch_len` is rounded down to a whole number of samples.
    #[must_use]
    pub fn new(batch_len: usize) -> Self {
        Self {
            buf: vec![0u8; batch_len - batch_len % CAPTURE_SAMPLE_BYTES],
            filled: 0,
        }
    }

    /// Size of each emitted batch in bytes
    #[must_use]
    pub fn batch_len(&self) -> usize {
        self.buf.len()
    }

    /// Bytes currently held waiting for the next complete batch
    #[must_use]
    pub fn pending(&self) -> usize {
        self.filled
    }

    /// Drop any partially filled batch
    pub fn reset(&mut self) {
        self.filled = 0;
    }

    /// Append raw little-endian sample bytes, emitting each completed batch
    pub fn push_bytes(&mut self, mut data: &[u8], mut on_batch: impl FnMut(&[u8])) {
        if self.buf.is_empty() {
            return;
        }
        while !data.is_empty() {
            let take = (self.buf.len() - self.filled).min(data.len());
            self.buf[self.filled..self.filled + take].copy_from_slice(&data[..take]);
            self.filled += take;
            data = &data[take..];

            if self.filled == self.buf.len() {
                on_batch(&self.buf);
                self.filled = 0;
            }
        }
    }

    /// Append 16-bit samples, emitting each completed batch
    pub fn push_samples(&mut self, samples: &[i16], mut on_batch: impl FnMut(&[u8])) {
        for sample in samples {
            self.push_one(*sample, &mut on_batch);
        }
    }

    /// Append normalized float samples, emitting each completed batch
    ///
    /// Samples are clamped to `[-1.0, 1.0]` and scaled to 16 bits in place,
    /// so no buffer grows with the size the backend delivers.
    pub fn push_f32(&mut self, samples: &[f32], mut on_batch: impl FnMut(&[u8])) {
        for sample in samples {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "Clamped input scales into i16 range"
            )]
            let scaled = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
            self.push_one(scaled, &mut on_batch);
        }
    }

    fn push_one(&mut self, sample: i16, on_batch: &mut impl FnMut(&[u8])) {
        if self.buf.is_empty() {
            return;
        }
        self.buf[self.filled..self.filled + CAPTURE_SAMPLE_BYTES]
            .copy_from_slice(&sample.to_le_bytes());
        self.filled += CAPTURE_SAMPLE_BYTES;

        if self.filled == self.buf.len() {
            on_batch(&self.buf);
            self.filled = 0;
        }
    }
}

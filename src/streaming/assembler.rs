//! Packet assembly on the capture thread

use std::io;
use std::sync::Arc;

use thiserror::Error;

use super::state::SyncState;
use super::synchronizer::TimestampSynchronizer;
use crate::audio::{ConvertError, StreamFormat, convert_into};
use crate::net::DatagramSink;
use crate::protocol::ptp::ClockSource;
use crate::protocol::rtp::RtpHeader;

/// Per-packet failures
///
/// None of these stop the stream. The affected packet is skipped.
#[derive(Debug, Error)]
pub enum AssembleError {
    /// Batch does not hold exactly one packet of samples
    #[error("batch of {actual} bytes, expected {expected}")]
    BatchLength {
        /// Bytes in one packet period
        expected: usize,
        /// Bytes delivered
        actual: usize,
    },

    /// Samples could not be converted
    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),

    /// The network refused the packet
    #[error("send failed: {0}")]
    Send(#[from] io::Error),
}

/// Turns captured batches into RTP packets and transmits them
///
/// Owns the sequence number and the packet buffer. The buffer is allocated
/// once; assembling a packet neither allocates nor blocks.
pub struct PacketAssembler {
    format: StreamFormat,
    payload_type: u8,
    ssrc: u32,
    sequence: u16,
    synchronizer: TimestampSynchronizer,
    clock: Arc<dyn ClockSource>,
    sink: Arc<dyn DatagramSink>,
    state: Arc<SyncState>,
    packet: Vec<u8>,
}

impl std::fmt::Debug for PacketAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketAssembler")
            .field("format", &self.format)
            .field("ssrc", &self.ssrc)
            .field("sequence", &self.sequence)
            .field("timestamp", &self.synchronizer.estimate())
            .finish_non_exhaustive()
    }
}

impl PacketAssembler {
    /// Create an assembler whose first packet carries sequence number 0
    #[must_use]
    pub fn new(
        format: StreamFormat,
        payload_type: u8,
        ssrc: u32,
        clock: Arc<dyn ClockSource>,
        sink: Arc<dyn DatagramSink>,
        state: Arc<SyncState>,
    ) -> Self {
        let synchronizer = TimestampSynchronizer::new(
            format.frames_per_packet(),
            format.sample_rate.as_u32(),
            Arc::clone(&state),
        );
        Self::with_synchronizer(format, payload_type, ssrc, 0, synchronizer, clock, sink, state)
    }

    /// Create an assembler from explicit starting counters
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn with_synchronizer(
        format: StreamFormat,
        payload_type: u8,
        ssrc: u32,
        sequence: u16,
        synchronizer: TimestampSynchronizer,
        clock: Arc<dyn ClockSource>,
        sink: Arc<dyn DatagramSink>,
        state: Arc<SyncState>,
    ) -> Self {
        Self {
            packet: vec![0u8; RtpHeader::SIZE + format.payload_len()],
            format,
            payload_type,
            ssrc,
            sequence,
            synchronizer,
            clock,
            sink,
            state,
        }
    }

    /// Sequence number of the next packet
    #[must_use]
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Timestamp estimate for the next packet
    #[must_use]
    pub fn timestamp(&self) -> u32 {
        self.synchronizer.estimate()
    }

    /// Stream source identifier
    #[must_use]
    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    /// Assemble and send one packet from a captured batch
    ///
    /// A rejected batch and a failed send both count as a lost packet: the
    /// sequence number and the timestamp each advance by one packet.
    ///
    /// # Errors
    ///
    /// Returns `AssembleError` describing why the packet was not delivered.
    pub fn on_batch(&mut self, batch: &[u8]) -> Result<(), AssembleError> {
        if let Err(e) = self.fill_payload(batch) {
            self.synchronizer.advance();
            self.sequence = self.sequence.wrapping_add(1);
            self.state.packet_dropped();
            return Err(e);
        }

        let timestamp = self.synchronizer.next_timestamp(&*self.clock);
        RtpHeader::new_audio(self.sequence, timestamp, self.ssrc, self.payload_type)
            .encode_into(&mut self.packet[..RtpHeader::SIZE]);
        self.synchronizer.observe(&*self.clock);

        let sent = self.sink.send_datagram(&self.packet);

        self.synchronizer.advance();
        self.sequence = self.sequence.wrapping_add(1);

        match sent {
            Ok(_) => {
                self.state.packet_sent();
                Ok(())
            }
            Err(e) => {
                self.state.send_failed();
                Err(e.into())
            }
        }
    }

    fn fill_payload(&mut self, batch: &[u8]) -> Result<(), AssembleError> {
        let expected = self.format.batch_len();
        if batch.len() != expected {
            return Err(AssembleError::BatchLength {
                expected,
                actual: batch.len(),
            });
        }
        convert_into(
            batch,
            self.format.channels,
            self.format.encoding,
            &mut self.packet[RtpHeader::SIZE..],
        )?;
        Ok(())
    }
}

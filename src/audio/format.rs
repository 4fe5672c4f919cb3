//! Audio format definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Width of one captured sample in bytes (signed 16-bit, little-endian)
pub const CAPTURE_SAMPLE_BYTES: usize = 2;

/// Maximum number of channels carried by one stream
pub const MAX_CHANNELS: u8 = 8;

/// Linear PCM encoding used on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WireEncoding {
    /// 16-bit big-endian linear PCM
    L16,
    /// 24-bit big-endian linear PCM
    #[default]
    L24,
}

impl WireEncoding {
    /// Get bytes per encoded sample
    #[must_use]
    pub fn bytes_per_sample(self) -> usize {
        match self {
            WireEncoding::L16 => 2,
            WireEncoding::L24 => 3,
        }
    }

    /// Get bits per encoded sample
    #[must_use]
    pub fn bits_per_sample(self) -> u8 {
        match self {
            WireEncoding::L16 => 16,
            WireEncoding::L24 => 24,
        }
    }

    /// Encoding name as it appears in `a=rtpmap`
    #[must_use]
    pub fn rtpmap_name(self) -> &'static str {
        match self {
            WireEncoding::L16 => "L16",
            WireEncoding::L24 => "L24",
        }
    }
}

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SampleRate {
    /// 44.1 kHz
    Hz44100,
    /// 48 kHz (AES67 mandatory rate)
    #[default]
    Hz48000,
    /// 88.2 kHz
    Hz88200,
    /// 96 kHz
    Hz96000,
}

impl SampleRate {
    /// Get the rate as u32
    #[must_use]
    pub fn as_u32(self) -> u32 {
        match self {
            SampleRate::Hz44100 => 44100,
            SampleRate::Hz48000 => 48000,
            SampleRate::Hz88200 => 88200,
            SampleRate::Hz96000 => 96000,
        }
    }

    /// Create from Hz value
    #[must_use]
    pub fn from_hz(hz: u32) -> Option<Self> {
        match hz {
            44100 => Some(SampleRate::Hz44100),
            48000 => Some(SampleRate::Hz48000),
            88200 => Some(SampleRate::Hz88200),
            96000 => Some(SampleRate::Hz96000),
            _ => None,
        }
    }
}

/// Duration of audio carried by one packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PacketTime {
    /// 125 µs
    Us125,
    /// 250 µs
    Us250,
    /// 333⅓ µs
    Us333,
    /// 1 ms
    #[default]
    Ms1,
    /// 4 ms
    Ms4,
}

impl PacketTime {
    /// Packets per second
    fn packets_per_second(self) -> u32 {
        match self {
            PacketTime::Us125 => 8000,
            PacketTime::Us250 => 4000,
            PacketTime::Us333 => 3000,
            PacketTime::Ms1 => 1000,
            PacketTime::Ms4 => 250,
        }
    }

    /// Frames per packet at the given rate
    ///
    /// Returns `None` when the packet time does not hold a whole number of
    /// frames at this rate (e.g. 1 ms at 44.1 kHz).
    #[must_use]
    pub fn frames_per_packet(self, rate: SampleRate) -> Option<u32> {
        let pps = self.packets_per_second();
        let hz = rate.as_u32();
        (hz % pps == 0).then_some(hz / pps)
    }

    /// Packet period as a `Duration`
    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::from_nanos(1_000_000_000 / u64::from(self.packets_per_second()))
    }

    /// Packet period in milliseconds
    #[must_use]
    pub fn as_millis_f64(self) -> f64 {
        1000.0 / f64::from(self.packets_per_second())
    }

    /// Value of the `a=ptime` attribute
    #[must_use]
    pub fn sdp_value(self) -> &'static str {
        match self {
            PacketTime::Us125 => "0.125",
            PacketTime::Us250 => "0.25",
            PacketTime::Us333 => "0.333",
            PacketTime::Ms1 => "1",
            PacketTime::Ms4 => "4",
        }
    }
}

/// Complete stream format, fixed for the lifetime of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StreamFormat {
    /// Wire encoding
    pub encoding: WireEncoding,
    /// Sample rate
    pub sample_rate: SampleRate,
    /// Interleaved channel count
    pub channels: u8,
    /// Packet time
    pub packet_time: PacketTime,
    frames_per_packet: u32,
}

impl StreamFormat {
    /// Create a stream format
    ///
    /// Returns `None` if the channel count is outside `1..=8` or the packet
    /// time does not divide the sample rate.
    #[must_use]
    pub fn new(
        encoding: WireEncoding,
        sample_rate: SampleRate,
        channels: u8,
        packet_time: PacketTime,
    ) -> Option<Self> {
        if channels == 0 || channels > MAX_CHANNELS {
            return None;
        }
        let frames_per_packet = packet_time.frames_per_packet(sample_rate)?;
        Some(Self {
            encoding,
            sample_rate,
            channels,
            packet_time,
            frames_per_packet,
        })
    }

    /// Frames (samples per channel) carried by each packet
    #[must_use]
    pub fn frames_per_packet(&self) -> u32 {
        self.frames_per_packet
    }

    /// Interleaved samples per packet
    #[must_use]
    pub fn samples_per_packet(&self) -> usize {
        self.frames_per_packet as usize * usize::from(self.channels)
    }

    /// Size in bytes of one captured batch
    #[must_use]
    pub fn batch_len(&self) -> usize {
        self.samples_per_packet() * CAPTURE_SAMPLE_BYTES
    }

    /// Size in bytes of one encoded payload
    #[must_use]
    pub fn payload_len(&self) -> usize {
        self.samples_per_packet() * self.encoding.bytes_per_sample()
    }
}

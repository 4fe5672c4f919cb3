use std::net::Ipv4Addr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::audio::{MAX_CHANNELS, PacketTime, SampleRate, StreamFormat, WireEncoding};
use crate::error::Aes67Error;
use crate::net::default_multicast_group;
use crate::protocol::rtp::{DYNAMIC_PAYLOAD_TYPE, constants::MEDIA_PORT};

/// Fallback stream name when the host name cannot be read
const FALLBACK_STREAM_NAME: &str = "aes67-send";

/// Host name, or a fixed fallback
#[must_use]
pub fn default_stream_name() -> String {
    hostname::get()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_STREAM_NAME.to_string())
}

/// Configuration for one streaming session
///
/// Resolved once before the session starts and never changed afterwards.
/// Every field has a default, so a partial document deserializes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session name announced to receivers (default: host name)
    pub stream_name: String,

    /// Interface address to stream from (default: first non-loopback IPv4)
    pub local_address: Option<Ipv4Addr>,

    /// Media multicast group (default: `239.69.x.y` from the local address)
    pub multicast_address: Option<Ipv4Addr>,

    /// Capture device name (default: the system's default input)
    pub device: Option<String>,

    /// Channels to capture (default: every device input, up to eight)
    pub channels: Option<u8>,

    /// Sample rate (default: 48 kHz)
    pub sample_rate: SampleRate,

    /// Packet time (default: 1 ms)
    pub packet_time: PacketTime,

    /// Wire encoding (default: L24)
    pub encoding: WireEncoding,

    /// RTP payload type (default: 96)
    pub payload_type: u8,

    /// Media destination port (default: 5004)
    pub media_port: u16,

    /// Multicast TTL for media and announcements (default: 1)
    pub multicast_ttl: u32,

    /// PTP domain advertised in `a=clock-domain` (default: 0)
    pub ptp_domain: u8,

    /// How long to wait for the clock to acquire a source (default: 10 s)
    pub sync_timeout: Duration,

    /// Drift evaluation window (default: 100 ms)
    pub drift_window: Duration,

    /// Announcement repeat interval (default: 30 s)
    pub announce_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stream_name: default_stream_name(),
            local_address: None,
            multicast_address: None,
            device: None,
            channels: None,
            sample_rate: SampleRate::default(),
            packet_time: PacketTime::default(),
            encoding: WireEncoding::default(),
            payload_type: DYNAMIC_PAYLOAD_TYPE,
            media_port: MEDIA_PORT,
            multicast_ttl: 1,
            ptp_domain: 0,
            sync_timeout: Duration::from_secs(10),
            drift_window: Duration::from_millis(100),
            announce_interval: Duration::from_secs(30),
        }
    }
}

impl SessionConfig {
    /// Create a new config builder
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }

    /// Check every field before anything is opened
    ///
    /// # Errors
    ///
    /// Returns `Aes67Error::InvalidParameter` naming the first bad field.
    pub fn validate(&self) -> Result<(), Aes67Error> {
        if self.stream_name.is_empty() {
            return Err(Aes67Error::invalid_parameter(
                "stream_name",
                "must not be empty",
            ));
        }
        if self.stream_name.contains(['\r', '\n']) {
            return Err(Aes67Error::invalid_parameter(
                "stream_name",
                "must be a single line",
            ));
        }
        if let Some(channels) = self.channels {
            if channels == 0 || channels > MAX_CHANNELS {
                return Err(Aes67Error::invalid_parameter(
                    "channels",
                    format!("{channels} is outside 1..={MAX_CHANNELS}"),
                ));
            }
        }
        if self.frames_per_packet().is_none() {
            return Err(Aes67Error::invalid_parameter(
                "packet_time",
                format!(
                    "{} ms does not hold whole frames at {} Hz",
                    self.packet_time.sdp_value(),
                    self.sample_rate.as_u32()
                ),
            ));
        }
        if !(96..=127).contains(&self.payload_type) {
            return Err(Aes67Error::invalid_parameter(
                "payload_type",
                format!("{} is not a dynamic payload type", self.payload_type),
            ));
        }
        if self.media_port == 0 {
            return Err(Aes67Error::invalid_parameter("media_port", "must not be 0"));
        }
        if !(1..=255).contains(&self.multicast_ttl) {
            return Err(Aes67Error::invalid_parameter(
                "multicast_ttl",
                format!("{} is outside 1..=255", self.multicast_ttl),
            ));
        }
        if let Some(group) = self.multicast_address {
            if !group.is_multicast() {
                return Err(Aes67Error::invalid_parameter(
                    "multicast_address",
                    format!("{group} is not a multicast address"),
                ));
            }
        }
        for (name, value) in [
            ("sync_timeout", self.sync_timeout),
            ("drift_window", self.drift_window),
            ("announce_interval", self.announce_interval),
        ] {
            if value.is_zero() {
                return Err(Aes67Error::invalid_parameter(name, "must not be zero"));
            }
        }
        Ok(())
    }

    /// Frames per packet for the configured rate and packet time
    #[must_use]
    pub fn frames_per_packet(&self) -> Option<u32> {
        self.packet_time.frames_per_packet(self.sample_rate)
    }

    /// Media group to send to from `local`
    #[must_use]
    pub fn media_group(&self, local: Ipv4Addr) -> Ipv4Addr {
        self.multicast_address
            .unwrap_or_else(|| default_multicast_group(local))
    }

    /// Stream format once the capture channel count is known
    ///
    /// # Errors
    ///
    /// Returns `Aes67Error::InvalidParameter` if the combination is invalid.
    pub fn stream_format(&self, channels: u8) -> Result<StreamFormat, Aes67Error> {
        StreamFormat::new(self.encoding, self.sample_rate, channels, self.packet_time).ok_or_else(
            || Aes67Error::invalid_parameter("channels", format!("cannot stream {channels} channels")),
        )
    }
}

/// Builder for `SessionConfig`
#[derive(Debug, Clone, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set the announced session name
    #[must_use]
    pub fn stream_name(mut self, name: impl Into<String>) -> Self {
        self.config.stream_name = name.into();
        self
    }

    /// Stream from this interface address
    #[must_use]
    pub fn local_address(mut self, address: Ipv4Addr) -> Self {
        self.config.local_address = Some(address);
        self
    }

    /// Override the media multicast group
    #[must_use]
    pub fn multicast_address(mut self, group: Ipv4Addr) -> Self {
        self.config.multicast_address = Some(group);
        self
    }

    /// Capture from the named device
    #[must_use]
    pub fn device(mut self, name: impl Into<String>) -> Self {
        self.config.device = Some(name.into());
        self
    }

    /// Capture this many channels
    #[must_use]
    pub fn channels(mut self, channels: u8) -> Self {
        self.config.channels = Some(channels);
        self
    }

    /// Set sample rate
    #[must_use]
    pub fn sample_rate(mut self, rate: SampleRate) -> Self {
        self.config.sample_rate = rate;
        self
    }

    /// Set packet time
    #[must_use]
    pub fn packet_time(mut self, ptime: PacketTime) -> Self {
        self.config.packet_time = ptime;
        self
    }

    /// Set wire encoding
    #[must_use]
    pub fn encoding(mut self, encoding: WireEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// Set RTP payload type
    #[must_use]
    pub fn payload_type(mut self, payload_type: u8) -> Self {
        self.config.payload_type = payload_type;
        self
    }

    /// Set media destination port
    #[must_use]
    pub fn media_port(mut self, port: u16) -> Self {
        self.config.media_port = port;
        self
    }

    /// Set multicast TTL
    #[must_use]
    pub fn multicast_ttl(mut self, ttl: u32) -> Self {
        self.config.multicast_ttl = ttl;
        self
    }

    /// Set advertised PTP domain
    #[must_use]
    pub fn ptp_domain(mut self, domain: u8) -> Self {
        self.config.ptp_domain = domain;
        self
    }

    /// Set clock acquisition timeout
    #[must_use]
    pub fn sync_timeout(mut self, timeout: Duration) -> Self {
        self.config.sync_timeout = timeout;
        self
    }

    /// Set drift evaluation window
    #[must_use]
    pub fn drift_window(mut self, window: Duration) -> Self {
        self.config.drift_window = window;
        self
    }

    /// Set announcement interval
    #[must_use]
    pub fn announce_interval(mut self, interval: Duration) -> Self {
        self.config.announce_interval = interval;
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

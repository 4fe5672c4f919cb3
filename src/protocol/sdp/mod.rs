//! SDP (Session Description Protocol, RFC 4566)
//!
//! AES67 senders describe their stream in SDP carried inside SAP
//! announcements. Only the fields an AES67 description uses are modelled;
//! attributes keep their order so that encoding is deterministic.

mod builder;
mod parser;


use std::fmt;
use std::net::IpAddr;

pub use builder::SdpBuilder;
pub use parser::{SdpParseError, SdpParser};

/// One `a=` line, either `a=name:value` or the flag form `a=name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name
    pub name: String,
    /// Value after the first colon, `None` for flags
    pub value: Option<String>,
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "a={}:{}\r\n", self.name, value),
            None => write!(f, "a={}\r\n", self.name),
        }
    }
}

fn lookup<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes.iter().find(|a| a.name == name)
}

fn address_type(address: &IpAddr) -> &'static str {
    match address {
        IpAddr::V4(_) => "IP4",
        IpAddr::V6(_) => "IP6",
    }
}

/// `o=` line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SdpOrigin {
    /// Username, `-` when unused
    pub username: String,
    /// Session identifier
    pub session_id: u64,
    /// Session version
    pub session_version: u64,
    /// Originating host address
    pub address: IpAddr,
}

impl fmt::Display for SdpOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "o={} {} {} IN {} {}\r\n",
            self.username,
            self.session_id,
            self.session_version,
            address_type(&self.address),
            self.address
        )
    }
}

/// `c=` line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdpConnection {
    /// Connection address
    pub address: IpAddr,
    /// Multicast TTL suffix (`/32` in AES67 descriptions)
    pub ttl: Option<u8>,
}

impl fmt::Display for SdpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c=IN {} {}", address_type(&self.address), self.address)?;
        if let Some(ttl) = self.ttl {
            write!(f, "/{ttl}")?;
        }
        f.write_str("\r\n")
    }
}

/// `m=` section with its attributes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescription {
    /// Media type, e.g. `audio`
    pub media_type: String,
    /// Transport port
    pub port: u16,
    /// Transport protocol, e.g. `RTP/AVP`
    pub protocol: String,
    /// Payload formats
    pub formats: Vec<String>,
    /// Media-level attributes in order
    pub attributes: Vec<Attribute>,
}

impl MediaDescription {
    /// Value of a media-level attribute
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)?.value.as_deref()
    }

    /// Whether a flag attribute such as `recvonly` is present
    #[must_use]
    pub fn has_flag(&self, name: &str) -> bool {
        lookup(&self.attributes, name).is_some_and(|a| a.value.is_none())
    }
}

impl fmt::Display for MediaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {} {}", self.media_type, self.port, self.protocol)?;
        for format in &self.formats {
            write!(f, " {format}")?;
        }
        f.write_str("\r\n")?;
        self.attributes.iter().try_for_each(|a| write!(f, "{a}"))
    }
}

/// A complete session description
///
/// `Display` renders the wire form: every line ends in CRLF, the last one
/// included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionDescription {
    /// `o=`
    pub origin: Option<SdpOrigin>,
    /// `s=`
    pub session_name: String,
    /// Session-level `c=`
    pub connection: Option<SdpConnection>,
    /// `t=` start and stop, `(0, 0)` for a permanent session
    pub timing: (u64, u64),
    /// Session-level attributes in order
    pub attributes: Vec<Attribute>,
    /// Media sections in order
    pub media: Vec<MediaDescription>,
}

impl SessionDescription {
    /// Value of a session-level attribute
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        lookup(&self.attributes, name)?.value.as_deref()
    }

    /// First audio section
    #[must_use]
    pub fn audio_media(&self) -> Option<&MediaDescription> {
        self.media.iter().find(|m| m.media_type == "audio")
    }

    /// `a=rtpmap` of the audio section
    #[must_use]
    pub fn rtpmap(&self) -> Option<&str> {
        self.audio_media()?.get_attribute("rtpmap")
    }

    /// `a=ts-refclk` of the audio section
    #[must_use]
    pub fn ts_refclk(&self) -> Option<&str> {
        self.audio_media()?.get_attribute("ts-refclk")
    }
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("v=0\r\n")?;
        if let Some(origin) = &self.origin {
            write!(f, "{origin}")?;
        }
        write!(f, "s={}\r\n", self.session_name)?;
        if let Some(connection) = &self.connection {
            write!(f, "{connection}")?;
        }
        write!(f, "t={} {}\r\n", self.timing.0, self.timing.1)?;
        self.attributes.iter().try_for_each(|a| write!(f, "{a}"))?;
        self.media.iter().try_for_each(|m| write!(f, "{m}"))
    }
}

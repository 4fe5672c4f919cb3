use std::net::{IpAddr, Ipv4Addr};

use bytes::Bytes;

use crate::audio::StreamFormat;
use crate::protocol::sap::{SapHeader, SapMessageType, SapPacket};
use crate::protocol::sdp::SdpBuilder;

/// TTL suffix on the `c=` line
const MULTICAST_TTL: u8 = 32;

/// Everything the announcement describes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParameters {
    /// Session name (`s=`)
    pub session_name: String,
    /// Local interface address, used as SDP and SAP origin
    pub origin: Ipv4Addr,
    /// Media multicast group
    pub media_group: Ipv4Addr,
    /// Media destination port
    pub media_port: u16,
    /// RTP payload type
    pub payload_type: u8,
    /// Stream format
    pub format: StreamFormat,
    /// Session identifier
    pub session_id: u64,
    /// Session version
    pub session_version: u64,
    /// PTP domain number
    pub ptp_domain: u8,
    /// Grandmaster identity the stream is clocked from
    pub clock_identity: String,
}

/// Immutable session description and its encoded SAP messages
#[derive(Debug, Clone)]
pub struct SessionDescriptor {
    params: SessionParameters,
    sdp: String,
    announcement: Bytes,
    deletion: Bytes,
}

impl SessionDescriptor {
    /// Build the description and encode both SAP messages
    #[must_use]
    pub fn new(params: SessionParameters) -> Self {
        let sdp = render_sdp(&params);
        let header = SapHeader::announcement(params.origin);
        let announcement = SapPacket::sdp(header, sdp.clone()).encode();
        let deletion = SapPacket::sdp(
            SapHeader {
                message_type: SapMessageType::Deletion,
                ..header
            },
            sdp.clone(),
        )
        .encode();

        Self {
            params,
            sdp,
            announcement,
            deletion,
        }
    }

    /// The parameters this descriptor was built from
    #[must_use]
    pub fn parameters(&self) -> &SessionParameters {
        &self.params
    }

    /// RTP synchronization source: the session id truncated to 32 bits
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "SSRC is the low 32 bits of the session id"
    )]
    pub fn ssrc(&self) -> u32 {
        self.params.session_id as u32
    }

    /// SDP text
    #[must_use]
    pub fn sdp(&self) -> &str {
        &self.sdp
    }

    /// Encoded SAP announcement
    #[must_use]
    pub fn announcement(&self) -> &Bytes {
        &self.announcement
    }

    /// Encoded SAP deletion
    #[must_use]
    pub fn deletion(&self) -> &Bytes {
        &self.deletion
    }
}

fn render_sdp(params: &SessionParameters) -> String {
    let format = &params.format;
    let payload_type = params.payload_type.to_string();
    let rtpmap = format!(
        "{payload_type} {}/{}/{}",
        format.encoding.rtpmap_name(),
        format.sample_rate.as_u32(),
        format.channels
    );
    let clock_domain = format!("PTPv2 {}", params.ptp_domain);
    let framecount = format.frames_per_packet().to_string();
    let refclk = format!("ptp=IEEE1588-2008:{}", params.clock_identity);

    SdpBuilder::new()
        .origin(
            "-",
            params.session_id,
            params.session_version,
            IpAddr::V4(params.origin),
        )
        .session_name(&params.session_name)
        .connection(IpAddr::V4(params.media_group), Some(MULTICAST_TTL))
        .timing(0, 0)
        .attribute("clock-domain", Some(clock_domain.as_str()))
        .media("audio", params.media_port, "RTP/AVP", &[payload_type.as_str()])
        .attribute("rtpmap", Some(rtpmap.as_str()))
        .attribute("sync-time", Some("0"))
        .attribute("framecount", Some(framecount.as_str()))
        .attribute("ptime", Some(format.packet_time.sdp_value()))
        .attribute("mediaclk", Some("direct=0"))
        .attribute("ts-refclk", Some(refclk.as_str()))
        .attribute("recvonly", None)
        .encode()
}

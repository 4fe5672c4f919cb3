use std::net::IpAddr;

use super::{Attribute, MediaDescription, SdpConnection, SdpOrigin, SessionDescription};

fn attribute(name: &str, value: Option<&str>) -> Attribute {
    Attribute {
        name: name.to_string(),
        value: value.map(str::to_string),
    }
}

/// Assembles a [`SessionDescription`] line by line
///
/// Attributes added before the first [`media`](Self::media) call are
/// session-level; afterwards they attach to the latest media section.
#[derive(Debug, Default)]
pub struct SdpBuilder {
    description: SessionDescription,
}

impl SdpBuilder {
    /// Start an empty description
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `o=`
    #[must_use]
    pub fn origin(
        mut self,
        username: &str,
        session_id: u64,
        session_version: u64,
        address: IpAddr,
    ) -> Self {
        self.description.origin = Some(SdpOrigin {
            username: username.to_string(),
            session_id,
            session_version,
            address,
        });
        self
    }

    /// Set `s=`
    #[must_use]
    pub fn session_name(mut self, name: &str) -> Self {
        self.description.session_name = name.to_string();
        self
    }

    /// Set the session-level `c=`
    #[must_use]
    pub fn connection(mut self, address: IpAddr, ttl: Option<u8>) -> Self {
        self.description.connection = Some(SdpConnection { address, ttl });
        self
    }

    /// Set `t=`
    #[must_use]
    pub fn timing(mut self, start: u64, stop: u64) -> Self {
        self.description.timing = (start, stop);
        self
    }

    /// Open a media section
    #[must_use]
    pub fn media(mut self, media_type: &str, port: u16, protocol: &str, formats: &[&str]) -> Self {
        self.description.media.push(MediaDescription {
            media_type: media_type.to_string(),
            port,
            protocol: protocol.to_string(),
            formats: formats.iter().map(|f| (*f).to_string()).collect(),
            attributes: Vec::new(),
        });
        self
    }

    /// Add an attribute at the current level
    #[must_use]
    pub fn attribute(mut self, name: &str, value: Option<&str>) -> Self {
        let attributes = match self.description.media.last_mut() {
            Some(media) => &mut media.attributes,
            None => &mut self.description.attributes,
        };
        attributes.push(attribute(name, value));
        self
    }

    /// Finish
    #[must_use]
    pub fn build(self) -> SessionDescription {
        self.description
    }

    /// Finish and render the wire text
    #[must_use]
    pub fn encode(self) -> String {
        self.description.to_string()
    }
}

use std::net::IpAddr;

use thiserror::Error;

use super::{Attribute, MediaDescription, SdpConnection, SdpOrigin, SessionDescription};

/// SDP parse errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SdpParseError {
    /// The first line is not `v=0`
    #[error("description does not start with v=0")]
    MissingVersion,

    /// A known field could not be parsed
    #[error("line {line}: malformed {field}= field \"{value}\"")]
    Malformed {
        /// 1-based line number
        line: usize,
        /// Field type letter
        field: char,
        /// Field text after `=`
        value: String,
    },
}

/// Parses SDP text into a [`SessionDescription`]
///
/// Both CRLF and bare LF line endings are accepted. Lines that are not of
/// the form `x=...` and fields this crate does not model are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SdpParser;

impl SdpParser {
    /// Parse a description
    ///
    /// # Errors
    ///
    /// Returns `SdpParseError` if the version line is missing or an `o=`,
    /// `c=`, `t=` or `m=` field is malformed.
    pub fn parse(input: &str) -> Result<SessionDescription, SdpParseError> {
        let mut lines = input
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l.trim_end()))
            .filter(|(_, l)| !l.is_empty());

        match lines.next() {
            Some((_, "v=0")) => {}
            _ => return Err(SdpParseError::MissingVersion),
        }

        let mut description = SessionDescription::default();

        for (line, text) in lines {
            let Some((field, value)) = split_field(text) else {
                continue;
            };
            let malformed = || SdpParseError::Malformed {
                line,
                field,
                value: value.to_string(),
            };

            match field {
                'o' => description.origin = Some(parse_origin(value).ok_or_else(malformed)?),
                's' => description.session_name = value.to_string(),
                'c' => {
                    let connection = parse_connection(value).ok_or_else(malformed)?;
                    // Media-level connections are not modelled
                    if description.media.is_empty() {
                        description.connection = Some(connection);
                    }
                }
                't' => description.timing = parse_timing(value).ok_or_else(malformed)?,
                'm' => description
                    .media
                    .push(parse_media(value).ok_or_else(malformed)?),
                'a' => {
                    let attribute = parse_attribute(value);
                    match description.media.last_mut() {
                        Some(media) => media.attributes.push(attribute),
                        None => description.attributes.push(attribute),
                    }
                }
                _ => {}
            }
        }

        Ok(description)
    }
}

fn split_field(line: &str) -> Option<(char, &str)> {
    let mut chars = line.chars();
    let field = chars.next()?;
    let rest = chars.as_str().strip_prefix('=')?;
    field.is_ascii_lowercase().then_some((field, rest))
}

fn parse_origin(value: &str) -> Option<SdpOrigin> {
    let mut parts = value.split_whitespace();
    let username = parts.next()?.to_string();
    let session_id = parts.next()?.parse().ok()?;
    let session_version = parts.next()?.parse().ok()?;
    if parts.next()? != "IN" {
        return None;
    }
    let _address_type = parts.next()?;
    let address = parts.next()?.parse().ok()?;
    Some(SdpOrigin {
        username,
        session_id,
        session_version,
        address,
    })
}

fn parse_connection(value: &str) -> Option<SdpConnection> {
    let mut parts = value.split_whitespace();
    if parts.next()? != "IN" {
        return None;
    }
    let _address_type = parts.next()?;
    let token = parts.next()?;
    let (address, ttl) = match token.split_once('/') {
        Some((address, ttl)) => (address, Some(ttl.parse().ok()?)),
        None => (token, None),
    };
    Some(SdpConnection {
        address: address.parse::<IpAddr>().ok()?,
        ttl,
    })
}

fn parse_timing(value: &str) -> Option<(u64, u64)> {
    let (start, stop) = value.split_once(' ')?;
    Some((start.trim().parse().ok()?, stop.trim().parse().ok()?))
}

fn parse_media(value: &str) -> Option<MediaDescription> {
    let mut parts = value.split_whitespace();
    let media_type = parts.next()?.to_string();
    // Port may carry a "/count" suffix
    let port = parts.next()?.split('/').next()?.parse().ok()?;
    let protocol = parts.next()?.to_string();
    let formats: Vec<String> = parts.map(str::to_string).collect();
    if formats.is_empty() {
        return None;
    }
    Some(MediaDescription {
        media_type,
        port,
        protocol,
        formats,
        attributes: Vec::new(),
    })
}

fn parse_attribute(value: &str) -> Attribute {
    match value.split_once(':') {
        Some((name, v)) => Attribute {
            name: name.to_string(),
            value: Some(v.to_string()),
        },
        None => Attribute {
            name: value.to_string(),
            value: None,
        },
    }
}

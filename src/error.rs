use std::io;
use std::time::Duration;
use thiserror::Error;

use crate::audio::{CaptureError, ConvertError};

/// Errors that can occur while setting up or running an AES67 session
#[derive(Debug, Error)]
pub enum Aes67Error {
    // ===== Startup Errors =====
    /// No IPv4 interface other than loopback was found
    #[error("no usable network interface found")]
    NoNetworkInterface,

    /// The configured local address is not assigned to any interface
    #[error("address {address} is not assigned to a local interface")]
    InterfaceNotFound {
        /// The configured address
        address: std::net::Ipv4Addr,
    },

    /// The requested audio device does not exist or has no inputs
    #[error("invalid audio device: {message}")]
    InvalidAudioDevice {
        /// Description of the failure
        message: String,
    },

    /// The clock collaborator did not report a time source in time
    #[error("could not sync to PTP master within {timeout:?}")]
    ClockNotSynchronized {
        /// How long startup waited
        timeout: Duration,
    },

    /// Invalid parameter provided
    #[error("invalid parameter: {name} - {message}")]
    InvalidParameter {
        /// The name of the parameter
        name: String,
        /// Description of the error
        message: String,
    },

    // ===== Runtime Errors =====
    /// Audio capture backend failed
    #[error("capture error: {0}")]
    Capture(#[from] CaptureError),

    /// Sample conversion failed
    #[error("conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Network I/O error
    #[error("network error: {0}")]
    NetworkError(#[from] io::Error),

    /// Operation not valid in current state
    #[error("invalid state: {message}")]
    InvalidState {
        /// Description of why the state is invalid
        message: String,
    },
}

impl Aes67Error {
    /// Check if this error must abort the process
    ///
    /// Startup failures are never retried; per-packet faults are absorbed by
    /// the stream and never surface as errors.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::NoNetworkInterface
                | Self::InterfaceNotFound { .. }
                | Self::InvalidAudioDevice { .. }
                | Self::ClockNotSynchronized { .. }
                | Self::InvalidParameter { .. }
        )
    }

    pub(crate) fn invalid_parameter(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

/// Result type alias for AES67 operations
pub type Result<T> = std::result::Result<T, Aes67Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Aes67Error::ClockNotSynchronized {
            timeout: Duration::from_secs(10),
        };
        assert_eq!(err.to_string(), "could not sync to PTP master within 10s");
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Aes67Error::NoNetworkInterface.is_fatal());
        assert!(
            Aes67Error::InvalidAudioDevice {
                message: "index 7".to_string()
            }
            .is_fatal()
        );

        let io_err = io::Error::new(io::ErrorKind::WouldBlock, "busy");
        assert!(!Aes67Error::from(io_err).is_fatal());
    }

    #[test]
    fn test_error_from_convert() {
        let err: Aes67Error = ConvertError::Misaligned {
            len: 7,
            channels: 2,
        }
        .into();
        assert!(matches!(err, Aes67Error::Convert(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_error_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Aes67Error>();
    }
}

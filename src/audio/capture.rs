//! Audio capture abstraction
//!
//! The capture backend owns the hardware. It delivers interleaved signed
//! 16-bit little-endian frames through a callback, once per packet period,
//! on its own real-time thread.

use super::format::MAX_CHANNELS;

/// Errors from audio capture
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    /// Device not found
    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    /// Device has no input channels
    #[error("Device has no input channels: {0}")]
    NoInputChannels(String),

    /// Stream error
    #[error("Stream error: {0}")]
    StreamError(String),

    /// Generic device error
    #[error("Device error: {0}")]
    DeviceError(String),

    /// Backend not compiled in
    #[error("No capture backend available: {0}")]
    Unavailable(String),
}

impl CaptureError {
    /// Whether the error is caused by the selected device itself
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(self, Self::DeviceNotFound(_) | Self::NoInputChannels(_))
    }
}

/// Capture device information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    /// Human-readable name, also used as identifier
    pub name: String,
    /// Maximum number of input channels
    pub input_channels: u16,
    /// Whether this is the default input device
    pub is_default: bool,
}

/// What the session asks the capture backend to open
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Device name, `None` for the default input device
    pub device: Option<String>,
    /// Requested channel count, `None` for every input up to eight
    pub channels: Option<u8>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Frames delivered per callback
    pub frames_per_batch: u32,
}

impl CaptureRequest {
    /// Resolve the channel count to capture for a device with `available` inputs
    ///
    /// The stream carries at most eight channels; a requested count is only
    /// honoured when the device can provide it.
    #[must_use]
    pub fn resolve_channels(&self, available: u16) -> u8 {
        let max = u8::try_from(available.min(u16::from(MAX_CHANNELS))).unwrap_or(MAX_CHANNELS);
        match self.channels {
            Some(requested) if requested > 0 && requested <= max => requested,
            _ => max,
        }
    }
}

/// Callback receiving one batch of captured bytes
pub type CaptureCallback = Box<dyn FnMut(&[u8]) + Send + 'static>;

/// Audio capture trait
///
/// Implementations provide platform-specific audio input.
pub trait AudioCapture: Send {
    /// Get available input devices
    fn enumerate_devices(&self) -> Result<Vec<InputDevice>, CaptureError>;

    /// Open the input device, returning the channel count that will be delivered
    fn open(&mut self, request: &CaptureRequest) -> Result<u8, CaptureError>;

    /// Start capture
    ///
    /// The callback runs on the backend's thread for every batch. May block
    /// while the backend brings its stream up.
    fn start(&mut self, callback: CaptureCallback) -> Result<(), CaptureError>;

    /// Stop capture
    ///
    /// Once this returns the callback is never invoked again. May block
    /// while the backend joins its stream thread.
    fn stop(&mut self) -> Result<(), CaptureError>;
}

/// Create the default capture backend for the current platform
///
/// # Errors
///
/// Returns `CaptureError::Unavailable` if no backend feature is enabled.
pub fn create_default_capture() -> Result<Box<dyn AudioCapture>, CaptureError> {
    #[cfg(feature = "audio-cpal")]
    {
        Ok(Box::new(super::capture_cpal::CpalCapture::new()))
    }

    #[cfg(not(feature = "audio-cpal"))]
    {
        Err(CaptureError::Unavailable(
            "enable the audio-cpal feature".into(),
        ))
    }
}

//! Audio capture, framing and wire conversion

mod batch;
mod capture;
mod capture_cpal;
mod convert;
mod format;

#[cfg(test)]
mod tests;

pub use batch::FrameAccumulator;
pub use capture::{
    AudioCapture, CaptureCallback, CaptureError, CaptureRequest, InputDevice,
    create_default_capture,
};
#[cfg(feature = "audio-cpal")]
pub use capture_cpal::CpalCapture;
pub use convert::{ConvertError, convert_into, convert_samples, converted_len};
pub use format::{
    CAPTURE_SAMPLE_BYTES, MAX_CHANNELS, PacketTime, SampleRate, StreamFormat, WireEncoding,
};

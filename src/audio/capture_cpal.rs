//! CPAL-based audio capture
//!
//! Cross-platform audio input using the `cpal` crate.

#[cfg(feature = "audio-cpal")]
mod implementation {
    use super::super::batch::FrameAccumulator;
    use super::super::capture::{
        AudioCapture, CaptureCallback, CaptureError, CaptureRequest, InputDevice,
    };
    use super::super::format::CAPTURE_SAMPLE_BYTES;
    use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
    use std::sync::mpsc;
    use std::thread::{self, JoinHandle};

    #[derive(Clone)]
    struct Opened {
        device: cpal::Device,
        config: cpal::StreamConfig,
        sample_format: cpal::SampleFormat,
        batch_len: usize,
    }

    /// CPAL-based audio capture implementation
    pub struct CpalCapture {
        host: cpal::Host,
        opened: Option<Opened>,
        stop_tx: Option<mpsc::Sender<()>>,
        thread: Option<JoinHandle<()>>,
    }

    impl Default for CpalCapture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CpalCapture {
        /// Create a capture using the platform's default host
        #[must_use]
        pub fn new() -> Self {
            Self {
                host: cpal::default_host(),
                opened: None,
                stop_tx: None,
                thread: None,
            }
        }

        fn max_input_channels(device: &cpal::Device) -> u16 {
            device
                .supported_input_configs()
                .map(|configs| configs.map(|c| c.channels()).max().unwrap_or(0))
                .unwrap_or(0)
        }

        fn find_device(&self, name: Option<&str>) -> Result<cpal::Device, CaptureError> {
            match name {
                Some(id) => self
                    .host
                    .input_devices()
                    .map_err(|e| CaptureError::DeviceError(e.to_string()))?
                    .find(|d| d.name().ok().as_deref() == Some(id))
                    .ok_or_else(|| CaptureError::DeviceNotFound(id.to_string())),
                None => self
                    .host
                    .default_input_device()
                    .ok_or_else(|| CaptureError::DeviceNotFound("No default input".into())),
            }
        }

        fn build_stream(
            opened: &Opened,
            mut callback: CaptureCallback,
        ) -> Result<cpal::Stream, CaptureError> {
            let err_fn = |err| tracing::error!("CPAL capture error: {}", err);
            let mut accumulator = FrameAccumulator::new(opened.batch_len);

            let stream = match opened.sample_format {
                cpal::SampleFormat::I16 => opened.device.build_input_stream(
                    &opened.config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        accumulator.push_samples(data, |batch| callback(batch));
                    },
                    err_fn,
                    None,
                ),
                cpal::SampleFormat::F32 => opened.device.build_input_stream(
                    &opened.config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        accumulator.push_f32(data, |batch| callback(batch));
                    },
                    err_fn,
                    None,
                ),
                other => {
                    return Err(CaptureError::DeviceError(format!(
                        "unsupported capture sample format {other:?}"
                    )));
                }
            };

            stream.map_err(|e| CaptureError::StreamError(e.to_string()))
        }
    }

    impl AudioCapture for CpalCapture {
        fn enumerate_devices(&self) -> Result<Vec<InputDevice>, CaptureError> {
            let default_name = self
                .host
                .default_input_device()
                .map(|d| d.name().unwrap_or_default());

            let devices = self
                .host
                .input_devices()
                .map_err(|e| CaptureError::DeviceError(e.to_string()))?;

            let mut result = Vec::new();
            for device in devices {
                let input_channels = Self::max_input_channels(&device);
                if input_channels == 0 {
                    continue;
                }
                let name = device.name().unwrap_or_else(|_| "Unknown".to_string());
                result.push(InputDevice {
                    is_default: default_name.as_ref() == Some(&name),
                    name,
                    input_channels,
                });
            }

            Ok(result)
        }

        fn open(&mut self, request: &CaptureRequest) -> Result<u8, CaptureError> {
            let device = self.find_device(request.device.as_deref())?;
            let name = device.name().unwrap_or_else(|_| "Unknown".to_string());

            let available = Self::max_input_channels(&device);
            if available == 0 {
                return Err(CaptureError::NoInputChannels(name));
            }
            let channels = request.resolve_channels(available);

            let default_config = device
                .default_input_config()
                .map_err(|e| CaptureError::DeviceError(e.to_string()))?;
            let sample_format = default_config.sample_format();

            // Ask for one packet per callback when the device allows it; the
            // accumulator regroups whatever arrives otherwise.
            let buffer_size = match default_config.buffer_size() {
                cpal::SupportedBufferSize::Range { min, max }
                    if (*min..=*max).contains(&request.frames_per_batch) =>
                {
                    cpal::BufferSize::Fixed(request.frames_per_batch)
                }
                _ => cpal::BufferSize::Default,
            };

            tracing::info!(
                "Selected device {} with {} input channels, capturing {}",
                name,
                available,
                channels
            );

            let config = cpal::StreamConfig {
                channels: u16::from(channels),
                sample_rate: cpal::SampleRate(request.sample_rate),
                buffer_size,
            };

            self.opened = Some(Opened {
                device,
                config,
                sample_format,
                batch_len: request.frames_per_batch as usize
                    * usize::from(channels)
                    * CAPTURE_SAMPLE_BYTES,
            });

            Ok(channels)
        }

        fn start(&mut self, callback: CaptureCallback) -> Result<(), CaptureError> {
            if self.stop_tx.is_some() {
                self.stop()?;
            }

            let opened = self
                .opened
                .clone()
                .ok_or_else(|| CaptureError::DeviceError("No device opened".into()))?;

            let (stop_tx, stop_rx) = mpsc::channel::<()>();
            let (status_tx, status_rx) = mpsc::channel();

            // cpal streams are not Send; the stream lives and dies on this thread
            let handle = thread::spawn(move || {
                let stream = match Self::build_stream(&opened, callback) {
                    Ok(stream) => stream,
                    Err(e) => {
                        let _ = status_tx.send(Err(e));
                        return;
                    }
                };
                if let Err(e) = stream.play() {
                    let _ = status_tx.send(Err(CaptureError::StreamError(e.to_string())));
                    return;
                }
                if status_tx.send(Ok(())).is_err() {
                    return;
                }
                // Blocks until stop() or the sender is dropped
                let _ = stop_rx.recv();
                drop(stream);
            });

            status_rx
                .recv()
                .map_err(|_| CaptureError::DeviceError("Capture thread panicked".into()))??;

            self.stop_tx = Some(stop_tx);
            self.thread = Some(handle);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), CaptureError> {
            if let Some(tx) = self.stop_tx.take() {
                let _ = tx.send(());
            }
            if let Some(handle) = self.thread.take() {
                handle
                    .join()
                    .map_err(|_| CaptureError::StreamError("Capture thread panicked".into()))?;
            }
            Ok(())
        }
    }

    impl Drop for CpalCapture {
        fn drop(&mut self) {
            let _ = self.stop();
        }
    }
}

#[cfg(feature = "audio-cpal")]
pub use implementation::CpalCapture;

//! Capture backend driven by the test

use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

use crate::audio::{AudioCapture, CaptureCallback, CaptureError, CaptureRequest, InputDevice};

#[derive(Default)]
struct Shared {
    callback: Option<CaptureCallback>,
    request: Option<CaptureRequest>,
    control_threads: Vec<ThreadId>,
}

/// Capture backend that only delivers what the test hands it
///
/// Batches are pushed through a [`CaptureHandle`], which stays usable after
/// the capture itself has been moved into a session.
pub struct ScriptedCapture {
    devices: Vec<InputDevice>,
    shared: Arc<Mutex<Shared>>,
}

impl std::fmt::Debug for ScriptedCapture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptedCapture")
            .field("devices", &self.devices)
            .finish_non_exhaustive()
    }
}

impl ScriptedCapture {
    /// Capture with one default device offering `input_channels`
    #[must_use]
    pub fn new(input_channels: u16) -> Self {
        Self::with_devices(vec![InputDevice {
            name: "Scripted Input".to_string(),
            input_channels,
            is_default: true,
        }])
    }

    /// Capture exposing `devices`
    #[must_use]
    pub fn with_devices(devices: Vec<InputDevice>) -> Self {
        Self {
            devices,
            shared: Arc::default(),
        }
    }

    /// Handle for delivering batches
    #[must_use]
    pub fn handle(&self) -> CaptureHandle {
        CaptureHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AudioCapture for ScriptedCapture {
    fn enumerate_devices(&self) -> Result<Vec<InputDevice>, CaptureError> {
        Ok(self.devices.clone())
    }

    fn open(&mut self, request: &CaptureRequest) -> Result<u8, CaptureError> {
        let device = match &request.device {
            Some(name) => self.devices.iter().find(|d| &d.name == name),
            None => self.devices.iter().find(|d| d.is_default),
        }
        .ok_or_else(|| {
            CaptureError::DeviceNotFound(request.device.clone().unwrap_or_else(|| "default".into()))
        })?;

        if device.input_channels == 0 {
            return Err(CaptureError::NoInputChannels(device.name.clone()));
        }

        let channels = request.resolve_channels(device.input_channels);
        self.lock().request = Some(request.clone());
        Ok(channels)
    }

    fn start(&mut self, callback: CaptureCallback) -> Result<(), CaptureError> {
        let mut shared = self.lock();
        shared.control_threads.push(thread::current().id());
        if shared.request.is_none() {
            return Err(CaptureError::StreamError("device not opened".into()));
        }
        shared.callback = Some(callback);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        let mut shared = self.lock();
        shared.control_threads.push(thread::current().id());
        shared.callback = None;
        Ok(())
    }
}

/// Pushes batches into a running [`ScriptedCapture`]
#[derive(Clone)]
pub struct CaptureHandle {
    shared: Arc<Mutex<Shared>>,
}

impl std::fmt::Debug for CaptureHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaptureHandle")
            .field("running", &self.is_running())
            .finish()
    }
}

impl CaptureHandle {
    fn lock(&self) -> std::sync::MutexGuard<'_, Shared> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver one batch, returning whether a callback received it
    pub fn deliver(&self, batch: &[u8]) -> bool {
        match self.lock().callback.as_mut() {
            Some(callback) => {
                callback(batch);
                true
            }
            None => false,
        }
    }

    /// Whether the capture has been started and not stopped
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().callback.is_some()
    }

    /// Threads that called `start` and `stop`, in call order
    #[must_use]
    pub fn control_threads(&self) -> Vec<ThreadId> {
        self.lock().control_threads.clone()
    }

    /// The request the capture was opened with
    #[must_use]
    pub fn request(&self) -> Option<CaptureRequest> {
        self.lock().request.clone()
    }
}

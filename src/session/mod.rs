//! Session orchestration
//!
//! Startup runs strictly in order and any failure aborts it: validate the
//! configuration, resolve the interface and media group, open the capture
//! device, wait for the clock, then start announcing and streaming. Nothing
//! is retried.


use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::audio::{AudioCapture, CaptureCallback, CaptureError, CaptureRequest, StreamFormat};
use crate::discovery::{SessionAnnouncer, SessionDescriptor, SessionParameters};
use crate::error::{Aes67Error, Result};
use crate::net::{DatagramSink, MulticastSender, select_interface};
use crate::protocol::ptp::{ClockSource, wait_for_source};
use crate::streaming::{DriftMonitor, PacketAssembler, StreamStats, SyncState};
use crate::types::SessionConfig;

/// Where the media and announcement flows are sent
#[derive(Clone)]
pub struct Transport {
    /// Media packets
    pub media: Arc<dyn DatagramSink>,
    /// SAP messages
    pub announcements: Arc<dyn DatagramSink>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport").finish_non_exhaustive()
    }
}

/// Entry point for starting a stream
#[derive(Debug)]
pub struct Aes67Session;

impl Aes67Session {
    /// Start streaming on the network
    ///
    /// # Errors
    ///
    /// Returns a fatal `Aes67Error` if the configuration is invalid, no
    /// interface is usable, the device cannot be opened or the clock does not
    /// synchronize in time.
    pub async fn start(
        config: SessionConfig,
        clock: Arc<dyn ClockSource>,
        capture: Box<dyn AudioCapture>,
    ) -> Result<RunningSession> {
        config.validate()?;

        let local = select_interface(config.local_address)?;
        let group = config.media_group(local);
        let transport = Transport {
            media: Arc::new(MulticastSender::media(
                local,
                group,
                config.media_port,
                config.multicast_ttl,
            )?),
            announcements: Arc::new(MulticastSender::announcements(
                local,
                config.multicast_ttl,
            )?),
        };

        Self::start_with_transport(config, local, transport, clock, capture).await
    }

    /// Start streaming from `local` through caller-provided sinks
    ///
    /// # Errors
    ///
    /// As [`Aes67Session::start`], minus interface and socket failures.
    pub async fn start_with_transport(
        config: SessionConfig,
        local: Ipv4Addr,
        transport: Transport,
        clock: Arc<dyn ClockSource>,
        mut capture: Box<dyn AudioCapture>,
    ) -> Result<RunningSession> {
        config.validate()?;
        let group = config.media_group(local);

        let request = CaptureRequest {
            device: config.device.clone(),
            channels: config.channels,
            sample_rate: config.sample_rate.as_u32(),
            frames_per_batch: config.frames_per_packet().unwrap_or_default(),
        };
        let channels = capture.open(&request).map_err(capture_failed)?;
        let format = config.stream_format(channels)?;
        tracing::info!(
            "Capturing {} channels at {} Hz",
            channels,
            format.sample_rate.as_u32()
        );

        let identity = wait_for_source(&*clock, config.sync_timeout).await?;
        tracing::info!("Synchronized to PTP master {}", identity);

        let session_id = unix_seconds();
        let descriptor = Arc::new(SessionDescriptor::new(SessionParameters {
            session_name: config.stream_name.clone(),
            origin: local,
            media_group: group,
            media_port: config.media_port,
            payload_type: config.payload_type,
            format,
            session_id,
            session_version: session_id,
            ptp_domain: config.ptp_domain,
            clock_identity: identity,
        }));

        let cancel = CancellationToken::new();
        let state = Arc::new(SyncState::new());

        let tasks = vec![
            tokio::spawn(
                SessionAnnouncer::new(
                    Arc::clone(&descriptor),
                    transport.announcements,
                    config.announce_interval,
                )
                .run(cancel.child_token()),
            ),
            tokio::spawn(
                DriftMonitor::new(
                    Arc::clone(&state),
                    format.frames_per_packet(),
                    format.packet_time,
                    config.drift_window,
                )
                .run(cancel.child_token()),
            ),
        ];

        let mut assembler = PacketAssembler::new(
            format,
            config.payload_type,
            descriptor.ssrc(),
            clock,
            transport.media,
            Arc::clone(&state),
        );
        let callback: CaptureCallback = Box::new(move |batch: &[u8]| {
            if let Err(e) = assembler.on_batch(batch) {
                tracing::debug!("Packet skipped: {}", e);
            }
        });
        let (capture, started) =
            run_blocking(capture, move |capture| capture.start(callback)).await;

        let mut session = RunningSession {
            capture,
            cancel,
            tasks,
            state,
            descriptor,
            format,
        };

        if let Err(e) = started {
            session.shutdown().await;
            return Err(capture_failed(e));
        }

        tracing::info!("Streaming to {}:{}", group, config.media_port);
        Ok(session)
    }
}

/// A session that is capturing, streaming and announcing
pub struct RunningSession {
    capture: Option<Box<dyn AudioCapture>>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
    state: Arc<SyncState>,
    descriptor: Arc<SessionDescriptor>,
    format: StreamFormat,
}

impl std::fmt::Debug for RunningSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunningSession")
            .field("format", &self.format)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

impl RunningSession {
    /// Stream counters
    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.state.stats()
    }

    /// The announced description
    #[must_use]
    pub fn descriptor(&self) -> &SessionDescriptor {
        &self.descriptor
    }

    /// Negotiated stream format
    #[must_use]
    pub fn format(&self) -> StreamFormat {
        self.format
    }

    /// Request a resync on the next packet
    pub fn resync(&self) {
        self.state.request_resync();
    }

    /// Stop capture, withdraw the announcement and wait for the timers
    ///
    /// # Errors
    ///
    /// Returns `Aes67Error::Capture` if the backend failed to stop cleanly.
    /// The timers are shut down regardless.
    pub async fn stop(mut self) -> Result<()> {
        let stopped = match self.capture.take() {
            Some(capture) => run_blocking(capture, |capture| capture.stop()).await.1,
            None => Ok(()),
        };
        self.shutdown().await;
        tracing::info!("Session stopped");
        stopped.map_err(Aes67Error::from)
    }

    async fn shutdown(&mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                tracing::warn!("Session task failed: {}", e);
            }
        }
    }
}

impl Drop for RunningSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Run a capture backend call on the blocking pool
///
/// Backends may join threads or wait on the audio host. The backend is handed
/// back unless the call panicked.
async fn run_blocking<T, F>(
    mut capture: Box<dyn AudioCapture>,
    call: F,
) -> (Option<Box<dyn AudioCapture>>, std::result::Result<T, CaptureError>)
where
    T: Send + 'static,
    F: FnOnce(&mut dyn AudioCapture) -> std::result::Result<T, CaptureError> + Send + 'static,
{
    let task = tokio::task::spawn_blocking(move || {
        let result = call(capture.as_mut());
        (capture, result)
    });
    match task.await {
        Ok((capture, result)) => (Some(capture), result),
        Err(e) => (
            None,
            Err(CaptureError::StreamError(format!("capture task failed: {e}"))),
        ),
    }
}

fn capture_failed(error: CaptureError) -> Aes67Error {
    if error.is_device_error() {
        Aes67Error::InvalidAudioDevice {
            message: error.to_string(),
        }
    } else {
        Aes67Error::Capture(error)
    }
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

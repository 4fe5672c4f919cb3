use std::time::Duration;

use super::*;
use crate::audio::{AudioCapture, CaptureError, CaptureRequest};
use crate::net::DatagramSink;
use crate::protocol::ptp::{ClockSource, PtpTimestamp};

fn request(device: Option<&str>, channels: Option<u8>) -> CaptureRequest {
    CaptureRequest {
        device: device.map(String::from),
        channels,
        sample_rate: 48000,
        frames_per_batch: 48,
    }
}

#[test]
fn test_manual_clock_set_and_advance() {
    let clock = ManualClock::new();
    assert_eq!(clock.now(), PtpTimestamp::ZERO);

    clock.set(PtpTimestamp::new(10, 500_000_000));
    clock.advance(Duration::from_millis(600));
    assert_eq!(clock.now(), PtpTimestamp::new(11, 100_000_000));
}

#[test]
fn test_manual_clock_synced() {
    let clock = ManualClock::synced("gm:0", 5, 0);
    assert_eq!(clock.source_identity().as_deref(), Some("gm:0"));
    assert_eq!(clock.now().seconds, 5);
}

#[test]
fn test_recording_sink_failure_mode() {
    let sink = RecordingSink::new();
    sink.send_datagram(b"one").unwrap();

    sink.set_failing(true);
    let err = sink.send_datagram(b"two").unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::WouldBlock);

    assert_eq!(sink.datagrams(), vec![b"one".to_vec()]);
}

#[test]
fn test_scripted_capture_lifecycle() {
    let mut capture = ScriptedCapture::new(2);
    let handle = capture.handle();

    assert!(!handle.deliver(&[0; 4]));
    assert_eq!(capture.open(&request(None, None)).unwrap(), 2);

    let seen = std::sync::Arc::new(std::sync::atomic::AtomicUsize::new(0));
    let counter = seen.clone();
    capture
        .start(Box::new(move |batch: &[u8]| {
            counter.fetch_add(batch.len(), std::sync::atomic::Ordering::SeqCst);
        }))
        .unwrap();

    assert!(handle.deliver(&[0; 4]));
    capture.stop().unwrap();
    assert!(!handle.deliver(&[0; 4]));
    assert!(!handle.is_running());
    assert_eq!(seen.load(std::sync::atomic::Ordering::SeqCst), 4);
}

#[test]
fn test_scripted_capture_unknown_device() {
    let mut capture = ScriptedCapture::new(2);
    let err = capture.open(&request(Some("Nope"), None)).unwrap_err();
    assert!(matches!(err, CaptureError::DeviceNotFound(_)));
    assert!(err.is_device_error());
}

#[test]
fn test_scripted_capture_start_requires_open() {
    let mut capture = ScriptedCapture::new(2);
    assert!(capture.start(Box::new(|_: &[u8]| {})).is_err());
}

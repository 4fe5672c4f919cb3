//! Stream a 1 kHz test tone without audio hardware
//!
//! A thread plays the part of the sound card and delivers one packet of
//! samples per packet period, paced against a fixed schedule. The host clock stands in for PTP.
//!
//! ```text
//! RUST_LOG=info cargo run --example stream_tone
//! ```

use std::f64::consts::TAU;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use aes67_send::protocol::ptp::SystemClock;
use aes67_send::testing::ScriptedCapture;
use aes67_send::{Aes67Session, SessionConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let capture = ScriptedCapture::new(2);
    let handle = capture.handle();
    let config = SessionConfig::builder().stream_name("Test Tone").build();

    let session = Aes67Session::start(
        config,
        Arc::new(SystemClock::new("00-00-00-FF-FE-00-00-00:0")),
        Box::new(capture),
    )
    .await?;

    let format = session.format();
    let running = Arc::new(AtomicBool::new(true));
    let generator = {
        let running = running.clone();
        std::thread::spawn(move || {
            let rate = f64::from(format.sample_rate.as_u32());
            let channels = usize::from(format.channels);
            let mut phase = 0.0f64;
            let mut batch = vec![0u8; format.batch_len()];
            let period = format.packet_time.as_duration();
            let mut deadline = Instant::now();

            while running.load(Ordering::Relaxed) {
                for frame in batch.chunks_exact_mut(2 * channels) {
                    #[allow(clippy::cast_possible_truncation)]
                    let sample = ((phase * TAU).sin() * f64::from(i16::MAX / 4)) as i16;
                    phase = (phase + 1000.0 / rate).fract();
                    for ch in frame.chunks_exact_mut(2) {
                        ch.copy_from_slice(&sample.to_le_bytes());
                    }
                }
                handle.deliver(&batch);

                // Next slot on the schedule, not relative to now
                deadline += period;
                if let Some(wait) = deadline.checked_duration_since(Instant::now()) {
                    std::thread::sleep(wait);
                }
            }
        })
    };

    tokio::signal::ctrl_c().await?;
    running.store(false, Ordering::Relaxed);
    let _ = generator.join();

    println!("{:?}", session.stats());
    session.stop().await?;
    Ok(())
}

//! Stream the default (or named) input device
//!
//! The host clock must already be disciplined to the PTP grandmaster, e.g.
//! by `ptp4l` and `phc2sys`. Pass the grandmaster identity as the first
//! argument and optionally a device name as the second.
//!
//! ```text
//! RUST_LOG=info cargo run --example stream_capture --features audio-cpal -- 00-1D-C1-FF-FE-12-34-56:0
//! ```

use std::sync::Arc;

use aes67_send::audio::{AudioCapture, CpalCapture};
use aes67_send::protocol::ptp::SystemClock;
use aes67_send::{Aes67Session, SessionConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let Some(grandmaster) = args.next() else {
        let capture = CpalCapture::new();
        println!("Usage: stream_capture <grandmaster-identity> [device]");
        println!("Input devices:");
        for device in capture.enumerate_devices()? {
            let marker = if device.is_default { " (default)" } else { "" };
            println!("  {} - {} inputs{}", device.name, device.input_channels, marker);
        }
        return Ok(());
    };

    let mut builder = SessionConfig::builder();
    if let Some(device) = args.next() {
        builder = builder.device(device);
    }

    let session = Aes67Session::start(
        builder.build(),
        Arc::new(SystemClock::new(grandmaster)),
        Box::new(CpalCapture::new()),
    )
    .await?;

    tokio::signal::ctrl_c().await?;
    println!("{:?}", session.stats());
    session.stop().await?;
    Ok(())
}

use std::time::Duration;

use crate::error::Aes67Error;
use crate::protocol::ptp::{ClockSource, SystemClock, wait_for_source};
use crate::testing::ManualClock;

#[tokio::test]
async fn test_system_clock_is_acquired_immediately() {
    let clock = SystemClock::new("00-1D-C1-FF-FE-12-34-56:0");

    let identity = wait_for_source(&clock, Duration::from_millis(10))
        .await
        .unwrap();
    assert_eq!(identity, "00-1D-C1-FF-FE-12-34-56:0");
    assert_eq!(clock.source_identity().as_deref(), Some(identity.as_str()));
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_source_resolves_on_acquisition() {
    let clock = std::sync::Arc::new(ManualClock::new());
    assert!(clock.source_identity().is_none());

    let acquirer = clock.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(2)).await;
        acquirer.acquire("AC-DE-48-FF-FE-00-11-22:0");
    });

    let identity = wait_for_source(clock.as_ref(), Duration::from_secs(10))
        .await
        .unwrap();
    assert_eq!(identity, "AC-DE-48-FF-FE-00-11-22:0");
}

#[tokio::test(start_paused = true)]
async fn test_wait_for_source_times_out() {
    let clock = ManualClock::new();

    let result = wait_for_source(&clock, Duration::from_secs(10)).await;
    match result {
        Err(Aes67Error::ClockNotSynchronized { timeout }) => {
            assert_eq!(timeout, Duration::from_secs(10));
        }
        other => panic!("expected ClockNotSynchronized, got {other:?}"),
    }
}

#[test]
fn test_system_clock_now_tracks_host_time() {
    let clock = SystemClock::new("gm");
    let a = clock.now();
    let b = clock.now();
    assert!(b >= a);
}

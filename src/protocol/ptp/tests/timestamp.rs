use crate::protocol::ptp::timestamp::PtpTimestamp;
use proptest::prelude::*;
use std::time::Duration;

// ===== Construction =====

#[test]
fn test_new_clamps_nanoseconds() {
    let ts = PtpTimestamp::new(10, 2_000_000_000);
    assert_eq!(ts.seconds, 10);
    assert_eq!(ts.nanoseconds, PtpTimestamp::NANOS_PER_SEC - 1);
}

#[test]
fn test_now_returns_reasonable_value() {
    let ts = PtpTimestamp::now();
    // Should be after 2020-01-01 (1577836800 seconds since Unix epoch)
    assert!(ts.seconds > 1_577_836_800, "Timestamp too old: {ts}");
    assert!(ts.nanoseconds < PtpTimestamp::NANOS_PER_SEC);
}

#[test]
fn test_add_duration_carries_into_seconds() {
    let ts = PtpTimestamp::new(1, 900_000_000).add_duration(Duration::from_millis(200));
    assert_eq!(ts, PtpTimestamp::new(2, 100_000_000));
    assert_eq!(ts.to_nanos(), 2_100_000_000);
}

#[test]
fn test_add_operator_and_ordering() {
    let early = PtpTimestamp::new(3, 999_999_999);
    let late = early + Duration::from_nanos(1);
    assert_eq!(late, PtpTimestamp::new(4, 0));
    assert!(late > early);
    assert_eq!(Duration::from(late), Duration::from_secs(4));
}

#[test]
fn test_display_pads_nanoseconds() {
    assert_eq!(PtpTimestamp::new(5, 42).to_string(), "5.000000042");
}

// ===== Media clock mapping =====

#[test]
fn test_media_time_reference_value() {
    // 10 s + 0.5 s at 48 kHz
    let ts = PtpTimestamp::new(10, 500_000_000);
    assert_eq!(ts.to_media_time(48_000), 504_000);
}

#[test]
fn test_media_time_rounds_half_up() {
    // 10_416 ns at 48 kHz is 0.499968 samples, 10_417 ns is 0.500016
    assert_eq!(PtpTimestamp::new(0, 10_416).to_media_time(48_000), 0);
    assert_eq!(PtpTimestamp::new(0, 10_417).to_media_time(48_000), 1);
}

#[test]
fn test_media_time_wraps_at_32_bits() {
    // 2^32 / 48000 = 89478.485333 s
    let ts = PtpTimestamp::new(89_479, 0);
    let expected = (89_479u64 * 48_000) % (1u64 << 32);
    assert_eq!(u64::from(ts.to_media_time(48_000)), expected);
}

#[test]
fn test_media_time_current_epoch() {
    let ts = PtpTimestamp::new(1_700_000_000, 123_456_789);
    let expected = (1_700_000_000u128 * 48_000 + 5_926) % (1u128 << 32);
    assert_eq!(u128::from(ts.to_media_time(48_000)), expected);
}

proptest! {
    #[test]
    fn prop_media_time_matches_wide_arithmetic(
        seconds in 0u64..(1u64 << 40),
        nanos in 0u32..1_000_000_000,
        rate in prop::sample::select(vec![44_100u32, 48_000, 88_200, 96_000]),
    ) {
        let ts = PtpTimestamp::new(seconds, nanos);
        let wide = u128::from(seconds) * u128::from(rate)
            + (u128::from(nanos) * u128::from(rate) + 500_000_000) / 1_000_000_000;
        prop_assert_eq!(u128::from(ts.to_media_time(rate)), wide % (1u128 << 32));
    }
}

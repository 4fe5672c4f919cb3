use std::hint::black_box;
use std::net::Ipv4Addr;
use std::sync::Arc;

use aes67_send::audio::{PacketTime, SampleRate, StreamFormat, WireEncoding, convert_into};
use aes67_send::discovery::{SessionDescriptor, SessionParameters};
use aes67_send::net::DatagramSink;
use aes67_send::protocol::rtp::{DYNAMIC_PAYLOAD_TYPE, RtpHeader};
use aes67_send::streaming::{PacketAssembler, SyncState};
use aes67_send::testing::ManualClock;
use criterion::{Criterion, criterion_group, criterion_main};

/// Discards everything, so the benchmark measures assembly alone
struct NullSink;

impl DatagramSink for NullSink {
    fn send_datagram(&self, payload: &[u8]) -> std::io::Result<usize> {
        Ok(payload.len())
    }
}

fn format(channels: u8) -> StreamFormat {
    StreamFormat::new(WireEncoding::L24, SampleRate::Hz48000, channels, PacketTime::Ms1).unwrap()
}

fn benchmark_convert(c: &mut Criterion) {
    for channels in [2u8, 8] {
        let format = format(channels);
        let input = vec![0x55u8; format.batch_len()];
        let mut output = vec![0u8; format.payload_len()];
        c.bench_function(&format!("convert_l24_{channels}ch"), |b| {
            b.iter(|| {
                convert_into(
                    black_box(&input),
                    channels,
                    WireEncoding::L24,
                    black_box(&mut output),
                )
            });
        });
    }
}

fn benchmark_header(c: &mut Criterion) {
    let mut buf = [0u8; RtpHeader::SIZE];
    c.bench_function("rtp_header_encode", |b| {
        b.iter(|| {
            RtpHeader::new_audio(black_box(1234), black_box(5678), 0xDEAD_BEEF, 96)
                .encode_into(&mut buf);
        });
    });
}

fn benchmark_assembler(c: &mut Criterion) {
    let format = format(8);
    let clock = Arc::new(ManualClock::synced("gm:0", 1_700_000_000, 0));
    let mut assembler = PacketAssembler::new(
        format,
        DYNAMIC_PAYLOAD_TYPE,
        1,
        clock,
        Arc::new(NullSink),
        Arc::new(SyncState::new()),
    );
    let batch = vec![0x11u8; format.batch_len()];

    c.bench_function("assemble_packet_8ch", |b| {
        b.iter(|| assembler.on_batch(black_box(&batch)));
    });
}

fn benchmark_descriptor(c: &mut Criterion) {
    c.bench_function("build_session_descriptor", |b| {
        b.iter(|| {
            SessionDescriptor::new(SessionParameters {
                session_name: "Bench".to_string(),
                origin: Ipv4Addr::new(10, 0, 0, 5),
                media_group: Ipv4Addr::new(239, 69, 0, 5),
                media_port: 5004,
                payload_type: 96,
                format: format(2),
                session_id: 1,
                session_version: 1,
                ptp_domain: 0,
                clock_identity: "gm:0".to_string(),
            })
        });
    });
}

criterion_group!(
    benches,
    benchmark_convert,
    benchmark_header,
    benchmark_assembler,
    benchmark_descriptor
);
criterion_main!(benches);

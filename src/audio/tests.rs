use proptest::prelude::*;

use super::*;

fn le_bytes(samples: &[i16]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_le_bytes()).collect()
}

// ----- Formats -----

#[test]
fn test_frames_per_packet() {
    assert_eq!(PacketTime::Ms1.frames_per_packet(SampleRate::Hz48000), Some(48));
    assert_eq!(PacketTime::Us125.frames_per_packet(SampleRate::Hz48000), Some(6));
    assert_eq!(PacketTime::Us333.frames_per_packet(SampleRate::Hz48000), Some(16));
    assert_eq!(PacketTime::Ms4.frames_per_packet(SampleRate::Hz96000), Some(384));
    assert_eq!(PacketTime::Ms1.frames_per_packet(SampleRate::Hz44100), None);
}

#[test]
fn test_stream_format_sizes() {
    let format =
        StreamFormat::new(WireEncoding::L24, SampleRate::Hz48000, 2, PacketTime::Ms1).unwrap();
    assert_eq!(format.frames_per_packet(), 48);
    assert_eq!(format.samples_per_packet(), 96);
    assert_eq!(format.batch_len(), 192);
    assert_eq!(format.payload_len(), 288);
}

#[test]
fn test_stream_format_rejects_channels() {
    assert!(StreamFormat::new(WireEncoding::L24, SampleRate::Hz48000, 0, PacketTime::Ms1).is_none());
    assert!(StreamFormat::new(WireEncoding::L24, SampleRate::Hz48000, 9, PacketTime::Ms1).is_none());
}

#[test]
fn test_sample_rate_from_hz() {
    assert_eq!(SampleRate::from_hz(96000), Some(SampleRate::Hz96000));
    assert_eq!(SampleRate::from_hz(22050), None);
}

#[test]
fn test_packet_time_sdp_value() {
    assert_eq!(PacketTime::Ms1.sdp_value(), "1");
    assert_eq!(PacketTime::Us125.sdp_value(), "0.125");
    assert_eq!(PacketTime::Ms1.as_duration(), std::time::Duration::from_millis(1));
}

// ----- Conversion -----

#[test]
fn test_convert_eight_samples_to_l24() {
    let input = le_bytes(&[0, 1, -1, 0x1234, i16::MAX, i16::MIN, 256, -256]);
    assert_eq!(input.len(), 16);

    let output = convert_samples(&input, 2, WireEncoding::L24).unwrap();
    assert_eq!(
        output,
        vec![
            0x00, 0x00, 0x00, //
            0x00, 0x01, 0x00, //
            0xFF, 0xFF, 0x00, //
            0x12, 0x34, 0x00, //
            0x7F, 0xFF, 0x00, //
            0x80, 0x00, 0x00, //
            0x01, 0x00, 0x00, //
            0xFF, 0x00, 0x00,
        ]
    );
}

#[test]
fn test_convert_l16_swaps_bytes() {
    let output = convert_samples(&le_bytes(&[0x1234, -2]), 1, WireEncoding::L16).unwrap();
    assert_eq!(output, vec![0x12, 0x34, 0xFF, 0xFE]);
}

#[test]
fn test_convert_misaligned_is_rejected() {
    // Seven bytes is not a whole number of stereo frames
    let err = convert_samples(&[0u8; 7], 2, WireEncoding::L24).unwrap_err();
    assert_eq!(err, ConvertError::Misaligned { len: 7, channels: 2 });

    // Six bytes holds three mono samples but not a stereo frame count
    assert!(convert_samples(&[0u8; 6], 2, WireEncoding::L24).is_err());
}

#[test]
fn test_convert_into_leaves_output_untouched_on_error() {
    let mut output = [0xAAu8; 6];
    let err = convert_into(&le_bytes(&[1, 2, 3]), 1, WireEncoding::L24, &mut output).unwrap_err();
    assert!(matches!(err, ConvertError::OutputTooSmall { needed: 9, have: 6 }));
    assert_eq!(output, [0xAA; 6]);
}

#[test]
fn test_converted_len_zero_channels() {
    assert!(converted_len(&[0u8; 4], 0, WireEncoding::L24).is_err());
}

// ----- Accumulator -----

#[test]
fn test_accumulator_rechunks() {
    let mut acc = FrameAccumulator::new(8);
    let mut batches = Vec::new();

    acc.push_bytes(&[1, 2, 3], |b| batches.push(b.to_vec()));
    assert!(batches.is_empty());
    assert_eq!(acc.pending(), 3);

    acc.push_bytes(&[4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17], |b| {
        batches.push(b.to_vec());
    });
    assert_eq!(
        batches,
        vec![vec![1, 2, 3, 4, 5, 6, 7, 8], vec![9, 10, 11, 12, 13, 14, 15, 16]]
    );
    assert_eq!(acc.pending(), 1);

    acc.reset();
    assert_eq!(acc.pending(), 0);
}

#[test]
fn test_accumulator_push_samples() {
    let mut acc = FrameAccumulator::new(4);
    let mut batches = Vec::new();
    acc.push_samples(&[1, -1, 2], |b| batches.push(b.to_vec()));
    assert_eq!(batches, vec![le_bytes(&[1, -1])]);
}

#[test]
fn test_accumulator_push_f32_scales_and_clamps() {
    let mut acc = FrameAccumulator::new(8);
    let mut batches = Vec::new();
    acc.push_f32(&[0.0, 1.0, -1.0, 2.0, 0.5], |b| batches.push(b.to_vec()));

    assert_eq!(batches, vec![le_bytes(&[0, i16::MAX, -i16::MAX, i16::MAX])]);
    assert_eq!(acc.pending(), 2);
}

#[test]
fn test_accumulator_push_f32_large_buffer_spans_batches() {
    let mut acc = FrameAccumulator::new(4);
    let mut count = 0;
    acc.push_f32(&vec![0.25; 4096], |b| {
        assert_eq!(b.len(), 4);
        count += 1;
    });
    assert_eq!(count, 2048);
    assert_eq!(acc.pending(), 0);
}

#[test]
fn test_accumulator_rounds_to_whole_samples() {
    assert_eq!(FrameAccumulator::new(7).batch_len(), 6);
}

// ----- Capture request -----

#[test]
fn test_resolve_channels() {
    let request = |channels| CaptureRequest {
        device: None,
        channels,
        sample_rate: 48000,
        frames_per_batch: 48,
    };
    assert_eq!(request(None).resolve_channels(2), 2);
    assert_eq!(request(None).resolve_channels(32), 8);
    assert_eq!(request(Some(2)).resolve_channels(16), 2);
    assert_eq!(request(Some(6)).resolve_channels(4), 4);
    assert_eq!(request(Some(0)).resolve_channels(4), 4);
}

#[cfg(not(feature = "audio-cpal"))]
#[test]
fn test_default_capture_unavailable_without_backend() {
    assert!(matches!(
        create_default_capture(),
        Err(CaptureError::Unavailable(_))
    ));
}

proptest! {
    #[test]
    fn prop_l24_preserves_sample(samples in proptest::collection::vec(any::<i16>(), 1..256)) {
        let output = convert_samples(&le_bytes(&samples), 1, WireEncoding::L24).unwrap();
        prop_assert_eq!(output.len(), samples.len() * 3);
        for (sample, wire) in samples.iter().zip(output.chunks_exact(3)) {
            let decoded = i32::from_be_bytes([wire[0], wire[1], wire[2], 0]) >> 8;
            prop_assert_eq!(decoded, i32::from(*sample) << 8);
        }
    }

    #[test]
    fn prop_accumulator_conserves_bytes(
        chunks in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..50), 0..20)
    ) {
        let mut acc = FrameAccumulator::new(16);
        let mut out = Vec::new();
        for chunk in &chunks {
            acc.push_bytes(chunk, |b| {
                assert_eq!(b.len(), 16);
                out.extend_from_slice(b);
            });
        }
        let input: Vec<u8> = chunks.concat();
        prop_assert_eq!(out.len() + acc.pending(), input.len());
        prop_assert_eq!(&out[..], &input[..out.len()]);
    }
}

use super::*;

fn origin() -> Ipv4Addr {
    Ipv4Addr::new(192, 168, 1, 20)
}

#[test]
fn test_announcement_header_bytes() {
    let packet = SapPacket::sdp(SapHeader::announcement(origin()), "v=0\r\n");
    let encoded = packet.encode();

    assert_eq!(encoded[0], 0x20);
    assert_eq!(encoded[1], 0x00);
    assert_eq!(&encoded[2..4], &[0xEF, 0xEF]);
    assert_eq!(&encoded[4..8], &[192, 168, 1, 20]);
    assert_eq!(&encoded[8..24], b"application/sdp\0");
    assert_eq!(&encoded[24..], b"v=0\r\n");
}

#[test]
fn test_deletion_flag() {
    let header = SapHeader {
        message_type: SapMessageType::Deletion,
        ..SapHeader::announcement(origin())
    };
    assert_eq!(header.flags_byte(), 0x24);
}

#[test]
fn test_decode_encoded_packet() {
    let packet = SapPacket::sdp(SapHeader::announcement(origin()), "v=0\r\ns=Test\r\n");
    let decoded = SapPacket::decode(&packet.encode()).unwrap();
    assert_eq!(decoded, packet);
}

#[test]
fn test_decode_without_payload_type() {
    let mut buf = vec![0x20, 0x00, 0x12, 0x34, 10, 0, 0, 1];
    buf.extend_from_slice(b"v=0\r\n");

    let decoded = SapPacket::decode(&buf).unwrap();
    assert_eq!(decoded.payload_type, SDP_CONTENT_TYPE);
    assert_eq!(decoded.header.message_id_hash, 0x1234);
    assert_eq!(decoded.payload, "v=0\r\n");
}

#[test]
fn test_decode_skips_authentication_data() {
    let mut buf = vec![0x20, 0x01, 0xEF, 0xEF, 10, 0, 0, 1, 0xAA, 0xBB, 0xCC, 0xDD];
    buf.extend_from_slice(b"application/sdp\0v=0\r\n");

    let decoded = SapPacket::decode(&buf).unwrap();
    assert_eq!(decoded.payload, "v=0\r\n");
}

#[test]
fn test_decode_rejects_unsupported() {
    assert_eq!(
        SapPacket::decode(&[0x40, 0, 0, 0, 0, 0, 0, 0]),
        Err(SapDecodeError::UnsupportedVersion(2))
    );
    assert_eq!(
        SapPacket::decode(&[0x22, 0, 0, 0, 0, 0, 0, 0]),
        Err(SapDecodeError::UnsupportedFlags(0x22))
    );
    assert!(matches!(
        SapPacket::decode(&[0x20, 0, 0]),
        Err(SapDecodeError::BufferTooSmall { .. })
    ));
}

#[test]
fn test_decode_unterminated_payload_type() {
    let mut buf = vec![0x20, 0, 0, 0, 1, 2, 3, 4];
    buf.extend_from_slice(b"application/sdp");
    assert_eq!(
        SapPacket::decode(&buf),
        Err(SapDecodeError::UnterminatedPayloadType)
    );
}

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use aes67_send::protocol::rtp::RtpPacket;
use aes67_send::protocol::sap::{SapMessageType, SapPacket};
use aes67_send::testing::{ManualClock, RecordingSink, ScriptedCapture};
use aes67_send::{Aes67Error, Aes67Session, PacketTime, SessionConfig, Transport, WireEncoding};

#[tokio::test(start_paused = true)]
async fn test_full_session_lifecycle() {
    let clock = Arc::new(ManualClock::synced("00-1D-C1-FF-FE-12-34-56:0", 1_000, 0));
    let capture = ScriptedCapture::new(4);
    let handle = capture.handle();
    let media = Arc::new(RecordingSink::new());
    let announcements = Arc::new(RecordingSink::new());

    let config = SessionConfig::builder()
        .stream_name("Lobby")
        .channels(2)
        .encoding(WireEncoding::L16)
        .packet_time(PacketTime::Ms4)
        .build();
    let session = Aes67Session::start_with_transport(
        config,
        Ipv4Addr::new(10, 0, 0, 5),
        Transport {
            media: media.clone(),
            announcements: announcements.clone(),
        },
        clock.clone(),
        Box::new(capture),
    )
    .await
    .unwrap();

    let format = session.format();
    assert_eq!(format.frames_per_packet(), 192);
    assert_eq!(format.channels, 2);

    let batch = vec![0u8; format.batch_len()];
    for _ in 0..50 {
        handle.deliver(&batch);
        clock.advance(Duration::from_millis(4));
        tokio::time::sleep(Duration::from_millis(4)).await;
    }

    let packets = media.datagrams();
    assert_eq!(packets.len(), 50);
    for (i, d) in packets.iter().enumerate() {
        let packet = RtpPacket::decode(d).unwrap();
        #[allow(clippy::cast_possible_truncation)]
        let i = i as u32;
        assert_eq!(u32::from(packet.header.sequence), i);
        assert_eq!(packet.header.timestamp, 48_000_000 + i * 192);
        assert_eq!(packet.payload.len(), 192 * 2 * 2);
    }

    let stats = session.stats();
    assert_eq!(stats.packets_sent, 50);
    assert_eq!(stats.resyncs, 0);

    let sdp = session.descriptor().sdp().to_string();
    assert!(sdp.contains("a=rtpmap:96 L16/48000/2\r\n"));
    assert!(sdp.contains("a=framecount:192\r\n"));
    assert!(sdp.contains("a=ptime:4\r\n"));

    session.stop().await.unwrap();

    let sap = announcements.datagrams();
    assert_eq!(
        SapPacket::decode(&sap[0]).unwrap().header.message_type,
        SapMessageType::Announcement
    );
    let last = SapPacket::decode(sap.last().unwrap()).unwrap();
    assert_eq!(last.header.message_type, SapMessageType::Deletion);
    assert_eq!(last.payload, sdp);
}

#[tokio::test]
async fn test_unassigned_local_address_is_fatal() {
    let config = SessionConfig::builder()
        .local_address(Ipv4Addr::new(203, 0, 113, 77))
        .build();
    let err = Aes67Session::start(
        config,
        Arc::new(ManualClock::synced("gm:0", 0, 0)),
        Box::new(ScriptedCapture::new(2)),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        Aes67Error::InterfaceNotFound { .. } | Aes67Error::NoNetworkInterface
    ));
    assert!(err.is_fatal());
}

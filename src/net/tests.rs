use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, UdpSocket};

use super::*;

fn v4(a: u8, b: u8, c: u8, d: u8) -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(a, b, c, d))
}

#[test]
fn test_default_group_from_last_two_octets() {
    assert_eq!(
        default_multicast_group(Ipv4Addr::new(10, 0, 0, 5)),
        Ipv4Addr::new(239, 69, 0, 5)
    );
    assert_eq!(
        default_multicast_group(Ipv4Addr::new(192, 168, 178, 23)),
        Ipv4Addr::new(239, 69, 178, 23)
    );
}

#[test]
fn test_pick_skips_loopback_and_ipv6() {
    let addrs = vec![
        v4(127, 0, 0, 1),
        IpAddr::V6(Ipv6Addr::LOCALHOST),
        v4(192, 168, 1, 20),
        v4(10, 0, 0, 5),
    ];
    assert_eq!(pick_ipv4(addrs, None), Some(Ipv4Addr::new(192, 168, 1, 20)));
}

#[test]
fn test_pick_preferred_must_exist() {
    let addrs = vec![v4(192, 168, 1, 20), v4(10, 0, 0, 5)];
    assert_eq!(
        pick_ipv4(addrs.clone(), Some(Ipv4Addr::new(10, 0, 0, 5))),
        Some(Ipv4Addr::new(10, 0, 0, 5))
    );
    assert_eq!(pick_ipv4(addrs, Some(Ipv4Addr::new(10, 0, 0, 6))), None);
}

#[test]
fn test_pick_nothing_usable() {
    assert_eq!(pick_ipv4(vec![v4(127, 0, 0, 1)], None), None);
    assert_eq!(pick_ipv4(Vec::new(), None), None);
}

#[test]
fn test_media_sender_delivers_to_destination() {
    // Unicast destination on loopback exercises the same send path
    let receiver = UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = receiver.local_addr().unwrap().port();

    let sender = MulticastSender::media(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST, port, 1).unwrap();
    assert_eq!(sender.destination().port(), port);

    let sent = sender.send_datagram(b"hello").unwrap();
    assert_eq!(sent, 5);

    let mut buf = [0u8; 16];
    let (len, _) = receiver.recv_from(&mut buf).unwrap();
    assert_eq!(&buf[..len], b"hello");
}

#[test]
fn test_unicast_media_destination_joins_nothing() {
    let sender = MulticastSender::media(Ipv4Addr::LOCALHOST, Ipv4Addr::LOCALHOST, 5004, 1).unwrap();
    assert_eq!(sender.joined_group(), None);
}

#[test]
fn test_announcement_sender_joins_sap_group() {
    use crate::protocol::sap::{SAP_MULTICAST_GROUP, SAP_PORT};

    let sender = MulticastSender::announcements(Ipv4Addr::LOCALHOST, 1).unwrap();
    assert_eq!(sender.joined_group(), Some(SAP_MULTICAST_GROUP));
    assert_eq!(
        sender.destination(),
        std::net::SocketAddrV4::new(SAP_MULTICAST_GROUP, SAP_PORT)
    );
    assert_eq!(sender.local_addr().unwrap().port(), SAP_PORT);
}

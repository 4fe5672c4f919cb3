//! Multicast UDP sender

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4, UdpSocket};

use socket2::{Domain, Protocol, Socket, Type};

use super::DatagramSink;
use crate::protocol::sap::{SAP_MULTICAST_GROUP, SAP_PORT};

/// Non-blocking UDP sender bound to one egress interface
///
/// The interface is pinned with `IP_MULTICAST_IF` so a multi-homed host never
/// lets the routing table pick where the stream goes.
#[derive(Debug)]
pub struct MulticastSender {
    socket: UdpSocket,
    destination: SocketAddrV4,
    joined: Option<Ipv4Addr>,
}

impl MulticastSender {
    fn socket(local: Ipv4Addr, ttl: u32, reuse: bool) -> io::Result<Socket> {
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        if reuse {
            socket.set_reuse_address(true)?;
        }
        socket.set_multicast_if_v4(&local)?;
        socket.set_multicast_ttl_v4(ttl)?;
        socket.set_multicast_loop_v4(true)?;
        socket.set_nonblocking(true)?;
        Ok(socket)
    }

    fn join(socket: &Socket, group: Ipv4Addr, local: Ipv4Addr) -> io::Result<Option<Ipv4Addr>> {
        if !group.is_multicast() {
            return Ok(None);
        }
        socket.join_multicast_v4(&group, &local)?;
        Ok(Some(group))
    }

    /// Open the media stream sender
    ///
    /// Binds to an ephemeral port on `local` and joins `group` on that
    /// interface.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket cannot be configured.
    pub fn media(local: Ipv4Addr, group: Ipv4Addr, port: u16, ttl: u32) -> io::Result<Self> {
        let socket = Self::socket(local, ttl, false)?;
        socket.bind(&SocketAddrV4::new(local, 0).into())?;
        let joined = Self::join(&socket, group, local)?;

        tracing::info!("Selected {} as RTP multicast address", group);
        Ok(Self {
            socket: socket.into(),
            destination: SocketAddrV4::new(group, port),
            joined,
        })
    }

    /// Open the session announcement sender
    ///
    /// Binds the well-known SAP port with address reuse so other announcers
    /// on the host can coexist, and joins the SAP group on `local`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket cannot be configured.
    pub fn announcements(local: Ipv4Addr, ttl: u32) -> io::Result<Self> {
        let socket = Self::socket(local, ttl, true)?;
        socket.bind(&SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, SAP_PORT).into())?;
        let joined = Self::join(&socket, SAP_MULTICAST_GROUP, local)?;

        Ok(Self {
            socket: socket.into(),
            destination: SocketAddrV4::new(SAP_MULTICAST_GROUP, SAP_PORT),
            joined,
        })
    }

    /// Where datagrams are sent
    #[must_use]
    pub fn destination(&self) -> SocketAddrV4 {
        self.destination
    }

    /// Multicast group this socket is a member of
    #[must_use]
    pub fn joined_group(&self) -> Option<Ipv4Addr> {
        self.joined
    }

    /// Local address of the underlying socket
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the socket has no local address.
    pub fn local_addr(&self) -> io::Result<std::net::SocketAddr> {
        self.socket.local_addr()
    }
}

impl DatagramSink for MulticastSender {
    fn send_datagram(&self, payload: &[u8]) -> io::Result<usize> {
        self.socket.send_to(payload, self.destination)
    }
}

//! Local interface selection

use std::net::{IpAddr, Ipv4Addr};

use crate::error::Aes67Error;

/// Pick the address to stream from
///
/// With a preferred address, that address must be assigned locally.
/// Otherwise the first non-loopback IPv4 address wins.
#[must_use]
pub fn pick_ipv4<I>(addrs: I, preferred: Option<Ipv4Addr>) -> Option<Ipv4Addr>
where
    I: IntoIterator<Item = IpAddr>,
{
    let mut candidates = addrs.into_iter().filter_map(|addr| match addr {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
        _ => None,
    });

    match preferred {
        Some(wanted) => candidates.find(|addr| *addr == wanted),
        None => candidates.next(),
    }
}

/// Resolve the local interface address for the session
///
/// # Errors
///
/// Returns `Aes67Error::NoNetworkInterface` if the host has no usable IPv4
/// interface, or `Aes67Error::InterfaceNotFound` if `preferred` is not
/// assigned to any interface.
pub fn select_interface(preferred: Option<Ipv4Addr>) -> Result<Ipv4Addr, Aes67Error> {
    let interfaces = if_addrs::get_if_addrs()?;
    let addrs: Vec<IpAddr> = interfaces.iter().map(if_addrs::Interface::ip).collect();

    if let Some(addr) = pick_ipv4(addrs.iter().copied(), preferred) {
        tracing::info!("Selected {} as network interface", addr);
        return Ok(addr);
    }

    let any_usable = pick_ipv4(addrs.iter().copied(), None).is_some();
    match preferred {
        Some(address) if any_usable => Err(Aes67Error::InterfaceNotFound { address }),
        _ => Err(Aes67Error::NoNetworkInterface),
    }
}

/// Default media group for a local address: `239.69.<c>.<d>`
#[must_use]
pub fn default_multicast_group(local: Ipv4Addr) -> Ipv4Addr {
    let [_, _, c, d] = local.octets();
    Ipv4Addr::new(239, 69, c, d)
}

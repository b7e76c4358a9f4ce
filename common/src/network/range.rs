use std::net::Ipv4Addr;

use pnet::ipnetwork::{IpNetworkError, Ipv4Network};

/// An inclusive, ascending span of IPv4 addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv4Range {
    pub start_addr: Ipv4Addr,
    pub end_addr: Ipv4Addr,
}

impl Ipv4Range {
    pub fn new(start_addr: Ipv4Addr, end_addr: Ipv4Addr) -> Self {
        Self {
            start_addr,
            end_addr,
        }
    }

    pub fn to_iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        (start..=end).map(Ipv4Addr::from)
    }

    pub fn len(&self) -> usize {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        if end < start {
            return 0;
        }
        (end - start) as usize + 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the address at `offset` from the start, if it lies inside the range.
    pub fn nth(&self, offset: usize) -> Option<Ipv4Addr> {
        if offset >= self.len() {
            return None;
        }
        let start: u32 = self.start_addr.into();
        Some(Ipv4Addr::from(start + offset as u32))
    }

    /// Position of `addr` inside the range.
    pub fn offset_of(&self, addr: Ipv4Addr) -> Option<usize> {
        let start: u32 = self.start_addr.into();
        let end: u32 = self.end_addr.into();
        let addr: u32 = addr.into();
        (start..=end)
            .contains(&addr)
            .then(|| (addr - start) as usize)
    }
}

/// The full span of a CIDR block, network and broadcast addresses included.
pub fn cidr_range(ip: Ipv4Addr, prefix: u8) -> Result<Ipv4Range, IpNetworkError> {
    let network = Ipv4Network::new(ip, prefix)?;
    Ok(Ipv4Range::new(network.network(), network.broadcast()))
}

/// The span of host addresses in a CIDR block.
///
/// Network and broadcast addresses are stripped for prefixes up to /30.
/// A /31 keeps both addresses (point-to-point link) and a /32 keeps its single address.
pub fn usable_range(ip: Ipv4Addr, prefix: u8) -> Result<Ipv4Range, IpNetworkError> {
    let full = cidr_range(ip, prefix)?;
    if prefix >= 31 {
        return Ok(full);
    }

    let start_u32 = u32::from(full.start_addr).saturating_add(1);
    let end_u32 = u32::from(full.end_addr).saturating_sub(1);
    Ok(Ipv4Range::new(
        Ipv4Addr::from(start_u32),
        Ipv4Addr::from(end_u32),
    ))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

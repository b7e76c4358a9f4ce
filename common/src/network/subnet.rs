//! # Subnets and Address Sets
//!
//! A [`Subnet`] is a validated IPv4 CIDR block. Expanding it yields an
//! [`AddressSet`]: the ascending, duplicate-free list of host addresses that
//! the sweep probes.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use crate::error::InvalidSubnetError;
use crate::network::range::{self, Ipv4Range};

const MAX_PREFIX: u8 = 32;

/// Prefixes shorter than this expand to more than 65 534 hosts.
pub const LARGE_SUBNET_PREFIX: u8 = 16;

/// A validated IPv4 network in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Subnet {
    network_addr: Ipv4Addr,
    prefix: u8,
}

impl Subnet {
    pub fn new(network_addr: Ipv4Addr, prefix: u8) -> Result<Self, InvalidSubnetError> {
        if prefix > MAX_PREFIX {
            return Err(InvalidSubnetError::Prefix(prefix.to_string()));
        }

        let full = range::cidr_range(network_addr, prefix)
            .map_err(|_| InvalidSubnetError::Prefix(prefix.to_string()))?;
        if full.start_addr != network_addr {
            return Err(InvalidSubnetError::HostBits(format!("{network_addr}/{prefix}")));
        }

        Ok(Self {
            network_addr,
            prefix,
        })
    }

    pub fn network_addr(&self) -> Ipv4Addr {
        self.network_addr
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Expands the subnet into its usable host addresses.
    pub fn hosts(&self) -> AddressSet {
        // `new` already validated the prefix, so the fallback is never taken.
        let range = range::usable_range(self.network_addr, self.prefix)
            .unwrap_or(Ipv4Range::new(self.network_addr, self.network_addr));
        AddressSet { range }
    }

    /// True when a sweep would hold more than a /16 worth of outcomes in memory.
    pub fn is_large(&self) -> bool {
        self.prefix < LARGE_SUBNET_PREFIX
    }

    /// The subnet identifier with path-unsafe characters replaced, e.g. `10.0.0.0_24`.
    pub fn file_stem(&self) -> String {
        self.to_string().replace('/', "_")
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network_addr, self.prefix)
    }
}

impl FromStr for Subnet {
    type Err = InvalidSubnetError;

    /// Parses `a.b.c.d/nn`. A bare address is accepted as a `/32`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(InvalidSubnetError::Empty);
        }

        let (ip_str, prefix_str) = s.split_once('/').unwrap_or((s, "32"));

        let network_addr = ip_str
            .parse::<Ipv4Addr>()
            .map_err(|_| InvalidSubnetError::Address(ip_str.to_string()))?;

        let prefix = parse_prefix(prefix_str)?;

        Subnet::new(network_addr, prefix)
    }
}

/// Accepts only plain decimal digits, so `+24`, ` 24` and `24x` are rejected.
fn parse_prefix(prefix_str: &str) -> Result<u8, InvalidSubnetError> {
    let invalid = || InvalidSubnetError::Prefix(prefix_str.to_string());

    if prefix_str.is_empty() || prefix_str.len() > 2 {
        return Err(invalid());
    }
    if !prefix_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }

    let prefix: u8 = prefix_str.parse().map_err(|_| invalid())?;
    if prefix > MAX_PREFIX {
        return Err(invalid());
    }
    Ok(prefix)
}

/// The ordered host addresses of a subnet.
///
/// Backed by an address range rather than a materialized list, so large
/// subnets cost nothing until they are iterated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressSet {
    range: Ipv4Range,
}

impl AddressSet {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        self.range.to_iter()
    }

    pub fn get(&self, index: usize) -> Option<Ipv4Addr> {
        self.range.nth(index)
    }

    pub fn index_of(&self, addr: Ipv4Addr) -> Option<usize> {
        self.range.offset_of(addr)
    }

    pub fn first(&self) -> Option<Ipv4Addr> {
        self.get(0)
    }

    pub fn last(&self) -> Option<Ipv4Addr> {
        self.len().checked_sub(1).and_then(|idx| self.get(idx))
    }
}

impl From<Ipv4Range> for AddressSet {
    fn from(range: Ipv4Range) -> Self {
        Self { range }
    }
}

impl IntoIterator for &AddressSet {
    type Item = Ipv4Addr;
    type IntoIter = Box<dyn Iterator<Item = Ipv4Addr>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

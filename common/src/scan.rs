//! Sweep results.
//!
//! A [`SubnetScanResult`] is the complete outcome of one subnet: one boolean per
//! address of its [`AddressSet`], in address order. A [`ScanSession`] groups
//! the results of one run together with what happened when each was persisted.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use crate::error::PersistError;
use crate::network::subnet::{AddressSet, Subnet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubnetScanResult {
    subnet: Subnet,
    addresses: AddressSet,
    outcomes: Vec<bool>,
}

impl SubnetScanResult {
    /// # Panics
    ///
    /// Panics if `outcomes` does not hold exactly one entry per address.
    pub fn new(subnet: Subnet, addresses: AddressSet, outcomes: Vec<bool>) -> Self {
        assert_eq!(
            addresses.len(),
            outcomes.len(),
            "every address of {subnet} needs exactly one outcome"
        );
        Self {
            subnet,
            addresses,
            outcomes,
        }
    }

    pub fn subnet(&self) -> Subnet {
        self.subnet
    }

    pub fn addresses(&self) -> &AddressSet {
        &self.addresses
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Address/outcome pairs in ascending address order.
    pub fn iter(&self) -> impl Iterator<Item = (Ipv4Addr, bool)> + '_ {
        self.addresses.iter().zip(self.outcomes.iter().copied())
    }

    pub fn is_reachable(&self, addr: Ipv4Addr) -> Option<bool> {
        self.addresses
            .index_of(addr)
            .and_then(|idx| self.outcomes.get(idx).copied())
    }

    pub fn reachable_count(&self) -> usize {
        self.outcomes.iter().filter(|up| **up).count()
    }

    pub fn reachable_hosts(&self) -> Vec<Ipv4Addr> {
        self.iter().filter(|(_, up)| *up).map(|(ip, _)| ip).collect()
    }
}

#[derive(Debug)]
pub struct PersistRecord {
    pub subnet: Subnet,
    pub outcome: Result<PathBuf, PersistError>,
}

/// Everything one invocation produced. Lives only for the duration of the run.
#[derive(Debug, Default)]
pub struct ScanSession {
    pub results: Vec<SubnetScanResult>,
    pub persisted: Vec<PersistRecord>,
    /// Set when a stop request prevented some subnets from being scanned.
    pub interrupted: bool,
}

impl ScanSession {
    pub fn total_addresses(&self) -> usize {
        self.results.iter().map(SubnetScanResult::len).sum()
    }

    pub fn total_reachable(&self) -> usize {
        self.results.iter().map(SubnetScanResult::reachable_count).sum()
    }

    pub fn written(&self) -> impl Iterator<Item = &PathBuf> {
        self.persisted.iter().filter_map(|r| r.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = &PersistRecord> {
        self.persisted.iter().filter(|r| r.outcome.is_err())
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

#[cfg(test)]
mod tests {
    use super::*;

    fn result(cidr: &str, outcomes: Vec<bool>) -> SubnetScanResult {
        let subnet: Subnet = cidr.parse().unwrap();
        SubnetScanResult::new(subnet, subnet.hosts(), outcomes)
    }

    #[test]
    fn pairs_outcomes_with_addresses_in_order() {
        let res = result("192.168.1.0/30", vec![true, false]);
        assert_eq!(
            res.iter().collect::<Vec<_>>(),
            vec![
                (Ipv4Addr::new(192, 168, 1, 1), true),
                (Ipv4Addr::new(192, 168, 1, 2), false)
            ]
        );
        assert_eq!(res.reachable_count(), 1);
        assert_eq!(res.is_reachable(Ipv4Addr::new(192, 168, 1, 2)), Some(false));
        assert_eq!(res.is_reachable(Ipv4Addr::new(192, 168, 1, 3)), None);
    }

    #[test]
    #[should_panic(expected = "exactly one outcome")]
    fn missing_outcomes_are_rejected() {
        result("192.168.1.0/30", vec![true]);
    }

    #[test]
    fn session_totals_span_all_subnets() {
        let session = ScanSession {
            results: vec![
                result("10.0.0.0/30", vec![true, true]),
                result("10.0.1.0/29", vec![false, true, false, false, false, false]),
            ],
            ..Default::default()
        };
        assert_eq!(session.total_addresses(), 8);
        assert_eq!(session.total_reachable(), 3);
        assert_eq!(session.failures().count(), 0);
    }
}

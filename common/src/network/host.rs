use std::collections::BTreeSet;
use std::fmt;
use std::net::Ipv4Addr;

use pnet::util::MacAddr;

use crate::error::SweepError;

/// A host that answered an ARP request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArpHost {
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
}

impl ArpHost {
    pub fn new(ip: Ipv4Addr, mac: MacAddr) -> Self {
        Self { ip, mac }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiscoveryMethod {
    Arp,
    Tcp,
}

impl fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryMethod::Arp => f.write_str("ARP"),
            DiscoveryMethod::Tcp => f.write_str("TCP"),
        }
    }
}

/// Merged view of a live host, tagged with how it was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredHost {
    pub ip: Ipv4Addr,
    pub mac: Option<MacAddr>,
    pub method: DiscoveryMethod,
}

/// Outcome of one discovery phase.
///
/// `found` holds whatever was collected, even when the phase was cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport<T> {
    pub found: T,
    pub diagnostic: Option<SweepError>,
    pub timed_out: bool,
}

impl<T: Default> PhaseReport<T> {
    pub fn empty() -> Self {
        Self {
            found: T::default(),
            diagnostic: None,
            timed_out: false,
        }
    }
}

/// Both result sets of a full sweep, kept apart so callers can tell ARP
/// discoveries from TCP ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub arp: Vec<ArpHost>,
    pub tcp: BTreeSet<Ipv4Addr>,
    /// Set when the link-layer phase could not run properly.
    pub arp_diagnostic: Option<SweepError>,
    pub timed_out: bool,
}

impl SweepReport {
    pub fn len(&self) -> usize {
        self.arp.len() + self.tcp.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn deadline_error(&self) -> Option<SweepError> {
        self.timed_out.then_some(SweepError::DeadlineExceeded)
    }

    /// Union of both sets, ordered by address.
    pub fn hosts(&self) -> Vec<DiscoveredHost> {
        let mut hosts: Vec<DiscoveredHost> = self
            .arp
            .iter()
            .map(|h| DiscoveredHost {
                ip: h.ip,
                mac: Some(h.mac),
                method: DiscoveryMethod::Arp,
            })
            .chain(self.tcp.iter().map(|ip| DiscoveredHost {
                ip: *ip,
                mac: None,
                method: DiscoveryMethod::Tcp,
            }))
            .collect();
        hosts.sort_by_key(|h| (h.ip, h.method));
        hosts.dedup_by_key(|h| h.ip);
        hosts
    }
}

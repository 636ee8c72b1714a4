//! # Address Block
//!
//! A network-aligned IPv4 block and the enumeration of its usable hosts.
//!
//! Enumeration is pure 32-bit arithmetic: the network and broadcast addresses
//! are excluded, and blocks of two addresses or fewer (`/31`, `/32`) have no
//! usable host range at all.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::SweepError;
use crate::network::range::Ipv4Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressBlock {
    net: Ipv4Network,
}

impl AddressBlock {
    /// Builds a block, masking `base` down to its network address.
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self, SweepError> {
        let raw = Ipv4Network::new(base, prefix)
            .map_err(|e| SweepError::invalid_block(format!("{base}/{prefix}"), e))?;
        let net = Ipv4Network::new(raw.network(), prefix)
            .map_err(|e| SweepError::invalid_block(format!("{base}/{prefix}"), e))?;
        Ok(Self { net })
    }

    pub fn network(&self) -> Ipv4Addr {
        self.net.network()
    }

    pub fn broadcast(&self) -> Ipv4Addr {
        self.net.broadcast()
    }

    pub fn prefix(&self) -> u8 {
        self.net.prefix()
    }

    /// Number of addresses in the block, endpoints included.
    pub fn size(&self) -> u64 {
        1u64 << (32 - u32::from(self.prefix()))
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        self.net.contains(addr)
    }

    pub fn as_ipv4_network(&self) -> Ipv4Network {
        self.net
    }

    /// Addresses strictly between network and broadcast, if there are any.
    pub fn usable_range(&self) -> Option<Ipv4Range> {
        if self.size() <= 2 {
            return None;
        }
        let start = u32::from(self.network()) + 1;
        let end = u32::from(self.broadcast()) - 1;
        Some(Ipv4Range::new(Ipv4Addr::from(start), Ipv4Addr::from(end)))
    }

    /// Usable host addresses in ascending order, produced on demand.
    ///
    /// Nothing is allocated up front, so even a `/0` costs only what the
    /// caller actually consumes.
    pub fn candidates(&self) -> impl Iterator<Item = Ipv4Addr> + use<> {
        self.usable_range()
            .into_iter()
            .flat_map(|range| range.to_iter())
    }

    /// Collected form of [`AddressBlock::candidates`].
    pub fn hosts(&self) -> Vec<Ipv4Addr> {
        self.candidates().collect()
    }
}

impl FromStr for AddressBlock {
    type Err = SweepError;

    /// Accepts `"a.b.c.d/n"`; a bare address is taken as `/32`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (ip_str, prefix_str) = s.split_once('/').unwrap_or((s, "32"));

        let base = ip_str
            .trim()
            .parse::<Ipv4Addr>()
            .map_err(|e| SweepError::invalid_block(s, format!("bad address '{ip_str}': {e}")))?;

        let prefix = prefix_str
            .trim()
            .parse::<u8>()
            .map_err(|e| SweepError::invalid_block(s, format!("bad prefix '{prefix_str}': {e}")))?;

        if prefix > 32 {
            return Err(SweepError::invalid_block(s, format!("prefix {prefix} exceeds 32")));
        }

        Self::new(base, prefix)
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network(), self.prefix())
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

//! # Host Discovery Service
//!
//! Implements the "sweep an address block" use case.
//!
//! The service owns no sockets. It runs the ARP sweep first, hands every
//! address it confirmed to the TCP sweep as a skip-set, and returns both
//! result sets side by side so callers can tell how each host was found.

use std::collections::HashSet;
use std::net::Ipv4Addr;
use std::sync::Arc;

use tracing::{info, warn};

use hostsweep_common::config::Config;
use hostsweep_common::error::SweepError;
use hostsweep_common::network::block::AddressBlock;
use hostsweep_common::network::host::SweepReport;
use hostsweep_common::success;

use crate::deadline::Deadline;
use crate::scanner::{AddressResolver, Connector, arp_sweep, tcp_sweep};

/// Application Service for host discovery.
///
/// Orchestrates a sweep by:
/// 1. resolving every candidate through the [`AddressResolver`].
/// 2. connect-probing what is left through the [`Connector`].
pub struct DiscoveryService {
    resolver: Arc<dyn AddressResolver>,
    connector: Arc<dyn Connector>,
}

impl DiscoveryService {
    pub fn new(resolver: Arc<dyn AddressResolver>, connector: Arc<dyn Connector>) -> Self {
        Self {
            resolver,
            connector,
        }
    }

    /// Sweeps the usable addresses of `block` under `deadline`.
    ///
    /// Fails only when `cfg` cannot drive a sweep. A link-layer failure or
    /// an expired deadline still yields `Ok` with whatever was found.
    pub async fn perform_discovery(
        &self,
        block: &AddressBlock,
        cfg: &Config,
        deadline: &Deadline,
    ) -> Result<SweepReport, SweepError> {
        cfg.validate()?;

        let count = block.usable_range().map_or(0, |range| range.len());
        info!("{count} candidate addresses in {block}");

        // 1. Link layer
        let arp = arp_sweep(
            block.candidates(),
            self.resolver.clone(),
            cfg.workers,
            deadline,
        )
        .await;
        if let Some(diag) = &arp.diagnostic {
            warn!("{diag}, continuing with TCP only");
        }
        if !arp.found.is_empty() {
            success!("ARP confirmed {} hosts", arp.found.len());
        }

        // 2. Transport layer, minus everything ARP already proved
        let skip: HashSet<Ipv4Addr> = arp.found.iter().map(|host| host.ip).collect();
        let tcp = tcp_sweep(
            block.candidates(),
            &skip,
            &cfg.ports,
            self.connector.clone(),
            cfg.workers,
            cfg.connect_timeout,
            deadline,
        )
        .await;
        if !tcp.found.is_empty() {
            success!("TCP confirmed {} more hosts", tcp.found.len());
        }

        let report = SweepReport {
            arp: arp.found,
            tcp: tcp.found,
            arp_diagnostic: arp.diagnostic,
            timed_out: arp.timed_out || tcp.timed_out,
        };

        if report.timed_out {
            warn!("deadline reached, returning partial results");
        }
        info!("sweep of {block} found {} hosts", report.len());

        Ok(report)
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

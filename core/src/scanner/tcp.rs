use std::collections::{BTreeSet, HashSet};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, trace};

use hostsweep_common::error::Verdict;
use hostsweep_common::network::host::PhaseReport;
use hostsweep_common::phase;

use crate::deadline::Deadline;
use crate::network::classify::classify;
use crate::scanner::Connector;
use crate::scanner::pool;

/// Tries a TCP connect to every candidate not in `skip` on every port.
///
/// Each (address, port) pair is its own task competing for the same tickets,
/// produced lazily from `candidates`. A completed handshake or an active
/// refusal marks the address alive; the result holds each address at most
/// once however many ports confirmed it.
pub async fn tcp_sweep<I>(
    candidates: I,
    skip: &HashSet<Ipv4Addr>,
    ports: &[u16],
    connector: Arc<dyn Connector>,
    workers: usize,
    connect_timeout: Duration,
    deadline: &Deadline,
) -> PhaseReport<BTreeSet<Ipv4Addr>>
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    if ports.is_empty() {
        return PhaseReport::empty();
    }

    let jobs = candidates
        .into_iter()
        .filter(|ip| !skip.contains(ip))
        .flat_map(|ip| ports.iter().map(move |port| SocketAddrV4::new(ip, *port)));

    let knock_on = move |addr: SocketAddrV4| {
        let connector = connector.clone();
        async move { knock(addr, connector.as_ref(), connect_timeout).await }
    };

    phase!("Knocking on {} ports per address", ports.len());
    let fanout = pool::fan_out(jobs, workers, deadline, knock_on).await;
    let cut_short = fanout.cut_short();
    let alive: BTreeSet<Ipv4Addr> = fanout.results.into_iter().collect();

    debug!(
        "TCP sweep done: {} hosts, {} abandoned",
        alive.len(),
        fanout.abandoned
    );

    PhaseReport {
        found: alive,
        diagnostic: None,
        timed_out: cut_short && deadline.timed_out(),
    }
}

/// `Some(ip)` when the port proves the host is there.
async fn knock(addr: SocketAddrV4, connector: &dyn Connector, limit: Duration) -> Option<Ipv4Addr> {
    match connector.connect(addr, limit).await {
        Ok(()) => {
            debug!("{addr} accepted");
            Some(*addr.ip())
        }
        Err(e) => match classify(&e) {
            Verdict::ActiveRefusal => {
                debug!("{addr} refused");
                Some(*addr.ip())
            }
            Verdict::NoEvidence | Verdict::PermissionDenied => {
                trace!("{addr}: {e}");
                None
            }
        },
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

use std::net::Ipv4Addr;
use std::sync::{Arc, OnceLock};

use tracing::{debug, trace};

use hostsweep_common::error::{SweepError, Verdict};
use hostsweep_common::network::host::{ArpHost, PhaseReport};
use hostsweep_common::phase;

use crate::deadline::Deadline;
use crate::network::classify::classify;
use crate::scanner::AddressResolver;
use crate::scanner::pool;

/// ARP-resolves every candidate with at most `workers` requests in flight.
///
/// Candidates are pulled lazily, so the source may be as large as a `/0`.
/// A missing privilege or unusable resolver does not abort the phase: it is
/// reported once in [`PhaseReport::diagnostic`] and no further candidate is
/// pulled.
pub async fn arp_sweep<I>(
    candidates: I,
    resolver: Arc<dyn AddressResolver>,
    workers: usize,
    deadline: &Deadline,
) -> PhaseReport<Vec<ArpHost>>
where
    I: IntoIterator<Item = Ipv4Addr>,
{
    let unavailable: Arc<OnceLock<String>> = Arc::new(OnceLock::new());

    let jobs = {
        let unavailable = unavailable.clone();
        candidates
            .into_iter()
            .take_while(move |_| unavailable.get().is_none())
    };

    let resolve = {
        let unavailable = unavailable.clone();
        move |ip: Ipv4Addr| {
            let resolver = resolver.clone();
            let unavailable = unavailable.clone();
            async move { resolve_one(ip, resolver.as_ref(), &unavailable).await }
        }
    };

    phase!("Resolving addresses over ARP");
    let fanout = pool::fan_out(jobs, workers, deadline, resolve).await;

    let cut_short = fanout.cut_short();
    let mut hosts: Vec<ArpHost> = fanout.results;
    hosts.sort_by_key(|host| host.ip);

    let timed_out = cut_short && deadline.timed_out();
    let diagnostic = unavailable
        .get()
        .map(|reason| SweepError::LinkLayerUnavailable(reason.clone()));

    debug!(
        "ARP sweep done: {} hosts, {} abandoned",
        hosts.len(),
        fanout.abandoned
    );

    PhaseReport {
        found: hosts,
        diagnostic,
        timed_out,
    }
}

async fn resolve_one(
    ip: Ipv4Addr,
    resolver: &dyn AddressResolver,
    unavailable: &OnceLock<String>,
) -> Option<ArpHost> {
    if unavailable.get().is_some() {
        return None;
    }

    match resolver.resolve(ip).await {
        Ok(mac) => {
            debug!("{ip} is at {mac}");
            Some(ArpHost::new(ip, mac))
        }
        Err(e) => {
            if classify(&e) == Verdict::PermissionDenied {
                let _ = unavailable.set(e.to_string());
            } else {
                trace!("no ARP answer from {ip}: {e}");
            }
            None
        }
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

use crate::terminal::colors;
use colored::*;
use hostsweep_common::network::host::{DiscoveredHost, DiscoveryMethod};

pub type Detail = (String, ColoredString);

pub fn method_to_colored(method: DiscoveryMethod) -> ColoredString {
    let label = method.to_string();
    match method {
        DiscoveryMethod::Arp => label.color(colors::METHOD_ARP),
        DiscoveryMethod::Tcp => label.color(colors::METHOD_TCP),
    }
}

/// Detail rows under a host's address: the MAC when ARP saw it, then the
/// method that found it.
pub fn host_to_details(host: &DiscoveredHost) -> Vec<Detail> {
    let mut details: Vec<Detail> = Vec::with_capacity(2);

    if let Some(mac) = host.mac {
        details.push(("MAC".to_string(), mac.to_string().color(colors::MAC_ADDR)));
    }

    details.push(("Via".to_string(), method_to_colored(host.method)));
    details
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

use std::net::Ipv4Addr;

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

use crate::network::block::AddressBlock;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    /// The interface is operationally down.
    IsDown,
    /// Loopback cannot carry ARP traffic.
    IsLoopback,
    /// The interface does not have a MAC address.
    NoMacAddress,
    /// The interface does not support broadcast (required for ARP).
    NotBroadcast,
    /// The interface is a point-to-point link (e.g., a VPN).
    IsPointToPoint,
}

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    /// First IPv4 network on this interface that shares addresses with `block`.
    fn get_ipv4_net_for(&self, block: &AddressBlock) -> Option<Ipv4Network>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(*ipv4)
                } else {
                    None
                }
            })
            .collect()
    }

    fn get_ipv4_net_for(&self, block: &AddressBlock) -> Option<Ipv4Network> {
        self.get_ipv4_nets()
            .into_iter()
            .find(|net| net.contains(block.network()) || block.contains(net.ip()))
    }
}

/// Checks whether ARP frames can be sent and received on `interface`.
pub fn is_viable_lan_interface(interface: &NetworkInterface) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    Ok(())
}

/// Picks the interface to ARP from for `block`, together with its own
/// address on that segment.
pub fn select_for_block(
    block: &AddressBlock,
    interfaces: &[NetworkInterface],
) -> Option<(NetworkInterface, Ipv4Addr)> {
    interfaces
        .iter()
        .filter(|interface| is_viable_lan_interface(interface).is_ok())
        .find_map(|interface| {
            interface
                .get_ipv4_net_for(block)
                .map(|net| (interface.clone(), net.ip()))
        })
}

/// Same as [`select_for_block`] over the interfaces of this machine.
pub fn find_for_block(block: &AddressBlock) -> Option<(NetworkInterface, Ipv4Addr)> {
    let interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces();
    select_for_block(block, &interfaces)
}

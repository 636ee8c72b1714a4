use pnet::datalink::{MacAddr, NetworkInterface};
use std::net::Ipv4Addr;

use hostsweep_common::network::interface::{self, ViabilityError};
use super::util::{block, ni, v4, v6};

/*************************************************************
                 Tests for block-based selection
**************************************************************/

#[test]
fn block_selects_enp9s0() {
    let interfaces: Vec<NetworkInterface> = iface_all();
    let (intf, src) = interface::select_for_block(&block("192.168.0.0/24"), &interfaces).unwrap();
    assert_eq!(intf, enp9s0());
    assert_eq!(src, Ipv4Addr::new(192, 168, 0, 32));
}

#[test]
fn block_selects_wlan0() {
    let interfaces: Vec<NetworkInterface> = iface_all();
    let (intf, src) = interface::select_for_block(&block("192.168.1.0/24"), &interfaces).unwrap();
    assert_eq!(intf, wlan0());
    assert_eq!(src, Ipv4Addr::new(192, 168, 1, 42));
}

#[test]
fn narrower_block_inside_interface_net() {
    let interfaces: Vec<NetworkInterface> = iface_all();
    let (intf, _) = interface::select_for_block(&block("172.17.5.0/24"), &interfaces).unwrap();
    assert_eq!(intf, docker0());
}

#[test]
fn wider_block_skips_point_to_point() {
    // tun0 (10.96.0.57) sits in the block too, but cannot carry ARP.
    let interfaces: Vec<NetworkInterface> = iface_all();
    let (intf, src) = interface::select_for_block(&block("10.0.0.0/8"), &interfaces).unwrap();
    assert_eq!(intf, eth1());
    assert_eq!(src, Ipv4Addr::new(10, 0, 0, 15));
}

#[test]
fn vpn_only_block_selects_nothing() {
    let interfaces: Vec<NetworkInterface> = iface_all();
    let selected = interface::select_for_block(&block("10.96.0.0/16"), &interfaces);
    assert!(selected.is_none(), "Expected no interface, received: {selected:?}");
}

#[test]
fn loopback_block_selects_nothing() {
    let interfaces: Vec<NetworkInterface> = iface_all();
    assert!(interface::select_for_block(&block("127.0.0.0/8"), &interfaces).is_none());
}

#[test]
fn foreign_block_selects_nothing() {
    let interfaces: Vec<NetworkInterface> = vec![lo(), ipv6leakintrf0(), veth1234(), eth1()];
    assert!(interface::select_for_block(&block("8.8.8.0/24"), &interfaces).is_none());
}

/*************************************************************
                     Tests for viability
**************************************************************/

#[test]
fn viability_reasons() {
    assert_eq!(interface::is_viable_lan_interface(&enp9s0()), Ok(()));
    assert_eq!(interface::is_viable_lan_interface(&lo()), Err(ViabilityError::IsLoopback));
    assert_eq!(interface::is_viable_lan_interface(&tun0()), Err(ViabilityError::NoMacAddress));

    let mut down = eth1();
    down.flags = 0;
    assert_eq!(interface::is_viable_lan_interface(&down), Err(ViabilityError::IsDown));

    let mut ptp = tun0();
    ptp.mac = Some(MacAddr::new(0x02, 0, 0, 0, 0, 1));
    assert_eq!(interface::is_viable_lan_interface(&ptp), Err(ViabilityError::NotBroadcast));
}

/*************************************************************
                  Mock interfaces for testing
**************************************************************/

fn iface_all() -> Vec<NetworkInterface> {
    vec![lo(),
         enp9s0(),
         tun0(),
         ipv6leakintrf0(),
         wlan0(),
         eth1(),
         docker0(),
         veth1234(),
         br0()
    ]
}

fn lo() -> NetworkInterface {
    ni(
        "lo",
        1,
        Some(MacAddr::new(0, 0, 0, 0, 0, 0)),
        &[v4(127, 0, 0, 1, 8), v6("::1", 128)],
        65609,
    )
}

fn enp9s0() -> NetworkInterface {
    ni(
        "enp9s0",
        2,
        Some(MacAddr::new(0xa8, 0xa1, 0x59, 0x13, 0x41, 0x46)),
        &[
            v4(192, 168, 0, 32, 24),
            v6("2a02:908:8c1:b880::b054", 128),
            v6("fe80::b3dd:5c39:7c29:48b6", 64),
        ],
        69699,
    )
}

fn tun0() -> NetworkInterface {
    ni(
        "tun0",
        5,
        None,
        &[v4(10, 96, 0, 57, 16), v6("fe80::c137:8964:5a63:efde", 64)],
        69841,
    )
}

fn ipv6leakintrf0() -> NetworkInterface {
    ni(
        "ipv6leakintrf0",
        6,
        Some(MacAddr::new(0xd2, 0x25, 0xd4, 0x9f, 0x18, 0xfd)),
        &[v6("fdeb:446c:912d:8da::", 64), v6("fe80::7f87:ff4a:9ad8:d2f0", 64)],
        65731,
    )
}

fn wlan0() -> NetworkInterface {
    ni(
        "wlan0",
        3,
        Some(MacAddr::new(0x34, 0xcf, 0xf6, 0x9a, 0x11, 0x22)),
        &[v4(192, 168, 1, 42, 24), v6("fe80::36cf:f6ff:fe9a:1122", 64)],
        69699,
    )
}

fn eth1() -> NetworkInterface {
    ni(
        "eth1",
        4,
        Some(MacAddr::new(0x52, 0x54, 0x00, 0x12, 0x34, 0x56)),
        &[v4(10, 0, 0, 15, 24)],
        69699,
    )
}

fn docker0() -> NetworkInterface {
    ni(
        "docker0",
        7,
        Some(MacAddr::new(0x02, 0x42, 0xac, 0x11, 0x00, 0x01)),
        &[v4(172, 17, 0, 1, 16)],
        69699,
    )
}

fn veth1234() -> NetworkInterface {
    ni(
        "veth1234",
        8,
        Some(MacAddr::new(0x1a, 0x2b, 0x3c, 0x4d, 0x5e, 0x6f)),
        &[v6("fe80::1a2b:3cff:fe4d:5e6f", 64)],
        69699,
    )
}

fn br0() -> NetworkInterface {
    ni(
        "br0",
        9,
        Some(MacAddr::new(0xde, 0xad, 0xbe, 0xef, 0x00, 0x01)),
        &[v4(192, 168, 100, 1, 24), v6("fd00:dead:beef::1", 64)],
        69699,
    )
}

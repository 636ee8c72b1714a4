use std::collections::HashSet;
use std::io::{self, ErrorKind};
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pnet::util::MacAddr;
use tokio::net::TcpListener;
use tokio::time::Instant;

use hostsweep_common::config::Config;
use hostsweep_common::error::SweepError;
use hostsweep_common::network::block::AddressBlock;
use hostsweep_common::network::host::DiscoveryMethod;
use hostsweep_core::Deadline;
use hostsweep_core::discovery::DiscoveryService;
use hostsweep_core::network::arp::UnavailableResolver;
use hostsweep_core::network::tcp::TcpConnector;
use hostsweep_core::scanner::{AddressResolver, Connector};

struct SilentResolver;

#[async_trait]
impl AddressResolver for SilentResolver {
    async fn resolve(&self, addr: Ipv4Addr) -> io::Result<MacAddr> {
        Err(io::Error::new(ErrorKind::TimedOut, format!("no reply from {addr}")))
    }
}

/// Resolves one address, times out for the rest.
struct OneHostResolver(Ipv4Addr, MacAddr);

#[async_trait]
impl AddressResolver for OneHostResolver {
    async fn resolve(&self, addr: Ipv4Addr) -> io::Result<MacAddr> {
        if addr == self.0 {
            Ok(self.1)
        } else {
            Err(io::Error::from(ErrorKind::TimedOut))
        }
    }
}

/// Sends every attempt to a fixed loopback port, whatever the address.
struct LoopbackConnector {
    port: u16,
    calls: AtomicUsize,
}

#[async_trait]
impl Connector for LoopbackConnector {
    async fn connect(&self, _addr: SocketAddrV4, timeout: Duration) -> io::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        TcpConnector
            .connect(SocketAddrV4::new(Ipv4Addr::LOCALHOST, self.port), timeout)
            .await
    }
}

struct StalledResolver;

#[async_trait]
impl AddressResolver for StalledResolver {
    async fn resolve(&self, _addr: Ipv4Addr) -> io::Result<MacAddr> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(io::Error::from(ErrorKind::TimedOut))
    }
}

/// Refuses at once for addresses ending in .1 to .3, hangs for the rest.
struct FewFastConnector;

#[async_trait]
impl Connector for FewFastConnector {
    async fn connect(&self, addr: SocketAddrV4, _timeout: Duration) -> io::Result<()> {
        if addr.ip().octets()[3] <= 3 {
            return Err(io::Error::from(ErrorKind::ConnectionRefused));
        }
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(io::Error::from(ErrorKind::TimedOut))
    }
}

struct NeverConnector;

#[async_trait]
impl Connector for NeverConnector {
    async fn connect(&self, _addr: SocketAddrV4, _timeout: Duration) -> io::Result<()> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(io::Error::from(ErrorKind::TimedOut))
    }
}

fn cfg(ports: &[u16], workers: usize) -> Config {
    Config {
        ports: ports.to_vec(),
        workers,
        ..Config::default()
    }
}

/// A single loopback address with a listening port is found over TCP.
#[tokio::test]
async fn discovery_single_loopback() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let block: AddressBlock = "127.0.0.0/30".parse().unwrap();
    let service = DiscoveryService::new(Arc::new(SilentResolver), Arc::new(TcpConnector));
    let deadline = Deadline::after(Duration::from_secs(10));

    let report = service
        .perform_discovery(&block, &cfg(&[port], 4), &deadline)
        .await
        .unwrap();

    assert!(report.arp.is_empty());
    assert!(report.tcp.contains(&Ipv4Addr::LOCALHOST), "{report:?}");
    assert!(!report.timed_out);
}

/// A closed loopback port still proves the address is alive.
#[tokio::test]
async fn discovery_refused_loopback() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let block: AddressBlock = "127.0.0.1".parse().unwrap();
    let service = DiscoveryService::new(Arc::new(SilentResolver), Arc::new(TcpConnector));
    let deadline = Deadline::after(Duration::from_secs(10));

    let report = service
        .perform_discovery(&block, &cfg(&[port], 4), &deadline)
        .await
        .unwrap();

    // A /32 has no usable range, so nothing is contacted at all.
    assert!(report.is_empty());

    let block: AddressBlock = "127.0.0.0/29".parse().unwrap();
    let report = service
        .perform_discovery(&block, &cfg(&[port], 4), &deadline)
        .await
        .unwrap();
    assert!(report.tcp.contains(&Ipv4Addr::LOCALHOST));
}

/// ARP-confirmed hosts are neither connect-tried nor listed twice.
#[tokio::test]
async fn arp_results_short_circuit_tcp() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let arp_ip = Ipv4Addr::new(192, 168, 7, 5);
    let mac = MacAddr::new(0x02, 0x00, 0x5e, 0x00, 0x00, 0x05);
    let connector = Arc::new(LoopbackConnector {
        port,
        calls: AtomicUsize::new(0),
    });
    let service = DiscoveryService::new(Arc::new(OneHostResolver(arp_ip, mac)), connector.clone());
    let deadline = Deadline::after(Duration::from_secs(10));

    let block: AddressBlock = "192.168.7.0/29".parse().unwrap();
    let report = service
        .perform_discovery(&block, &cfg(&[22, 80], 3), &deadline)
        .await
        .unwrap();

    // 6 usable addresses, one confirmed by ARP, two ports each.
    assert_eq!(connector.calls.load(Ordering::SeqCst), 10);
    assert_eq!(report.arp.len(), 1);
    assert_eq!(report.tcp.len(), 5);
    assert!(!report.tcp.contains(&arp_ip));

    let hosts = report.hosts();
    assert_eq!(hosts.len(), 6);
    let arp_host = hosts.iter().find(|h| h.ip == arp_ip).unwrap();
    assert_eq!(arp_host.method, DiscoveryMethod::Arp);
    assert_eq!(arp_host.mac, Some(mac));
    let unique: HashSet<Ipv4Addr> = hosts.iter().map(|h| h.ip).collect();
    assert_eq!(unique.len(), hosts.len());
}

/// No privilege for raw frames: diagnostic, then TCP anyway.
#[tokio::test]
async fn unavailable_link_layer_degrades() {
    let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let denied = io::Error::new(ErrorKind::PermissionDenied, "Operation not permitted");
    let service = DiscoveryService::new(
        Arc::new(UnavailableResolver::new(&denied)),
        Arc::new(TcpConnector),
    );
    let deadline = Deadline::after(Duration::from_secs(10));

    let block: AddressBlock = "127.0.0.0/30".parse().unwrap();
    let report = service
        .perform_discovery(&block, &cfg(&[port], 4), &deadline)
        .await
        .unwrap();

    assert_eq!(
        report.arp_diagnostic,
        Some(SweepError::LinkLayerUnavailable("Operation not permitted".into()))
    );
    assert!(report.tcp.contains(&Ipv4Addr::LOCALHOST));
}

/// Large block, hung connects, tight budget: returns close to the budget.
#[tokio::test]
async fn deadline_bounds_a_large_sweep() {
    let service = DiscoveryService::new(Arc::new(SilentResolver), Arc::new(NeverConnector));
    let deadline = Deadline::after(Duration::from_millis(500));
    let started = Instant::now();

    let block: AddressBlock = "10.20.0.0/16".parse().unwrap();
    let report = service
        .perform_discovery(&block, &cfg(&[80], 10), &deadline)
        .await
        .unwrap();

    assert!(
        started.elapsed() < Duration::from_secs(5),
        "took {:?}",
        started.elapsed()
    );
    assert!(report.is_empty());
    assert!(report.timed_out);
    assert_eq!(report.deadline_error(), Some(SweepError::DeadlineExceeded));
}

/// A block far too large to finish: nothing hangs past the budget and
/// nothing is enumerated up front.
#[tokio::test]
async fn deadline_bounds_a_huge_block() {
    let service = DiscoveryService::new(Arc::new(StalledResolver), Arc::new(NeverConnector));

    for cidr in ["10.0.0.0/12", "0.0.0.0/0"] {
        let deadline = Deadline::after(Duration::from_millis(300));
        let started = Instant::now();

        let block: AddressBlock = cidr.parse().unwrap();
        let report = service
            .perform_discovery(&block, &cfg(&[22, 80, 443], 256), &deadline)
            .await
            .unwrap();

        assert!(
            started.elapsed() < Duration::from_secs(1),
            "{cidr} took {:?}",
            started.elapsed()
        );
        assert!(report.is_empty());
        assert!(report.timed_out, "{cidr}");
    }
}

/// Ctrl-C style cancellation keeps what was already found and is not a
/// timeout.
#[tokio::test]
async fn manual_cancel_keeps_results() {
    let service = DiscoveryService::new(Arc::new(SilentResolver), Arc::new(FewFastConnector));
    let deadline = Deadline::after(Duration::from_secs(60));
    let canceller = deadline.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let block: AddressBlock = "10.30.0.0/24".parse().unwrap();
    let report = service
        .perform_discovery(&block, &cfg(&[80], 16), &deadline)
        .await
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(deadline.is_cancelled());
    assert!(!report.timed_out);
    assert!(report.deadline_error().is_none());
    let fast: Vec<Ipv4Addr> = (1..=3).map(|d| Ipv4Addr::new(10, 30, 0, d)).collect();
    assert_eq!(report.tcp.iter().copied().collect::<Vec<_>>(), fast);
}

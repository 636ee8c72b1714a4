//! ARP resolution over a raw datalink channel.
//!
//! One channel is opened per sweep. A listener thread reads every frame,
//! picks out ARP replies and hands the sender's MAC to whichever
//! [`ArpResolver::resolve`] call is waiting on that address.
//!
//! Opening the channel needs raw-socket privileges. Without them callers get
//! an [`UnavailableResolver`] instead, so the sweep degrades instead of failing.

use std::collections::HashMap;
use std::io::{self, ErrorKind};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use pnet::datalink::{self, Channel, Config, DataLinkReceiver, DataLinkSender, NetworkInterface};
use pnet::util::MacAddr;
use tokio::sync::oneshot;
use tracing::{debug, trace};

use hostsweep_common::network::{block::AddressBlock, interface};
use hostsweep_protocols::arp;

use crate::network::classify::classify;
use crate::scanner::AddressResolver;
use hostsweep_common::error::Verdict;

const READ_TIMEOUT: Duration = Duration::from_millis(50);

type Waiters = Arc<Mutex<HashMap<Ipv4Addr, oneshot::Sender<MacAddr>>>>;
type Sender = Arc<Mutex<Box<dyn DataLinkSender>>>;

pub struct ArpResolver {
    src_mac: MacAddr,
    src_ip: Ipv4Addr,
    tx: Sender,
    waiters: Waiters,
    reply_timeout: Duration,
    running: Arc<AtomicBool>,
}

impl ArpResolver {
    /// Opens a channel on the local interface attached to `block`.
    pub fn open(block: &AddressBlock, reply_timeout: Duration) -> io::Result<Self> {
        let (intf, src_ip) = interface::find_for_block(block).ok_or_else(|| {
            io::Error::new(
                ErrorKind::Unsupported,
                format!("no local interface is attached to {block}"),
            )
        })?;
        let src_mac = intf.mac.ok_or_else(|| {
            io::Error::new(ErrorKind::Unsupported, format!("{} has no MAC address", intf.name))
        })?;

        let (tx, rx) = open_eth_channel(&intf, &channel_config(), datalink::channel)?;
        debug!("ARP channel open on {} as {src_ip} ({src_mac})", intf.name);

        Ok(Self::from_channel(tx, rx, src_mac, src_ip, reply_timeout))
    }

    pub fn from_channel(
        tx: Box<dyn DataLinkSender>,
        rx: Box<dyn DataLinkReceiver>,
        src_mac: MacAddr,
        src_ip: Ipv4Addr,
        reply_timeout: Duration,
    ) -> Self {
        let waiters: Waiters = Arc::new(Mutex::new(HashMap::new()));
        let running = Arc::new(AtomicBool::new(true));
        spawn_listener(rx, waiters.clone(), running.clone());

        Self {
            src_mac,
            src_ip,
            tx: Arc::new(Mutex::new(tx)),
            waiters,
            reply_timeout,
            running,
        }
    }

    async fn send_request(&self, target: Ipv4Addr) -> io::Result<()> {
        let frame = arp::create_request(self.src_mac, self.src_ip, target)
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, e.to_string()))?;
        let tx = self.tx.clone();

        let sent = tokio::task::spawn_blocking(move || lock(&tx).send_to(&frame, None))
            .await
            .map_err(io::Error::other)?;

        match sent {
            Some(result) => result,
            None => Err(io::Error::other("datalink sender dropped the frame")),
        }
    }
}

#[async_trait]
impl AddressResolver for ArpResolver {
    async fn resolve(&self, addr: Ipv4Addr) -> io::Result<MacAddr> {
        let (reply_tx, reply_rx) = oneshot::channel();
        lock(&self.waiters).insert(addr, reply_tx);
        let _pending = PendingReply {
            waiters: &self.waiters,
            addr,
        };

        self.send_request(addr).await?;

        match tokio::time::timeout(self.reply_timeout, reply_rx).await {
            Ok(Ok(mac)) => Ok(mac),
            Ok(Err(_)) => Err(io::Error::new(
                ErrorKind::BrokenPipe,
                "ARP listener stopped",
            )),
            Err(_) => Err(io::Error::new(
                ErrorKind::TimedOut,
                format!("no ARP reply from {addr}"),
            )),
        }
    }
}

impl Drop for ArpResolver {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

/// Removes the waiter of an abandoned or finished request.
struct PendingReply<'a> {
    waiters: &'a Waiters,
    addr: Ipv4Addr,
}

impl Drop for PendingReply<'_> {
    fn drop(&mut self) {
        lock(self.waiters).remove(&self.addr);
    }
}

/// Stand-in used when no ARP channel could be opened. Every call fails
/// with the reason the channel could not be opened.
#[derive(Debug, Clone)]
pub struct UnavailableResolver {
    kind: ErrorKind,
    reason: String,
}

impl UnavailableResolver {
    pub fn new(cause: &io::Error) -> Self {
        let kind = match classify(cause) {
            Verdict::PermissionDenied => cause.kind(),
            _ => ErrorKind::Unsupported,
        };
        Self {
            kind,
            reason: cause.to_string(),
        }
    }
}

#[async_trait]
impl AddressResolver for UnavailableResolver {
    async fn resolve(&self, _addr: Ipv4Addr) -> io::Result<MacAddr> {
        Err(io::Error::new(self.kind, self.reason.clone()))
    }
}

/// Opens an [`ArpResolver`] for `block`, or falls back to an
/// [`UnavailableResolver`] carrying the reason it could not.
pub fn resolver_for(block: &AddressBlock, reply_timeout: Duration) -> Arc<dyn AddressResolver> {
    match ArpResolver::open(block, reply_timeout) {
        Ok(resolver) => Arc::new(resolver),
        Err(e) => {
            debug!("ARP resolver unavailable: {e}");
            Arc::new(UnavailableResolver::new(&e))
        }
    }
}

fn spawn_listener(mut rx: Box<dyn DataLinkReceiver>, waiters: Waiters, running: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        while running.load(Ordering::Relaxed) {
            let frame = match rx.next() {
                Ok(frame) => frame,
                Err(e) if is_transient(&e) => continue,
                Err(e) => {
                    debug!("ARP listener stopping: {e}");
                    break;
                }
            };

            let Ok(reply) = arp::parse_reply(frame) else {
                continue;
            };

            if let Some(waiter) = lock(&waiters).remove(&reply.sender_ip) {
                trace!("ARP reply {} is at {}", reply.sender_ip, reply.sender_mac);
                let _ = waiter.send(reply.sender_mac);
            }
        }
    });
}

fn is_transient(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &Config,
    channel_opener: F,
) -> io::Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>)>
where
    F: FnOnce(&NetworkInterface, Config) -> io::Result<Channel>,
{
    let channel = channel_opener(intf, *cfg)
        .map_err(|e| io::Error::new(e.kind(), format!("opening on {}: {e}", intf.name)))?;
    match channel {
        Channel::Ethernet(tx, rx) => Ok((tx, rx)),
        _ => Err(io::Error::new(
            ErrorKind::Unsupported,
            format!("non-ethernet channel for {}", intf.name),
        )),
    }
}

fn channel_config() -> Config {
    Config {
        read_timeout: Some(READ_TIMEOUT),
        ..Default::default()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

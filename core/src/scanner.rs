//! The two discovery engines and the seams they reach the network through.
//!
//! Engines never touch sockets themselves. They fan work out over a
//! [`pool::TicketPool`] and ask an [`AddressResolver`] or a [`Connector`]
//! to do the I/O, which keeps them testable with plain mocks.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::time::Duration;

use async_trait::async_trait;
use pnet::util::MacAddr;

pub mod arp;
pub mod pool;
pub mod tcp;

pub use arp::arp_sweep;
pub use tcp::tcp_sweep;

/// Link-layer resolution primitive: who has `addr`?
///
/// Implementations apply their own timeout. Any error means "no evidence",
/// except errors classified as permission/capability failures, which the
/// engine reports once for the whole phase.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, addr: Ipv4Addr) -> io::Result<MacAddr>;
}

/// Transport-layer connection primitive. `Ok` means a connection was
/// fully established.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, addr: SocketAddrV4, timeout: Duration) -> io::Result<()>;
}

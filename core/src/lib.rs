//! The concurrent host-discovery engine.
//!
//! Two sweeps share one [`Deadline`]: an ARP sweep over every candidate
//! address, then a TCP connect sweep over the candidates ARP did not confirm.
//! [`discovery::DiscoveryService`] composes them.

pub mod deadline;
pub mod discovery;
pub mod network;
pub mod scanner;

pub use deadline::Deadline;

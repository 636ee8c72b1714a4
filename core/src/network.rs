pub mod arp;
pub mod classify;
pub mod tcp;

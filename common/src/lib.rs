//! Shared building blocks for `hostsweep`: the data model, configuration,
//! error taxonomy and address maths used by the discovery engines and the CLI.

pub mod config;
pub mod error;
pub mod logging;
pub mod network;

#[doc(hidden)]
pub use tracing as __tracing;

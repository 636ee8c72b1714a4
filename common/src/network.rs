pub mod block;
pub mod host;
pub mod interface;
pub mod ports;
pub mod range;

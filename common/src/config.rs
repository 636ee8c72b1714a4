use std::time::Duration;

use crate::error::SweepError;

pub const DEFAULT_PORTS: &[u16] = &[22, 80, 443, 445, 3389];
pub const DEFAULT_WORKERS: usize = 256;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_millis(500);
pub const DEFAULT_RESOLVE_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TCP ports tried against every host ARP did not confirm.
    pub ports: Vec<u16>,
    /// Size of the ticket pool; caps simultaneous attempts per phase.
    pub workers: usize,
    /// Overall budget shared by both phases.
    pub timeout: Duration,
    /// Per-attempt limit for a single TCP connect.
    pub connect_timeout: Duration,
    /// Per-attempt limit for a single ARP request.
    pub resolve_timeout: Duration,
    /// 0 = full output, 1 = no headers, 2 = summary only.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ports: DEFAULT_PORTS.to_vec(),
            workers: DEFAULT_WORKERS,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            resolve_timeout: DEFAULT_RESOLVE_TIMEOUT,
            quiet: 0,
        }
    }
}

impl Config {
    /// Rejects settings no sweep can run with.
    pub fn validate(&self) -> Result<(), SweepError> {
        if self.workers == 0 {
            return Err(SweepError::NoWorkers);
        }
        if self.ports.is_empty() || self.ports.contains(&0) {
            let listed: Vec<String> = self.ports.iter().map(u16::to_string).collect();
            return Err(SweepError::NoValidPorts(listed.join(",")));
        }
        Ok(())
    }
}

pub mod discover;

use std::time::Duration;

use clap::{ArgAction, Parser};
use hostsweep_common::config::{self, Config};
use hostsweep_common::network::block::AddressBlock;
use hostsweep_common::network::ports;

#[derive(Parser)]
#[command(name = "hostsweep")]
#[command(about = "Find live hosts on a local IPv4 network.")]
pub struct CommandLine {
    /// Address block to sweep, e.g. 192.168.1.0/24
    #[arg(long, default_value = "192.168.1.0/24")]
    pub cidr: AddressBlock,

    /// Comma-separated TCP ports tried on hosts that did not answer ARP
    #[arg(short, long, default_value = "22,80,443,445,3389")]
    pub ports: String,

    /// Maximum number of requests in flight
    #[arg(short, long, default_value_t = config::DEFAULT_WORKERS)]
    pub concurrency: usize,

    /// Overall time budget (e.g. 90s, 2m)
    #[arg(short, long, default_value = "60s", value_parser = parse_duration)]
    pub timeout: Duration,

    /// Per-attempt TCP connect timeout
    #[arg(long, default_value = "500ms", value_parser = parse_duration)]
    pub connect_timeout: Duration,

    /// Per-request ARP reply timeout
    #[arg(long, default_value = "500ms", value_parser = parse_duration)]
    pub resolve_timeout: Duration,

    /// Less output; repeat for summary only
    #[arg(short, long, action = ArgAction::Count)]
    pub quiet: u8,

    /// Show per-address debug logs
    #[arg(short, long)]
    pub verbose: bool,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn to_config(&self) -> anyhow::Result<Config> {
        let cfg = Config {
            ports: ports::parse_ports(&self.ports)?,
            workers: self.concurrency,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            resolve_timeout: self.resolve_timeout,
            quiet: self.quiet,
        };
        cfg.validate()?;
        Ok(cfg)
    }
}

/// `500ms`, `2s`, `1m`, or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("'{input}' is not a duration"))?;

    match unit.trim() {
        "ms" => Ok(Duration::from_millis(value)),
        "" | "s" => Ok(Duration::from_secs(value)),
        "m" => Ok(Duration::from_secs(value * 60)),
        other => Err(format!("unknown duration unit '{other}'")),
    }
}

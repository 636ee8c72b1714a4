use std::sync::Arc;
use std::time::{Duration, Instant};

use colored::*;
use tracing::warn;

use crate::terminal::format::Detail;
use crate::terminal::{colors, format, print, spinner};
use hostsweep_common::config::Config;
use hostsweep_common::network::block::AddressBlock;
use hostsweep_common::network::host::{DiscoveredHost, SweepReport};
use hostsweep_common::success;
use hostsweep_core::Deadline;
use hostsweep_core::discovery::DiscoveryService;
use hostsweep_core::network::arp::resolver_for;
use hostsweep_core::network::tcp::TcpConnector;

pub async fn discover(block: AddressBlock, cfg: &Config, deadline: &Deadline) -> anyhow::Result<()> {
    print::section("sweep plan", cfg.quiet);
    print_plan(&block, cfg);

    if !is_root::is_root() {
        warn!("not running with root privileges, ARP discovery will likely be unavailable");
    }

    let progress = spinner::progress();
    progress.set_phase(&format!("Opening the link layer towards {block}"));
    let service = DiscoveryService::new(
        resolver_for(&block, cfg.resolve_timeout),
        Arc::new(TcpConnector),
    );

    let start_time: Instant = Instant::now();
    let result = service.perform_discovery(&block, cfg, deadline).await;
    progress.finish();

    let report: SweepReport = result?;
    discovery_ends(&report, &block, start_time.elapsed(), cfg, deadline);
    Ok(())
}

fn print_plan(block: &AddressBlock, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }
    let ports: Vec<String> = cfg.ports.iter().map(u16::to_string).collect();
    let candidates = block.usable_range().map_or(0, |range| range.len());
    let secs = |d: Duration| format!("{}s", d.as_secs_f64()).normal();

    let rows: Vec<Detail> = vec![
        ("Block".into(), block.to_string().color(colors::IPV4_ADDR)),
        ("Candidates".into(), candidates.to_string().normal()),
        ("Ports".into(), ports.join(",").normal()),
        ("Workers".into(), cfg.workers.to_string().normal()),
        ("Deadline".into(), secs(cfg.timeout)),
        ("Connect".into(), secs(cfg.connect_timeout)),
        ("Resolve".into(), secs(cfg.resolve_timeout)),
    ];
    print::key_values(&rows);
}

fn discovery_ends(
    report: &SweepReport,
    block: &AddressBlock,
    total_time: Duration,
    cfg: &Config,
    deadline: &Deadline,
) {
    if report.is_empty() {
        print::no_hosts(&block.to_string(), cfg.quiet);
    } else {
        print::section("hosts", cfg.quiet);
        print_hosts(&report.hosts(), cfg);
        print_summary(report, total_time, cfg);
    }
    print_notices(report, deadline);
}

fn print_hosts(hosts: &[DiscoveredHost], cfg: &Config) {
    if cfg.quiet >= 2 {
        return;
    }
    for (idx, host) in hosts.iter().enumerate() {
        print::host_entry(idx + 1, &host.ip.to_string(), &format::host_to_details(host));
    }
}

fn print_summary(report: &SweepReport, total_time: Duration, cfg: &Config) {
    let up: ColoredString = format!("{} hosts up", report.len()).bold().green();
    let split = format!(
        "{} {}, {} {}",
        report.arp.len(),
        "ARP".color(colors::METHOD_ARP),
        report.tcp.len(),
        "TCP".color(colors::METHOD_TCP)
    );
    let took: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let line = format!("{up} ({split}) in {took}");

    match cfg.quiet {
        0 => print::summary(&line),
        _ => {
            print::blank();
            success!("{line}")
        }
    }
}

/// Why the list above may be incomplete.
fn print_notices(report: &SweepReport, deadline: &Deadline) {
    if let Some(diag) = &report.arp_diagnostic {
        print::notice("arp", &format!("{diag}, only TCP was used"));
    }
    if let Some(err) = report.deadline_error() {
        print::notice("timeout", &format!("{err}, results are partial"));
    } else if deadline.is_cancelled() {
        print::notice("stopped", "interrupted, results are partial");
    }
}

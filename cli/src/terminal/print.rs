//! Layout of everything the sweep prints for a human: the plan, one entry
//! per host, the closing summary and the notices about partial results.
//!
//! Lines are emitted as events on [`PRINT_TARGET`] so they share a writer
//! with the log and always land above the progress line.

use std::fmt::Display;

use colored::*;
use tracing::info;

use crate::terminal::colors;
use crate::terminal::format::Detail;

pub const PRINT_TARGET: &str = "hostsweep::print";
pub const WIDTH: usize = 64;
const KEY_WIDTH: usize = 10;

pub fn print(line: &str) {
    info!(target: PRINT_TARGET, raw_msg = line);
}

pub fn blank() {
    print("");
}

pub fn banner(quiet: u8) {
    if quiet > 0 {
        return;
    }
    let label = format!(" hostsweep v{} ", env!("CARGO_PKG_VERSION"));
    print(&rule_with('━', &label.bright_green().bold().to_string()));
}

/// Titled divider between the parts of a run.
pub fn section(title: &str, quiet: u8) {
    if quiet > 0 {
        return;
    }
    let label = format!(" {} ", title.to_uppercase()).color(colors::PRIMARY);
    print(&rule_with('─', &label.to_string()));
}

/// `key ····· value` lines, keys aligned on a common column.
pub fn key_values(rows: &[Detail]) {
    for (key, value) in rows {
        print(&format!("  {}", key_value(key, value)));
    }
}

/// One discovered host: its numbered title, then its details as branches.
pub fn host_entry(idx: usize, title: &str, rows: &[Detail]) {
    for line in host_lines(idx, title, rows) {
        print(&line);
    }
}

/// The closing line, centered between two heavy rules.
pub fn summary(line: &str) {
    let rule = rule_with('━', "");
    print(&rule);
    print(&center(line));
    print(&rule);
}

/// A short tagged line about how complete the results are.
pub fn notice(tag: &str, text: &str) {
    let tag = format!("[{tag}]").yellow().bold();
    print(&format!("{tag} {}", text.color(colors::TEXT_DEFAULT)));
}

pub fn no_hosts(block: &str, quiet: u8) {
    section("no hosts", quiet);
    print(&center(&format!("nothing in {block} answered").red().bold().to_string()));
}

fn rule_with(fill: char, label: &str) -> String {
    let free = WIDTH.saturating_sub(console::measure_text_width(label));
    let left = free / 2;
    let right = free - left;
    format!(
        "{}{label}{}",
        fill.to_string().repeat(left).color(colors::SEPARATOR),
        fill.to_string().repeat(right).color(colors::SEPARATOR)
    )
}

fn center(line: &str) -> String {
    let pad = WIDTH.saturating_sub(console::measure_text_width(line)) / 2;
    format!("{}{line}", " ".repeat(pad))
}

// Padding is computed on the plain key, colour is applied afterwards.
fn key_value(key: &str, value: &impl Display) -> String {
    let dots = "·".repeat(KEY_WIDTH.saturating_sub(key.chars().count()) + 1);
    format!(
        "{} {} {value}",
        key.color(colors::TEXT_DEFAULT),
        dots.color(colors::SEPARATOR)
    )
}

fn host_lines(idx: usize, title: &str, rows: &[Detail]) -> Vec<String> {
    let number = format!("{idx:>3}").color(colors::ACCENT);
    let mut lines = vec![format!("{number}  {}", title.color(colors::IPV4_ADDR).bold())];

    for (i, (key, value)) in rows.iter().enumerate() {
        let branch = if i + 1 == rows.len() { "└" } else { "├" };
        lines.push(format!(
            "     {} {}",
            branch.color(colors::SEPARATOR),
            key_value(key, value)
        ));
    }
    lines
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

//! Snapshot command implementation.
//!
//! Takes one snapshot and prints it as a table, JSON or YAML.

use anyhow::Context;
use std::fmt::Write as _;
use std::thread;
use tracing::debug;

use sysnap::format::{elapsed_time, percent};
use sysnap::snapshot::{SnapshotCollector, SystemSnapshot};
use sysnap::utilization::CpuBasis;

use crate::cli::OutputFormat;
use crate::config::Config;

const COMMAND_WIDTH: usize = 48;
const USER_WIDTH: usize = 10;

/// Takes a snapshot. With warmup, a priming refresh is taken first so the
/// reported CPU utilization covers one refresh interval.
pub fn command_snapshot(config: &Config, format: OutputFormat, warmup: bool) -> anyhow::Result<()> {
    let mut collector = SnapshotCollector::new(config.reader(), config.collector_settings());

    if warmup {
        collector.refresh();
        debug!("Priming sample taken, waiting {:?}", config.refresh_interval());
        thread::sleep(config.refresh_interval());
    }

    let snapshot = collector.refresh();
    print!("{}", render_snapshot(&snapshot, format, config.top_n())?);
    Ok(())
}

/// Renders a snapshot in the requested format.
pub fn render_snapshot(
    snapshot: &SystemSnapshot,
    format: OutputFormat,
    top_n: usize,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(snapshot, top_n)),
        OutputFormat::Json => {
            let mut out = serde_json::to_string_pretty(snapshot)
                .context("Failed to serialize snapshot as JSON")?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(snapshot).context("Failed to serialize snapshot as YAML")
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

/// Plain text table: header block followed by the top `top_n` processes.
pub fn render_table(snapshot: &SystemSnapshot, top_n: usize) -> String {
    let mut out = String::new();

    let basis = match snapshot.cpu.basis {
        CpuBasis::Interval => "interval",
        CpuBasis::SinceBoot => "since boot",
        CpuBasis::Unavailable => "unavailable",
    };

    let _ = writeln!(out, "OS:         {}", snapshot.os_name);
    let _ = writeln!(out, "Kernel:     {}", snapshot.kernel_version);
    let _ = writeln!(out, "CPU:        {} ({})", percent(snapshot.cpu.ratio), basis);
    let _ = writeln!(out, "Memory:     {}", percent(snapshot.memory_utilization));
    let _ = writeln!(out, "Processes:  {} total, {} running", snapshot.total_processes, snapshot.running_processes);
    let _ = writeln!(out, "Up Time:    {}", elapsed_time(snapshot.uptime_seconds));
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:>7}  {:<uw$}  {:>6}  {:>9}  {:>9}  COMMAND",
        "PID",
        "USER",
        "CPU%",
        "RES",
        "TIME",
        uw = USER_WIDTH
    );

    for record in snapshot.processes.iter().take(top_n) {
        let _ = writeln!(
            out,
            "{:>7}  {:<uw$}  {:>6.1}  {:>9}  {:>9}  {}",
            record.pid(),
            truncate(record.user(), USER_WIDTH),
            record.cpu_utilization() * 100.0,
            record.resident_memory(),
            elapsed_time(record.age_seconds()),
            truncate(record.command(), COMMAND_WIDTH),
            uw = USER_WIDTH
        );
    }

    out
}

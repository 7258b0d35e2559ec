//! Snapshot collection: enumerate, build, sort.
//!
//! Every refresh is a full rebuild. The only state carried between refreshes
//! is the previous aggregate CPU sample, owned by `SnapshotCollector`.
//! `refresh` takes `&mut self`, so a collector can only ever serve one
//! refresh at a time; running collectors in parallel against the same
//! previous sample is not supported.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::time::Instant;
use tracing::{debug, info};

use crate::process::{
    collect_proc_entries, BuiltProcess, ProcessFilter, ProcessRecord, ProcessSnapshotBuilder, UserRegistry,
};
use crate::procfs::TextInterfaceReader;
use crate::system::{read_host_info, read_memory_info, read_stat_counters, read_uptime};
use crate::utilization::{memory_utilization, CpuReading, CpuSample, FirstSample, UtilizationCalculator};

/// Column used to order process records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Cpu,
    Memory,
    Pid,
    Age,
    User,
    Command,
}

/// Sort key and direction. Default: CPU utilization, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub key: SortKey,
    pub descending: bool,
}

impl Default for SortOrder {
    fn default() -> Self {
        Self {
            key: SortKey::Cpu,
            descending: true,
        }
    }
}

fn compare_by_key(a: &ProcessRecord, b: &ProcessRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::Cpu => a.cpu_utilization().total_cmp(&b.cpu_utilization()),
        SortKey::Memory => a.resident_memory_kb().cmp(&b.resident_memory_kb()),
        SortKey::Pid => a.pid().cmp(&b.pid()),
        SortKey::Age => a.age_seconds().cmp(&b.age_seconds()),
        SortKey::User => a.user().cmp(b.user()),
        SortKey::Command => a.command().cmp(b.command()),
    }
}

/// Sorts records in place. Ties are broken by pid ascending, whatever the
/// direction, so the result is deterministic.
pub fn sort_records(records: &mut [ProcessRecord], order: SortOrder) {
    records.sort_by(|a, b| {
        let primary = compare_by_key(a, b, order.key);
        let primary = if order.descending {
            primary.reverse()
        } else {
            primary
        };
        primary.then_with(|| a.pid().cmp(&b.pid()))
    });
}

/// Applies the command filter. Returns the kept records and how many of
/// them vanished while being read.
fn retain_included(
    built: impl Iterator<Item = BuiltProcess>,
    filter: &ProcessFilter,
) -> (Vec<ProcessRecord>, usize) {
    let mut records = Vec::new();
    let mut vanished = 0;
    for process in built {
        if !filter.should_include(process.record.command()) {
            continue;
        }
        if process.vanished {
            vanished += 1;
        }
        records.push(process.record);
    }
    (records, vanished)
}

/// A point-in-time capture of system and process metrics.
#[derive(Debug, Clone, Serialize)]
pub struct SystemSnapshot {
    pub os_name: String,
    pub kernel_version: String,
    /// Processes created since boot
    pub total_processes: u64,
    pub running_processes: u64,
    pub uptime_seconds: u64,
    pub memory_utilization: f64,
    pub cpu: CpuReading,
    pub processes: Vec<ProcessRecord>,
    /// Processes that exited while being read (still present in `processes`)
    pub vanished_processes: usize,
    pub taken_at: DateTime<Local>,
    pub collection_ms: f64,
}

impl SystemSnapshot {
    pub fn cpu_utilization(&self) -> f64 {
        self.cpu.ratio
    }
}

/// Settings applied on every refresh.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub sort: SortOrder,
    pub first_sample: FirstSample,
    pub filter: ProcessFilter,
    pub max_processes: Option<usize>,
    pub clk_tck: f64,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            sort: SortOrder::default(),
            first_sample: FirstSample::default(),
            filter: ProcessFilter::default(),
            max_processes: None,
            clk_tck: *crate::process::CLK_TCK,
        }
    }
}

/// Builds snapshots and carries the previous CPU sample between them.
pub struct SnapshotCollector {
    reader: TextInterfaceReader,
    settings: CollectorSettings,
    calculator: UtilizationCalculator,
    previous_cpu: Option<CpuSample>,
}

impl SnapshotCollector {
    pub fn new(reader: TextInterfaceReader, settings: CollectorSettings) -> Self {
        let calculator = UtilizationCalculator::new(settings.first_sample);
        Self {
            reader,
            settings,
            calculator,
            previous_cpu: None,
        }
    }

    /// Builds a fresh snapshot.
    pub fn refresh(&mut self) -> SystemSnapshot {
        let start = Instant::now();

        let host = read_host_info(&self.reader);
        let memory = read_memory_info(&self.reader);
        let uptime = read_uptime(&self.reader).unwrap_or(0.0);
        let stat = read_stat_counters(&self.reader);

        let cpu = self.calculator.cpu(self.previous_cpu, stat.cpu);
        // Read-then-replace; the only cross-refresh state
        self.previous_cpu = cpu.sample;

        let memory_utilization = match (memory.total_kb.value(), memory.free_kb.value()) {
            (Some(&total), Some(&free)) => memory_utilization(total, free),
            _ => 0.0,
        };

        let users = UserRegistry::load(&self.reader);
        let builder = ProcessSnapshotBuilder::new(&self.reader, &users, uptime, self.settings.clk_tck);

        let pids = collect_proc_entries(&self.reader, self.settings.max_processes);
        let (mut processes, vanished_processes) = retain_included(
            pids.into_iter().map(|pid| builder.build(pid)),
            &self.settings.filter,
        );

        sort_records(&mut processes, self.settings.sort);

        let collection_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "Snapshot built: {} processes ({} vanished), cpu {:.3} ({:?}), mem {:.3} in {:.2}ms",
            processes.len(),
            vanished_processes,
            cpu.ratio,
            cpu.basis,
            memory_utilization,
            collection_ms
        );
        if stat.cpu.is_none() {
            info!("Aggregate cpu counters unavailable in this refresh");
        }

        SystemSnapshot {
            os_name: host.os_name,
            kernel_version: host.kernel_version,
            total_processes: stat.processes.or_default(),
            running_processes: stat.procs_running.or_default(),
            uptime_seconds: uptime.max(0.0) as u64,
            memory_utilization,
            cpu,
            processes,
            vanished_processes,
            taken_at: Local::now(),
            collection_ms,
        }
    }
}

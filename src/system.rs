//! System-wide metrics collection from /proc.
//!
//! This module reads machine-level interfaces (os-release, version, meminfo,
//! uptime and the aggregate `cpu` row of /proc/stat) through the schema
//! tables in `procfs::interfaces`.

use serde::Serialize;

use crate::procfs::interfaces::{KERNEL_VERSION, MEMINFO, OS_RELEASE, STAT, UPTIME};
use crate::procfs::{Field, TextInterfaceReader};
use crate::utilization::CpuSample;

/// Memory counters from /proc/meminfo, in kB.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryInfo {
    pub total_kb: Field<u64>,
    pub free_kb: Field<u64>,
    pub available_kb: Field<u64>,
}

/// Aggregate counters from /proc/stat.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCounters {
    /// `None` if the `cpu` row is missing or unusable.
    pub cpu: Option<CpuSample>,
    /// Processes created since boot.
    pub processes: Field<u64>,
    pub procs_running: Field<u64>,
}

/// Identification strings of the host.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HostInfo {
    pub os_name: String,
    pub kernel_version: String,
}

/// Reads the human-readable distribution name (PRETTY_NAME, falling back to NAME).
pub fn read_os_name(reader: &TextInterfaceReader) -> Field<String> {
    let extracted = reader.read(&reader.paths().os_release, &OS_RELEASE);
    match extracted.text("pretty_name") {
        Field::Present(name) => Field::Present(name),
        Field::Absent(_) => extracted.text("name"),
    }
}

/// Reads the kernel release from /proc/version.
pub fn read_kernel_version(reader: &TextInterfaceReader) -> Field<String> {
    reader
        .read(&reader.proc_file("version"), &KERNEL_VERSION)
        .text("release")
}

pub fn read_host_info(reader: &TextInterfaceReader) -> HostInfo {
    HostInfo {
        os_name: read_os_name(reader).or_default(),
        kernel_version: read_kernel_version(reader).or_default(),
    }
}

/// Reads memory counters from /proc/meminfo.
pub fn read_memory_info(reader: &TextInterfaceReader) -> MemoryInfo {
    let extracted = reader.read(&reader.proc_file("meminfo"), &MEMINFO);
    MemoryInfo {
        total_kb: extracted.unsigned("total_kb"),
        free_kb: extracted.unsigned("free_kb"),
        available_kb: extracted.unsigned("available_kb"),
    }
}

/// Reads system uptime in seconds from /proc/uptime.
pub fn read_uptime(reader: &TextInterfaceReader) -> Field<f64> {
    reader
        .read(&reader.proc_file("uptime"), &UPTIME)
        .float("uptime_seconds")
}

/// Reads the aggregate cpu row and process counters from /proc/stat.
pub fn read_stat_counters(reader: &TextInterfaceReader) -> StatCounters {
    let extracted = reader.read(&reader.proc_file("stat"), &STAT);

    // user and idle must be there; later columns are absent on old kernels
    let cpu = match (extracted.unsigned("user"), extracted.unsigned("idle")) {
        (Field::Present(user), Field::Present(idle)) => Some(CpuSample {
            user,
            nice: extracted.unsigned("nice").or_default(),
            system: extracted.unsigned("system").or_default(),
            idle,
            iowait: extracted.unsigned("iowait").or_default(),
            irq: extracted.unsigned("irq").or_default(),
            softirq: extracted.unsigned("softirq").or_default(),
            steal: extracted.unsigned("steal").or_default(),
        }),
        _ => None,
    };

    StatCounters {
        cpu,
        processes: extracted.unsigned("processes"),
        procs_running: extracted.unsigned("procs_running"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procfs::{Absence, SourcePaths};
    use std::fs;
    use tempfile::{tempdir, TempDir};

    fn fixture() -> (TempDir, TextInterfaceReader) {
        let dir = tempdir().expect("Failed to create temp dir");
        fs::create_dir_all(dir.path().join("proc")).unwrap();
        fs::create_dir_all(dir.path().join("etc")).unwrap();
        let reader = TextInterfaceReader::new(SourcePaths::rooted_at(dir.path()));
        (dir, reader)
    }

    #[test]
    fn test_read_os_name_falls_back_to_name() {
        let (dir, reader) = fixture();
        fs::write(dir.path().join("etc/os-release"), "NAME=\"Alpine Linux\"\nID=alpine\n").unwrap();
        assert_eq!(read_os_name(&reader), Field::Present("Alpine Linux".to_string()));
    }

    #[test]
    fn test_read_memory_info() {
        let (dir, reader) = fixture();
        fs::write(
            dir.path().join("proc/meminfo"),
            "MemTotal:        1000 kB\nMemFree:          400 kB\nMemAvailable:     600 kB\n",
        )
        .unwrap();

        let info = read_memory_info(&reader);
        assert_eq!(info.total_kb, Field::Present(1000));
        assert_eq!(info.free_kb, Field::Present(400));
        assert_eq!(info.available_kb, Field::Present(600));
    }

    #[test]
    fn test_read_stat_counters() {
        let (dir, reader) = fixture();
        fs::write(
            dir.path().join("proc/stat"),
            "cpu  150 0 70 900 0 0 0 0 0 0\nprocesses 812\nprocs_running 2\n",
        )
        .unwrap();

        let counters = read_stat_counters(&reader);
        let cpu = counters.cpu.expect("cpu row should parse");
        assert_eq!(cpu.active_jiffies(), 220);
        assert_eq!(cpu.idle_jiffies(), 900);
        assert_eq!(counters.processes, Field::Present(812));
        assert_eq!(counters.procs_running, Field::Present(2));
    }

    #[test]
    fn test_read_stat_counters_missing_file() {
        let (_dir, reader) = fixture();
        let counters = read_stat_counters(&reader);
        assert!(counters.cpu.is_none());
        assert_eq!(counters.processes, Field::Absent(Absence::MissingSource));
    }

    #[test]
    fn test_read_uptime_malformed() {
        let (dir, reader) = fixture();
        fs::write(dir.path().join("proc/uptime"), "garbage\n").unwrap();
        assert_eq!(read_uptime(&reader), Field::Absent(Absence::Malformed));
    }
}

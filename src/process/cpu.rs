//! CPU time parsing for process metrics.
//!
//! This module reads the CPU time counters and start time of a process from
//! `/proc/<pid>/stat` and converts clock ticks using the platform's
//! ticks-per-second constant.

use once_cell::sync::Lazy;

use crate::procfs::interfaces::PID_STAT;
use crate::procfs::{Field, TextInterfaceReader};

/// Get system clock ticks per second (usually 100, but can vary).
fn get_clk_tck() -> f64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf is safe to call with _SC_CLK_TCK
        // Returns -1 on error, 0 if undefined - both are handled by the > 0 check
        unsafe {
            let tck = libc::sysconf(libc::_SC_CLK_TCK);
            if tck > 0 {
                return tck as f64;
            }
        }
    }
    100.0
}

/// System clock ticks per second (for CPU time calculation).
pub static CLK_TCK: Lazy<f64> = Lazy::new(get_clk_tck);

/// CPU time counters of one process, in clock ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessTimes {
    pub utime: Field<u64>,
    pub stime: Field<u64>,
    /// Waited-for children, user mode
    pub cutime: Field<u64>,
    /// Waited-for children, kernel mode
    pub cstime: Field<u64>,
    /// Start time after boot
    pub start_ticks: Field<u64>,
}

impl ProcessTimes {
    /// utime + stime + cutime + cstime, absent counters counted as zero.
    pub fn total_jiffies(&self) -> u64 {
        [&self.utime, &self.stime, &self.cutime, &self.cstime]
            .iter()
            .map(|f| f.value().copied().unwrap_or(0))
            .fold(0, u64::saturating_add)
    }

    /// Start time in seconds after boot.
    pub fn start_seconds(&self, clk_tck: f64) -> Field<f64> {
        self.start_ticks.clone().map(|ticks| ticks as f64 / clk_tck)
    }
}

/// Reads CPU time counters from /proc/<pid>/stat.
pub fn read_process_times(reader: &TextInterfaceReader, pid: u32) -> ProcessTimes {
    let extracted = reader.read(&reader.pid_file(pid, "stat"), &PID_STAT);
    ProcessTimes {
        utime: extracted.unsigned("utime"),
        stime: extracted.unsigned("stime"),
        cutime: extracted.unsigned("cutime"),
        cstime: extracted.unsigned("cstime"),
        start_ticks: extracted.unsigned("starttime"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procfs::{Absence, SourcePaths};
    use tempfile::tempdir;

    fn write_stat(root: &std::path::Path, pid: u32, content: &str) {
        let dir = root.join("proc").join(pid.to_string());
        std::fs::create_dir_all(&dir).expect("Failed to create pid dir");
        std::fs::write(dir.join("stat"), content).expect("Failed to write stat file");
    }

    #[test]
    fn test_read_process_times() {
        let dir = tempdir().expect("Failed to create temp dir");

        // Fields 14-17 are utime, stime, cutime, cstime; field 22 is starttime
        let stat_content = "1234 (test_process) S 1 1234 1234 0 -1 4194304 100 0 0 0 1000 500 20 10 20 0 1 0 200 12345678 1234 18446744073709551615";
        write_stat(dir.path(), 1234, stat_content);
        let reader = TextInterfaceReader::new(SourcePaths::rooted_at(dir.path()));

        let times = read_process_times(&reader, 1234);
        assert_eq!(times.utime, Field::Present(1000));
        assert_eq!(times.stime, Field::Present(500));
        assert_eq!(times.total_jiffies(), 1530);
        assert_eq!(times.start_ticks, Field::Present(200));
        assert_eq!(times.start_seconds(100.0), Field::Present(2.0));
    }

    #[test]
    fn test_read_process_times_truncated_stat() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_stat(dir.path(), 7, "7 (test) S 1 2 3");
        let reader = TextInterfaceReader::new(SourcePaths::rooted_at(dir.path()));

        let times = read_process_times(&reader, 7);
        assert_eq!(times.utime, Field::Absent(Absence::NotFound));
        assert_eq!(times.total_jiffies(), 0);
    }

    #[test]
    fn test_total_jiffies_saturates() {
        let dir = tempdir().expect("Failed to create temp dir");
        write_stat(
            dir.path(),
            8,
            "8 (spin) R 1 8 8 0 -1 0 0 0 0 0 18446744073709551615 5 0 0 20 0 1 0 100 0 0",
        );
        let reader = TextInterfaceReader::new(SourcePaths::rooted_at(dir.path()));

        let times = read_process_times(&reader, 8);
        assert_eq!(times.utime, Field::Present(u64::MAX));
        assert_eq!(times.total_jiffies(), u64::MAX);
    }

    #[test]
    fn test_read_process_times_missing_file() {
        let dir = tempdir().expect("Failed to create temp dir");
        let reader = TextInterfaceReader::new(SourcePaths::rooted_at(dir.path()));

        let times = read_process_times(&reader, 99);
        assert_eq!(times.start_ticks, Field::Absent(Absence::MissingSource));
    }

    #[test]
    fn test_clk_tck_is_positive() {
        assert!(*CLK_TCK > 0.0);
    }
}

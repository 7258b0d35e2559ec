//! End-to-end snapshot tests against fixture interface trees.
//!
//! Each test lays out a fake `/proc` plus `/etc` under a temp dir and drives
//! the public collector API against it.

use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

use sysnap::procfs::{SourcePaths, TextInterfaceReader};
use sysnap::snapshot::{CollectorSettings, SnapshotCollector, SortKey, SortOrder};
use sysnap::utilization::{CpuBasis, FirstSample};

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn write_process(root: &Path, pid: u32, name: &str, uid: u32, rss_kb: u64, utime: u64, start: u64, cmdline: &[u8]) {
    write(
        root,
        &format!("proc/{}/status", pid),
        format!(
            "Name:\t{}\nState:\tS (sleeping)\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\nVmRSS:\t{} kB\n",
            name,
            rss_kb,
            uid = uid
        )
        .as_bytes(),
    );
    write(
        root,
        &format!("proc/{}/stat", pid),
        format!(
            "{} ({}) S 1 {} {} 0 -1 0 0 0 0 0 {} 0 0 0 20 0 1 0 {} 0 0",
            pid, name, pid, pid, utime, start
        )
        .as_bytes(),
    );
    write(root, &format!("proc/{}/cmdline", pid), cmdline);
}

/// A small host: 3665s uptime, 60% memory used, three processes.
fn fixture_tree() -> TempDir {
    let dir = tempdir().expect("Failed to create temp dir");
    let root = dir.path();

    write(
        root,
        "etc/os-release",
        b"NAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nPRETTY_NAME=\"Ubuntu 22.04.3 LTS\"\n",
    );
    write(
        root,
        "etc/passwd",
        b"root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/sh\n",
    );
    write(
        root,
        "proc/version",
        b"Linux version 5.15.0-91-generic (buildd@lcy02-amd64-045) (gcc 11.4.0) #101-Ubuntu SMP\n",
    );
    write(
        root,
        "proc/meminfo",
        b"MemTotal:       1000 kB\nMemFree:         400 kB\nMemAvailable:    500 kB\n",
    );
    write(root, "proc/uptime", b"3665.42 7000.00\n");
    write(
        root,
        "proc/stat",
        b"cpu  100 0 0 900 0 0 0 0 0 0\nprocesses 4321\nprocs_running 2\nprocs_blocked 0\n",
    );

    // At 100 Hz the host has run 366542 jiffies
    write_process(root, 1, "systemd", 0, 12000, 3000, 100, b"/sbin/init\0splash\0");
    write_process(root, 42, "python3", 1000, 50000, 36000, 6500, b"python3\0app.py\0");
    write_process(root, 7, "kworker/0:1", 0, 0, 0, 200, b"");

    dir
}

fn collector(root: &Path, first_sample: FirstSample) -> SnapshotCollector {
    let settings = CollectorSettings {
        first_sample,
        clk_tck: 100.0,
        ..CollectorSettings::default()
    };
    SnapshotCollector::new(TextInterfaceReader::new(SourcePaths::rooted_at(root)), settings)
}

#[test]
fn test_full_snapshot_from_fixture_tree() {
    let dir = fixture_tree();
    let mut collector = collector(dir.path(), FirstSample::SinceBoot);
    let snapshot = collector.refresh();

    assert_eq!(snapshot.os_name, "Ubuntu 22.04.3 LTS");
    assert_eq!(snapshot.kernel_version, "5.15.0-91-generic");
    assert_eq!(snapshot.total_processes, 4321);
    assert_eq!(snapshot.running_processes, 2);
    assert_eq!(snapshot.uptime_seconds, 3665);
    assert!((snapshot.memory_utilization - 0.6).abs() < 1e-9);
    assert_eq!(snapshot.vanished_processes, 0);

    // Single sample: averaged since boot
    assert_eq!(snapshot.cpu.basis, CpuBasis::SinceBoot);
    assert!((snapshot.cpu_utilization() - 0.1).abs() < 1e-9);

    // python3: 36000 / (366542 - 6500); systemd: 3000 / (366542 - 100)
    let pids: Vec<u32> = snapshot.processes.iter().map(|p| p.pid()).collect();
    assert_eq!(pids, vec![42, 1, 7]);

    let python = &snapshot.processes[0];
    assert_eq!(python.user(), "alice");
    assert_eq!(python.command(), "python3 app.py");
    assert_eq!(python.resident_memory_kb(), 50000);
    assert_eq!(python.start_time_seconds(), 65);
    assert_eq!(python.age_seconds(), 3600);
    assert!((python.cpu_utilization() - 36000.0 / 360042.0).abs() < 1e-9);

    let kworker = &snapshot.processes[2];
    assert_eq!(kworker.user(), "root");
    assert_eq!(kworker.command(), "[kworker/0:1]");
    assert_eq!(kworker.cpu_utilization(), 0.0);
}

#[test]
fn test_second_refresh_uses_interval_delta() {
    let dir = fixture_tree();
    let mut collector = collector(dir.path(), FirstSample::Zero);

    let first = collector.refresh();
    assert_eq!(first.cpu.basis, CpuBasis::SinceBoot);
    assert_eq!(first.cpu_utilization(), 0.0);

    // +70 active, +50 idle
    write(
        dir.path(),
        "proc/stat",
        b"cpu  150 0 20 950 0 0 0 0 0 0\nprocesses 4322\nprocs_running 1\n",
    );
    let second = collector.refresh();

    assert_eq!(second.cpu.basis, CpuBasis::Interval);
    assert!((second.cpu_utilization() - 70.0 / 120.0).abs() < 1e-9);
    assert_eq!(second.total_processes, 4322);
    assert_eq!(second.running_processes, 1);
}

#[test]
fn test_missing_process_file_degrades_one_record() {
    let dir = fixture_tree();
    fs::remove_file(dir.path().join("proc/42/stat")).unwrap();

    let mut collector = collector(dir.path(), FirstSample::SinceBoot);
    let snapshot = collector.refresh();

    assert_eq!(snapshot.processes.len(), 3);
    assert_eq!(snapshot.vanished_processes, 0);

    let python = snapshot
        .processes
        .iter()
        .find(|p| p.pid() == 42)
        .expect("pid 42 listed");
    assert_eq!(python.cpu_utilization(), 0.0);
    assert_eq!(python.start_time_seconds(), 0);
    assert_eq!(python.age_seconds(), 0);
    // status is still readable
    assert_eq!(python.user(), "alice");
    assert_eq!(python.resident_memory_kb(), 50000);

    let systemd = snapshot
        .processes
        .iter()
        .find(|p| p.pid() == 1)
        .expect("pid 1 listed");
    assert_eq!(systemd.command(), "/sbin/init splash");
    assert!(systemd.cpu_utilization() > 0.0);
}

#[test]
fn test_missing_system_interfaces_yield_defaults() {
    let dir = tempdir().expect("Failed to create temp dir");
    fs::create_dir_all(dir.path().join("proc")).unwrap();

    let mut collector = collector(dir.path(), FirstSample::SinceBoot);
    let snapshot = collector.refresh();

    assert_eq!(snapshot.os_name, "");
    assert_eq!(snapshot.kernel_version, "");
    assert_eq!(snapshot.total_processes, 0);
    assert_eq!(snapshot.uptime_seconds, 0);
    assert_eq!(snapshot.memory_utilization, 0.0);
    assert_eq!(snapshot.cpu.basis, CpuBasis::Unavailable);
    assert_eq!(snapshot.cpu_utilization(), 0.0);
    assert!(snapshot.processes.is_empty());
}

#[test]
fn test_sort_by_memory_ascending() {
    let dir = fixture_tree();
    let settings = CollectorSettings {
        sort: SortOrder {
            key: SortKey::Memory,
            descending: false,
        },
        clk_tck: 100.0,
        ..CollectorSettings::default()
    };
    let mut collector =
        SnapshotCollector::new(TextInterfaceReader::new(SourcePaths::rooted_at(dir.path())), settings);
    let snapshot = collector.refresh();

    let pids: Vec<u32> = snapshot.processes.iter().map(|p| p.pid()).collect();
    assert_eq!(pids, vec![7, 1, 42]);
}

#[test]
fn test_snapshot_serializes_to_json() {
    let dir = fixture_tree();
    let mut collector = collector(dir.path(), FirstSample::SinceBoot);
    let snapshot = collector.refresh();

    let json = serde_json::to_value(&snapshot).expect("snapshot serializes");
    assert_eq!(json["os_name"], "Ubuntu 22.04.3 LTS");
    assert_eq!(json["uptime_seconds"], 3665);
    assert_eq!(json["cpu"]["basis"], "since_boot");
    assert_eq!(json["processes"][0]["pid"], 42);
}

#[test]
fn test_huge_counters_do_not_abort_refresh() {
    let dir = fixture_tree();
    write(
        dir.path(),
        "proc/stat",
        b"cpu  18446744073709551615 1 0 10 0 0 0 0\nprocesses 4321\nprocs_running 2\n",
    );
    write_process(dir.path(), 42, "python3", 1000, 50000, u64::MAX, 6500, b"python3\0app.py\0");

    let mut collector = collector(dir.path(), FirstSample::SinceBoot);
    let first = collector.refresh();
    assert_eq!(first.cpu.basis, CpuBasis::SinceBoot);
    assert!((0.0..=1.0).contains(&first.cpu_utilization()));

    let python = first
        .processes
        .iter()
        .find(|p| p.pid() == 42)
        .expect("pid 42 listed");
    assert_eq!(python.cpu_utilization(), 1.0);

    // A second refresh differences against the saturated sample
    let second = collector.refresh();
    assert!((0.0..=1.0).contains(&second.cpu_utilization()));
    assert_eq!(second.processes.len(), 3);
}

//! Process-related modules for per-process records.
//!
//! This module provides:
//! - `cpu`: CPU time counters and start time from /proc/<pid>/stat
//! - `status`: owner uid, name and resident memory from /proc/<pid>/status
//! - `users`: uid to user name resolution via the passwd registry
//! - `record`: the immutable `ProcessRecord`
//! - `builder`: assembly of a record from the interfaces above
//! - `scanner`: process discovery and filtering

pub mod builder;
pub mod cpu;
pub mod record;
pub mod scanner;
pub mod status;
pub mod users;

// Re-export commonly used types
pub use builder::{command_from_cmdline, BuiltProcess, ProcessSnapshotBuilder};
pub use cpu::{read_process_times, ProcessTimes, CLK_TCK};
pub use record::ProcessRecord;
pub use scanner::{collect_proc_entries, ProcessFilter};
pub use status::{read_process_status, ProcessStatus};
pub use users::UserRegistry;

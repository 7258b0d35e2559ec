//! Immutable per-process record.

use serde::Serialize;

use crate::format::format_kb;

/// One process as seen by a single population pass.
///
/// Records are built once and never updated; a new snapshot builds new
/// records. Fields are read through accessors so the pid cannot change
/// after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessRecord {
    pid: u32,
    uid: Option<u64>,
    user: String,
    command: String,
    cpu_utilization: f64,
    resident_memory_kb: u64,
    start_time_seconds: u64,
    age_seconds: u64,
}

impl ProcessRecord {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        pid: u32,
        uid: Option<u64>,
        user: String,
        command: String,
        cpu_utilization: f64,
        resident_memory_kb: u64,
        start_time_seconds: u64,
        age_seconds: u64,
    ) -> Self {
        Self {
            pid,
            uid,
            user,
            command,
            cpu_utilization,
            resident_memory_kb,
            start_time_seconds,
            age_seconds,
        }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// Real uid, if the status interface was readable.
    pub fn uid(&self) -> Option<u64> {
        self.uid
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Average CPU share since start, in [0, 1].
    pub fn cpu_utilization(&self) -> f64 {
        self.cpu_utilization
    }

    pub fn resident_memory_kb(&self) -> u64 {
        self.resident_memory_kb
    }

    /// Resident memory scaled for display, e.g. "12.3 MB".
    pub fn resident_memory(&self) -> String {
        format_kb(self.resident_memory_kb)
    }

    /// Seconds after boot at which the process started.
    pub fn start_time_seconds(&self) -> u64 {
        self.start_time_seconds
    }

    /// Wall-clock seconds since the process started.
    pub fn age_seconds(&self) -> u64 {
        self.age_seconds
    }
}

//! Assembly of a complete `ProcessRecord` for one pid.
//!
//! A missing or malformed sub-field only defaults that field (empty string
//! or zero). The record is always produced.

use tracing::debug;

use crate::error::SourceError;
use crate::procfs::{Absence, Field, TextInterfaceReader};
use crate::utilization::process_cpu_share;

use super::cpu::read_process_times;
use super::record::ProcessRecord;
use super::status::read_process_status;
use super::users::UserRegistry;

/// Per-refresh context for building process records.
pub struct ProcessSnapshotBuilder<'a> {
    reader: &'a TextInterfaceReader,
    users: &'a UserRegistry,
    uptime_seconds: f64,
    clk_tck: f64,
}

/// A built record and whether the process disappeared while it was read.
#[derive(Debug, Clone)]
pub struct BuiltProcess {
    pub record: ProcessRecord,
    pub vanished: bool,
}

impl<'a> ProcessSnapshotBuilder<'a> {
    pub fn new(
        reader: &'a TextInterfaceReader,
        users: &'a UserRegistry,
        uptime_seconds: f64,
        clk_tck: f64,
    ) -> Self {
        Self {
            reader,
            users,
            uptime_seconds,
            clk_tck,
        }
    }

    pub fn build(&self, pid: u32) -> BuiltProcess {
        let status = read_process_status(self.reader, pid);
        let times = read_process_times(self.reader, pid);
        let cmdline = self.reader.read_raw(&self.reader.pid_file(pid, "cmdline"));

        let user = match status.uid {
            Field::Present(uid) => self.users.resolve(uid),
            Field::Absent(_) => String::new(),
        };

        let command = match cmdline.into_option().and_then(|raw| command_from_cmdline(&raw)) {
            Some(command) => command,
            // Kernel threads have an empty cmdline; show the name like ps does
            None => match &status.name {
                Field::Present(name) if !name.is_empty() => format!("[{}]", name),
                _ => String::new(),
            },
        };

        let (cpu_utilization, start_time_seconds, age_seconds) =
            match (&times.start_ticks, times.start_seconds(self.clk_tck)) {
                (Field::Present(start_ticks), Field::Present(start)) => {
                    let share = process_cpu_share(
                        times.total_jiffies(),
                        *start_ticks,
                        self.uptime_seconds,
                        self.clk_tck,
                    );
                    let age = (self.uptime_seconds - start).max(0.0);
                    (share, start as u64, age as u64)
                }
                _ => (0.0, 0, 0),
            };

        let vanished = status.uid.absence() == Some(Absence::MissingSource)
            && times.start_ticks.absence() == Some(Absence::MissingSource)
            && !self.reader.pid_dir(pid).exists();
        if vanished {
            debug!("{}", SourceError::VanishedProcess { pid });
        }

        let record = ProcessRecord::new(
            pid,
            status.uid.into_option(),
            user,
            command,
            cpu_utilization,
            status.resident_kb.or_default(),
            start_time_seconds,
            age_seconds,
        );

        BuiltProcess { record, vanished }
    }
}

/// Joins NUL-separated arguments with spaces. `None` for an empty cmdline.
pub fn command_from_cmdline(raw: &[u8]) -> Option<String> {
    let args: Vec<String> = raw
        .split(|&b| b == 0u8)
        .filter(|arg| !arg.is_empty())
        .map(|arg| String::from_utf8_lossy(arg).into_owned())
        .collect();
    if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    }
}

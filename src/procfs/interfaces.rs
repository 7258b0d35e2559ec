//! Schema tables for every kernel interface the snapshot engine reads.

use super::schema::{FieldSpec, Schema, Selector};

/// `/etc/os-release`: `KEY="VALUE"` lines.
pub static OS_RELEASE: Schema = Schema {
    interface: "os-release",
    fields: &[
        FieldSpec::text("pretty_name", Selector::keyed("PRETTY_NAME", '=')),
        FieldSpec::text("name", Selector::keyed("NAME", '=')),
    ],
};

/// `/proc/version`: "Linux version <release> ...".
pub static KERNEL_VERSION: Schema = Schema {
    interface: "version",
    fields: &[FieldSpec::text("release", Selector::Token(3))],
};

/// `/proc/meminfo`: "Label:   value kB" lines.
pub static MEMINFO: Schema = Schema {
    interface: "meminfo",
    fields: &[
        FieldSpec::unsigned("total_kb", Selector::keyed("MemTotal", ':')),
        FieldSpec::unsigned("free_kb", Selector::keyed("MemFree", ':')),
        FieldSpec::unsigned("available_kb", Selector::keyed("MemAvailable", ':')),
    ],
};

/// `/proc/uptime`: "<uptime_seconds> <idle_seconds>".
pub static UPTIME: Schema = Schema {
    interface: "uptime",
    fields: &[FieldSpec::float("uptime_seconds", Selector::Token(1))],
};

/// `/proc/stat`: aggregate cpu row plus process counters.
pub static STAT: Schema = Schema {
    interface: "stat",
    fields: &[
        FieldSpec::unsigned("user", Selector::row("cpu", 1)),
        FieldSpec::unsigned("nice", Selector::row("cpu", 2)),
        FieldSpec::unsigned("system", Selector::row("cpu", 3)),
        FieldSpec::unsigned("idle", Selector::row("cpu", 4)),
        FieldSpec::unsigned("iowait", Selector::row("cpu", 5)),
        FieldSpec::unsigned("irq", Selector::row("cpu", 6)),
        FieldSpec::unsigned("softirq", Selector::row("cpu", 7)),
        FieldSpec::unsigned("steal", Selector::row("cpu", 8)),
        FieldSpec::unsigned("processes", Selector::row("processes", 1)),
        FieldSpec::unsigned("procs_running", Selector::row("procs_running", 1)),
    ],
};

/// `/proc/<pid>/status`: "Key:\tvalue" lines.
pub static PID_STATUS: Schema = Schema {
    interface: "pid/status",
    fields: &[
        FieldSpec::text("name", Selector::keyed("Name", ':')),
        // First of real/effective/saved/fs
        FieldSpec::unsigned("uid", Selector::keyed("Uid", ':')),
        FieldSpec::unsigned("vm_rss_kb", Selector::keyed("VmRSS", ':')),
    ],
};

/// `/proc/<pid>/stat`: positional record, see proc(5).
pub static PID_STAT: Schema = Schema {
    interface: "pid/stat",
    fields: &[
        FieldSpec::unsigned("utime", Selector::StatField(14)),
        FieldSpec::unsigned("stime", Selector::StatField(15)),
        FieldSpec::unsigned("cutime", Selector::StatField(16)),
        FieldSpec::unsigned("cstime", Selector::StatField(17)),
        FieldSpec::unsigned("starttime", Selector::StatField(22)),
    ],
};

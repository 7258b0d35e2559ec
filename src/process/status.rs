//! Owner and resident memory parsing from `/proc/<pid>/status`.

use crate::procfs::interfaces::PID_STATUS;
use crate::procfs::{Field, TextInterfaceReader};

/// Fields of interest from /proc/<pid>/status.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessStatus {
    pub name: Field<String>,
    /// Real user id
    pub uid: Field<u64>,
    /// Resident set size. Kernel threads have no VmRSS line.
    pub resident_kb: Field<u64>,
}

pub fn read_process_status(reader: &TextInterfaceReader, pid: u32) -> ProcessStatus {
    let extracted = reader.read(&reader.pid_file(pid, "status"), &PID_STATUS);
    ProcessStatus {
        name: extracted.text("name"),
        uid: extracted.unsigned("uid"),
        resident_kb: extracted.unsigned("vm_rss_kb"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procfs::{Absence, SourcePaths};
    use tempfile::tempdir;

    #[test]
    fn test_kernel_thread_has_no_resident_memory() {
        let dir = tempdir().expect("Failed to create temp dir");
        let pid_dir = dir.path().join("proc/2");
        std::fs::create_dir_all(&pid_dir).unwrap();
        std::fs::write(
            pid_dir.join("status"),
            "Name:\tkthreadd\nState:\tS (sleeping)\nUid:\t0\t0\t0\t0\n",
        )
        .unwrap();
        let reader = TextInterfaceReader::new(SourcePaths::rooted_at(dir.path()));

        let status = read_process_status(&reader, 2);
        assert_eq!(status.name, Field::Present("kthreadd".to_string()));
        assert_eq!(status.uid, Field::Present(0));
        assert_eq!(status.resident_kb, Field::Absent(Absence::NotFound));
    }
}

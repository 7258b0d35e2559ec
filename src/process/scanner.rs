//! Process discovery and filtering.
//!
//! Every numeric entry of the process registry is a candidate live process.
//! No readability check is done here: a process that exits after this point
//! still gets a record, with default fields.

use serde::{Deserialize, Serialize};

use crate::procfs::TextInterfaceReader;

/// Enumerates process ids, ascending, optionally capped at `max` entries.
pub fn collect_proc_entries(reader: &TextInterfaceReader, max: Option<usize>) -> Vec<u32> {
    let mut pids = reader.list_pids();
    if let Some(maxp) = max {
        pids.truncate(maxp);
    }
    pids
}

/// Command substring filters. Exclude takes priority over include.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessFilter {
    pub include_names: Option<Vec<String>>,
    pub exclude_names: Option<Vec<String>>,
}

impl ProcessFilter {
    pub fn is_empty(&self) -> bool {
        self.include_names.as_ref().map_or(true, |v| v.is_empty())
            && self.exclude_names.as_ref().map_or(true, |v| v.is_empty())
    }

    /// Determines if a process should be included based on its command.
    pub fn should_include(&self, command: &str) -> bool {
        if let Some(ex) = &self.exclude_names {
            if ex.iter().any(|s| command.contains(s.as_str())) {
                return false;
            }
        }
        if let Some(inc) = &self.include_names {
            if !inc.is_empty() {
                return inc.iter().any(|s| command.contains(s.as_str()));
            }
        }
        true
    }
}

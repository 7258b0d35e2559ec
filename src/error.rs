//! Error taxonomy for kernel text interface reads.
//!
//! None of these errors are fatal to a snapshot. The reader and the process
//! builder convert them into absent fields and log them at `debug` level.

use std::io;
use std::path::PathBuf;

use crate::procfs::Absence;

/// Failure to obtain a value from a kernel text interface.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Source {path} is missing or unreadable: {source}")]
    MissingSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Field {field} has malformed value {value:?}")]
    MalformedField { field: String, value: String },

    #[error("Process {pid} vanished during collection")]
    VanishedProcess { pid: u32 },
}

impl SourceError {
    /// The field-level absence this error degrades to.
    pub fn absence(&self) -> Absence {
        match self {
            SourceError::MissingSource { .. } | SourceError::VanishedProcess { .. } => {
                Absence::MissingSource
            }
            SourceError::MalformedField { .. } => Absence::Malformed,
        }
    }
}

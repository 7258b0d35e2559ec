//! File access for kernel text interfaces.
//!
//! Every read is a single blocking attempt. A file that is missing or
//! unreadable (for instance because the process exited between enumeration
//! and read) yields absent fields, never an error to the caller.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::field::{Absence, Field};
use super::schema::{Extracted, Schema};
use crate::error::SourceError;

pub const DEFAULT_PROC_ROOT: &str = "/proc";
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";
pub const DEFAULT_PASSWD: &str = "/etc/passwd";

/// Locations of the interfaces read outside the per-process tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePaths {
    /// Process registry and kernel interfaces (default: /proc)
    #[serde(default = "default_proc_root")]
    pub proc_root: PathBuf,

    /// OS release descriptor (default: /etc/os-release)
    #[serde(default = "default_os_release")]
    pub os_release: PathBuf,

    /// User registry (default: /etc/passwd)
    #[serde(default = "default_passwd")]
    pub passwd: PathBuf,
}

fn default_proc_root() -> PathBuf {
    PathBuf::from(DEFAULT_PROC_ROOT)
}
fn default_os_release() -> PathBuf {
    PathBuf::from(DEFAULT_OS_RELEASE)
}
fn default_passwd() -> PathBuf {
    PathBuf::from(DEFAULT_PASSWD)
}

impl Default for SourcePaths {
    fn default() -> Self {
        Self {
            proc_root: default_proc_root(),
            os_release: default_os_release(),
            passwd: default_passwd(),
        }
    }
}

impl SourcePaths {
    /// All sources rooted under a single directory, laid out as
    /// `<root>/proc`, `<root>/etc/os-release` and `<root>/etc/passwd`.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            proc_root: root.join("proc"),
            os_release: root.join("etc").join("os-release"),
            passwd: root.join("etc").join("passwd"),
        }
    }
}

/// Reads kernel text interfaces and applies field schemas to them.
#[derive(Debug, Clone)]
pub struct TextInterfaceReader {
    paths: SourcePaths,
}

impl TextInterfaceReader {
    pub fn new(paths: SourcePaths) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &SourcePaths {
        &self.paths
    }

    /// Path of a system-wide interface under the proc root, e.g. `meminfo`.
    pub fn proc_file(&self, name: &str) -> PathBuf {
        self.paths.proc_root.join(name)
    }

    pub fn pid_dir(&self, pid: u32) -> PathBuf {
        self.paths.proc_root.join(pid.to_string())
    }

    pub fn pid_file(&self, pid: u32, name: &str) -> PathBuf {
        self.pid_dir(pid).join(name)
    }

    /// Reads an interface as text.
    pub fn read_source(&self, path: &Path) -> Result<String, SourceError> {
        fs::read_to_string(path).map_err(|source| SourceError::MissingSource {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads an interface and extracts every field of `schema`.
    pub fn read(&self, path: &Path, schema: &'static Schema) -> Extracted {
        match self.read_source(path) {
            Ok(content) => schema.extract(&content),
            Err(e) => {
                debug!("{} unavailable: {}", schema.interface, e);
                schema.absent(e.absence())
            }
        }
    }

    /// Reads an interface as raw bytes (NUL-separated files such as cmdline).
    pub fn read_raw(&self, path: &Path) -> Field<Vec<u8>> {
        match fs::read(path) {
            Ok(bytes) => Field::Present(bytes),
            Err(e) => {
                debug!("Failed to read {}: {}", path.display(), e);
                Field::Absent(Absence::MissingSource)
            }
        }
    }

    /// Numeric entries of the process registry, ascending.
    pub fn list_pids(&self) -> Vec<u32> {
        let entries = match fs::read_dir(&self.paths.proc_root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(
                    "Cannot enumerate {}: {}",
                    self.paths.proc_root.display(),
                    e
                );
                return Vec::new();
            }
        };

        let mut pids: Vec<u32> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                if name.is_empty() || !name.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                name.parse().ok()
            })
            .collect();
        pids.sort_unstable();
        pids
    }
}

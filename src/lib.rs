//! sysnap: point-in-time system snapshot engine
//!
//! This library reads Linux kernel text interfaces (`/proc` and friends),
//! derives CPU and memory utilization and per-process statistics, and
//! returns them as an immutable, sorted [`snapshot::SystemSnapshot`].
//!
//! # Features
//!
//! - **Declarative parsing**: every interface is a table of field selectors
//!   (`procfs::schema`), and each field is either present or absent with a reason
//! - **Delta-based CPU utilization**: the collector carries the previous
//!   aggregate jiffy sample between refreshes
//! - **Resilient**: missing files, malformed numbers and vanished processes
//!   degrade single fields to defaults, never the whole snapshot
//!
//! # Usage
//!
//! ```rust,no_run
//! use sysnap::procfs::{SourcePaths, TextInterfaceReader};
//! use sysnap::snapshot::{CollectorSettings, SnapshotCollector};
//!
//! let reader = TextInterfaceReader::new(SourcePaths::default());
//! let mut collector = SnapshotCollector::new(reader, CollectorSettings::default());
//!
//! // First refresh primes the CPU sample; the second reports an interval ratio
//! collector.refresh();
//! std::thread::sleep(std::time::Duration::from_millis(500));
//! let snapshot = collector.refresh();
//!
//! println!("CPU {:.1}%", snapshot.cpu_utilization() * 100.0);
//! for process in snapshot.processes.iter().take(5) {
//!     println!("{} {} {}", process.pid(), process.user(), process.command());
//! }
//! ```

pub mod error;
pub mod format;
pub mod process;
pub mod procfs;
pub mod snapshot;
pub mod system;
pub mod utilization;

// Re-export main types for convenience
pub use error::SourceError;
pub use process::ProcessRecord;
pub use snapshot::{CollectorSettings, SnapshotCollector, SortKey, SortOrder, SystemSnapshot};
pub use utilization::{CpuBasis, CpuReading, CpuSample, FirstSample, UtilizationCalculator};

//! CLI command implementations for sysnap.
//!
//! This module provides implementations for all CLI subcommands:
//! - `snapshot`: One snapshot, printed as table/JSON/YAML
//! - `watch`: Repeated refreshes on an interval
//! - `check`: Interface readability validation
//! - `config`: Configuration file generation

pub mod check;
pub mod config;
pub mod snapshot;
pub mod watch;

// Re-export command functions
pub use check::command_check;
pub use config::command_config;
pub use snapshot::command_snapshot;
pub use watch::command_watch;

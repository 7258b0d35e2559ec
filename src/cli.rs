//! CLI arguments and subcommands for sysnap.
//!
//! This module defines the command-line interface structure using the clap library,
//! including all flags, options, and subcommands.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use sysnap::snapshot::SortKey;
use sysnap::utilization::FirstSample;

/// Log level options for CLI parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Configuration format options for output
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Snapshot output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

/// Main CLI arguments structure
#[derive(Parser, Debug)]
#[command(
    name = "sysnap",
    about = "Point-in-time CPU, memory and per-process snapshots from /proc",
    long_about = "Point-in-time CPU, memory and per-process snapshots from /proc.\n\n\
                  Reads kernel text interfaces directly, derives CPU utilization from two \
                  samples of the aggregate jiffy counters and lists processes sorted by CPU share.",
    version,
    propagate_version = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Log level (overrides config, default: info)
    #[arg(long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Config file (YAML/JSON/TOML)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Disable all config file loading
    #[arg(long)]
    pub no_config: bool,

    /// Print effective merged config and exit
    #[arg(long)]
    pub show_config: bool,

    /// Output format for --show-config
    #[arg(long, value_enum, default_value = "yaml")]
    pub config_format: ConfigFormat,

    /// Validate config and exit (return code 1 on error)
    #[arg(long)]
    pub check_config: bool,

    /// Process registry directory (default: /proc)
    #[arg(long)]
    pub proc_root: Option<PathBuf>,

    /// OS release descriptor (default: /etc/os-release)
    #[arg(long)]
    pub os_release: Option<PathBuf>,

    /// User registry (default: /etc/passwd)
    #[arg(long)]
    pub passwd: Option<PathBuf>,

    /// Refresh interval in milliseconds
    #[arg(short = 'i', long)]
    pub interval_ms: Option<u64>,

    /// CPU utilization reported before a second sample exists
    #[arg(long, value_enum)]
    pub first_cpu_sample: Option<FirstSample>,

    /// Sort processes by this column
    #[arg(short = 's', long, value_enum)]
    pub sort: Option<SortKey>,

    /// Sort ascending instead of descending
    #[arg(long)]
    pub ascending: bool,

    /// Number of processes to display in table output
    #[arg(short = 'n', long)]
    pub top_n: Option<usize>,

    /// Maximum number of processes to scan
    #[arg(long)]
    pub max_processes: Option<usize>,

    /// Include only processes whose command contains these names (comma-separated)
    #[arg(long)]
    pub include_names: Option<String>,

    /// Exclude processes whose command contains these names (comma-separated)
    #[arg(long)]
    pub exclude_names: Option<String>,
}

/// Subcommands for additional functionality
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take one snapshot and print it (default)
    Snapshot {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: OutputFormat,

        /// Skip the priming sample; CPU utilization is then averaged since boot
        #[arg(long)]
        no_warmup: bool,
    },

    /// Refresh repeatedly and print each snapshot
    Watch {
        /// Number of refreshes (0 = until interrupted)
        #[arg(long, default_value_t = 0)]
        count: usize,

        /// Output format
        #[arg(short = 'f', long, value_enum, default_value = "table")]
        format: OutputFormat,
    },

    /// Check that every kernel interface is readable
    Check,

    /// Generate configuration files
    Config {
        /// Output file path ("-" for stdout)
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: ConfigFormat,

        /// Include comments and examples
        #[arg(long)]
        commented: bool,
    },
}

//! Config command implementation.
//!
//! Generates configuration files in various formats.

use anyhow::Context;
use std::fs;
use std::path::PathBuf;

use crate::cli::ConfigFormat;
use crate::config::{render_config, Config};

/// Generates configuration files.
pub fn command_config(
    output: Option<PathBuf>,
    format: ConfigFormat,
    commented: bool,
) -> anyhow::Result<()> {
    let config = Config::default();
    let output = output.unwrap_or_else(|| PathBuf::from("sysnap.yaml"));

    let mut content = render_config(&config, format)
        .map_err(|e| anyhow::anyhow!("Failed to render configuration: {}", e))?;
    if commented && matches!(format, ConfigFormat::Yaml) {
        content = add_config_comments(content);
    }

    if output.to_string_lossy() == "-" {
        print!("{}", content);
    } else {
        fs::write(&output, content)
            .with_context(|| format!("Failed to write {}", output.display()))?;
        println!("✅ Configuration written to: {}", output.display());
    }

    Ok(())
}

/// Adds comments to YAML configuration.
fn add_config_comments(yaml: String) -> String {
    let comments = r#"# sysnap Configuration
# ====================
#
# Refresh
# -------
# refresh_interval_ms: 1000     # Time between refreshes (snapshot warmup, watch)
# first_cpu_sample: since_boot  # CPU ratio before a second sample: since_boot | zero
#
# Ordering and Output
# -------------------
# sort_key: cpu                 # cpu, memory, pid, age, user, command
# sort_descending: true         # Ties are always broken by pid ascending
# top_n: 20                     # Rows shown in table output
#
# Process Selection
# -----------------
# include_names: null           # Only commands containing one of these
# exclude_names: null           # Drop commands containing one of these (wins)
# max_processes: null           # Cap on enumerated pids
#
# Logging
# -------
# log_level: "info"             # off, error, warn, info, debug, trace
#
# Interface Locations
# -------------------
# sources:
#   proc_root: /proc
#   os_release: /etc/os-release
#   passwd: /etc/passwd
"#;

    format!("{comments}\n{yaml}")
}

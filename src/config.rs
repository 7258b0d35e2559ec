//! Configuration management for sysnap.
//!
//! This module handles loading, merging, and validating configuration from files
//! and CLI arguments. It supports YAML, JSON, and TOML formats.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use sysnap::process::{ProcessFilter, CLK_TCK};
use sysnap::procfs::{SourcePaths, TextInterfaceReader};
use sysnap::snapshot::{CollectorSettings, SortKey, SortOrder};
use sysnap::utilization::FirstSample;

use crate::cli::{Args, ConfigFormat};

// Default configuration constants
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_TOP_N: usize = 20;

/// Effective configuration. `None` means "use the default".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Refresh
    #[serde(alias = "refresh-interval-ms")]
    pub refresh_interval_ms: Option<u64>,
    /// "since_boot" | "zero"
    #[serde(alias = "first-cpu-sample")]
    pub first_cpu_sample: Option<FirstSample>,

    // Ordering and output
    #[serde(alias = "sort-key")]
    pub sort_key: Option<SortKey>,
    #[serde(alias = "sort-descending")]
    pub sort_descending: Option<bool>,
    #[serde(alias = "top-n")]
    pub top_n: Option<usize>,

    // Process selection
    #[serde(alias = "include-names")]
    pub include_names: Option<Vec<String>>,
    #[serde(alias = "exclude-names")]
    pub exclude_names: Option<Vec<String>>,
    #[serde(alias = "max-processes")]
    pub max_processes: Option<usize>,

    // Logging
    #[serde(alias = "log-level")]
    pub log_level: Option<String>,

    // Interface locations (kept last: TOML tables must follow plain values)
    #[serde(default)]
    pub sources: SourcePaths,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: Some(DEFAULT_REFRESH_INTERVAL_MS),
            first_cpu_sample: Some(FirstSample::SinceBoot),
            sort_key: Some(SortKey::Cpu),
            sort_descending: Some(true),
            top_n: Some(DEFAULT_TOP_N),
            include_names: None,
            exclude_names: None,
            max_processes: None,
            log_level: Some("info".into()),
            sources: SourcePaths::default(),
        }
    }
}

impl Config {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(
            self.refresh_interval_ms
                .unwrap_or(DEFAULT_REFRESH_INTERVAL_MS),
        )
    }

    pub fn top_n(&self) -> usize {
        self.top_n.unwrap_or(DEFAULT_TOP_N)
    }

    pub fn reader(&self) -> TextInterfaceReader {
        TextInterfaceReader::new(self.sources.clone())
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            sort: SortOrder {
                key: self.sort_key.unwrap_or_default(),
                descending: self.sort_descending.unwrap_or(true),
            },
            first_sample: self.first_cpu_sample.unwrap_or_default(),
            filter: ProcessFilter {
                include_names: self.include_names.clone(),
                exclude_names: self.exclude_names.clone(),
            },
            max_processes: self.max_processes,
            clk_tck: *CLK_TCK,
        }
    }
}

/// Validate effective config (used by --check-config and at startup)
pub fn validate_effective_config(cfg: &Config) -> Result<(), Box<dyn std::error::Error>> {
    if cfg.refresh_interval_ms == Some(0) {
        return Err("refresh_interval_ms must be greater than 0".into());
    }

    if cfg.top_n == Some(0) {
        return Err("top_n must be greater than 0".into());
    }

    if cfg.max_processes == Some(0) {
        return Err("max_processes must be greater than 0 when set".into());
    }

    if let Some(level) = cfg.log_level.as_deref() {
        const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];
        if !LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            return Err(format!(
                "Invalid log_level '{}', expected one of {}",
                level,
                LEVELS.join(", ")
            )
            .into());
        }
    }

    let proc_root = &cfg.sources.proc_root;
    if !proc_root.is_dir() {
        return Err(format!(
            "Process registry directory not found: {}",
            proc_root.display()
        )
        .into());
    }

    Ok(())
}

/// Splits a comma-separated CLI list.
fn split_names(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Resolves configuration from CLI args, config file, and defaults.
/// This enforces precedence: CLI (if provided) > config file > default.
pub fn resolve_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = if args.no_config {
        Config::default()
    } else {
        load_config(args.config.as_deref())?
    };

    // Interface locations
    if let Some(root) = &args.proc_root {
        config.sources.proc_root = root.clone();
    }
    if let Some(path) = &args.os_release {
        config.sources.os_release = path.clone();
    }
    if let Some(path) = &args.passwd {
        config.sources.passwd = path.clone();
    }

    // Refresh and ordering
    if let Some(ms) = args.interval_ms {
        config.refresh_interval_ms = Some(ms);
    }
    if let Some(policy) = args.first_cpu_sample {
        config.first_cpu_sample = Some(policy);
    }
    if let Some(key) = args.sort {
        config.sort_key = Some(key);
    }
    if args.ascending {
        config.sort_descending = Some(false);
    }
    if let Some(n) = args.top_n {
        config.top_n = Some(n);
    }
    if let Some(n) = args.max_processes {
        config.max_processes = Some(n);
    }

    // Parse comma-separated include/exclude names
    if let Some(include_str) = &args.include_names {
        config.include_names = Some(split_names(include_str));
    }
    if let Some(exclude_str) = &args.exclude_names {
        config.exclude_names = Some(split_names(exclude_str));
    }

    if let Some(level) = &args.log_level {
        config.log_level = Some(level.as_str().to_string());
    }

    Ok(config)
}

/// Configuration loading with multiple format support
pub fn load_config(path: Option<&Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(format!("Config file not found: {}", p.display()).into());
            }
            p.to_path_buf()
        }
        None => {
            // Try default locations
            let defaults = [
                "/etc/sysnap/sysnap.yaml",
                "/etc/sysnap/sysnap.yml",
                "/etc/sysnap/sysnap.json",
                "./sysnap.yaml",
                "./sysnap.yml",
                "./sysnap.json",
                "./sysnap.toml",
            ];

            match defaults.iter().find(|p| Path::new(p).exists()) {
                Some(found) => PathBuf::from(found),
                None => return Ok(Config::default()),
            }
        }
    };

    let content = fs::read_to_string(&path)?;
    parse_config(&content, &path)
}

fn parse_config(content: &str, path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("json") => {
            let config: Config = serde_json::from_str(content)?;
            info!("Loaded JSON configuration from: {}", path.display());
            Ok(config)
        }
        Some("toml") => {
            let config: Config = toml::from_str(content)?;
            info!("Loaded TOML configuration from: {}", path.display());
            Ok(config)
        }
        _ => {
            // Default to YAML
            let config: Config = serde_yaml::from_str(content)?;
            info!("Loaded YAML configuration from: {}", path.display());
            Ok(config)
        }
    }
}

/// Renders configuration in the requested format.
pub fn render_config(
    config: &Config,
    format: ConfigFormat,
) -> Result<String, Box<dyn std::error::Error>> {
    Ok(match format {
        ConfigFormat::Json => serde_json::to_string_pretty(config)?,
        ConfigFormat::Toml => toml::to_string_pretty(config)?,
        ConfigFormat::Yaml => serde_yaml::to_string(config)?,
    })
}

/// Shows configuration in requested format
pub fn show_config(config: &Config, format: ConfigFormat) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", render_config(config, format)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::tempdir;

    #[test]
    fn test_yaml_partial_config_keeps_source_defaults() {
        let yaml = "refresh_interval_ms: 250\nsort_key: memory\ntop-n: 5\n";
        let config = parse_config(yaml, Path::new("sysnap.yaml")).unwrap();

        assert_eq!(config.refresh_interval_ms, Some(250));
        assert_eq!(config.sort_key, Some(SortKey::Memory));
        assert_eq!(config.top_n, Some(5));
        assert_eq!(config.sources, SourcePaths::default());
        // Fields missing from the file are None, not the defaults
        assert_eq!(config.first_cpu_sample, None);
    }

    #[test]
    fn test_config_round_trips_through_every_format() {
        let config = Config::default();
        for (format, ext) in [
            (ConfigFormat::Yaml, "yaml"),
            (ConfigFormat::Json, "json"),
            (ConfigFormat::Toml, "toml"),
        ] {
            let text = render_config(&config, format).unwrap();
            let parsed = parse_config(&text, Path::new(&format!("c.{}", ext))).unwrap();
            assert_eq!(parsed.refresh_interval_ms, config.refresh_interval_ms);
            assert_eq!(parsed.sources, config.sources);
        }
    }

    #[test]
    fn test_cli_overrides_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sysnap.yaml");
        fs::write(&path, "top_n: 5\nsort_key: memory\n").unwrap();

        let args = Args::parse_from([
            "sysnap",
            "--config",
            path.to_str().unwrap(),
            "--top-n",
            "9",
            "--include-names",
            "nginx, postgres,",
            "--ascending",
        ]);
        let config = resolve_config(&args).unwrap();

        assert_eq!(config.top_n, Some(9));
        assert_eq!(config.sort_key, Some(SortKey::Memory));
        assert_eq!(config.sort_descending, Some(false));
        assert_eq!(
            config.include_names,
            Some(vec!["nginx".to_string(), "postgres".to_string()])
        );
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let dir = tempdir().unwrap();
        let mut config = Config::default();
        config.sources.proc_root = dir.path().to_path_buf();
        assert!(validate_effective_config(&config).is_ok());

        config.refresh_interval_ms = Some(0);
        assert!(validate_effective_config(&config).is_err());

        config.refresh_interval_ms = Some(100);
        config.log_level = Some("loud".into());
        assert!(validate_effective_config(&config).is_err());

        config.log_level = None;
        config.sources.proc_root = dir.path().join("missing");
        assert!(validate_effective_config(&config).is_err());
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.yaml"))).is_err());
    }
}

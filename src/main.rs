//! sysnap - version 0.1.0
//!
//! Point-in-time system snapshots with tracing logging.
//! This is the main entry point that resolves configuration and dispatches subcommands.

mod cli;
mod commands;
mod config;

use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_subscriber::filter::LevelFilter;

use cli::{Args, Commands, LogLevel, OutputFormat};
use commands::{command_check, command_config, command_snapshot, command_watch};
use config::{resolve_config, show_config, validate_effective_config, Config};

/// Initializes tracing logging subsystem with configured log level.
/// Logs go to stderr so snapshot output on stdout stays machine-readable.
fn setup_logging(config: &Config) {
    let log_level = config
        .log_level
        .as_deref()
        .and_then(|s| LogLevel::from_str(s, true).ok())
        .unwrap_or(LogLevel::Info);

    let filter = match log_level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    };

    let subscriber = tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    info!("Logging initialized with level: {:?}", log_level);
}

/// Helper function to load and validate configuration.
/// Exits the process with error code 1 if validation fails.
fn load_validated_config(args: &Args) -> Result<Config, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    if let Err(e) = validate_effective_config(&config) {
        eprintln!("❌ Configuration invalid: {}", e);
        std::process::exit(1);
    }
    Ok(config)
}

/// Main application entry point.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Early config resolution for show/check modes
    if args.show_config || args.check_config {
        let config = resolve_config(&args)?;

        if args.check_config {
            if let Err(e) = validate_effective_config(&config) {
                eprintln!("❌ Configuration invalid: {}", e);
                std::process::exit(1);
            }
            println!("✅ Configuration is valid");
            return Ok(());
        }

        return show_config(&config, args.config_format);
    }

    // Config generation doesn't need a valid effective config
    if let Some(Commands::Config {
        output,
        format,
        commented,
    }) = &args.command
    {
        return Ok(command_config(output.clone(), *format, *commented)?);
    }

    let config = load_validated_config(&args)?;
    setup_logging(&config);

    info!("Starting sysnap with interfaces under {}", config.sources.proc_root.display());

    match &args.command {
        None => command_snapshot(&config, OutputFormat::Table, true)?,
        Some(Commands::Snapshot { format, no_warmup }) => {
            command_snapshot(&config, *format, !*no_warmup)?
        }
        Some(Commands::Watch { count, format }) => command_watch(&config, *count, *format)?,
        Some(Commands::Check) => {
            if !command_check(&config)? {
                std::process::exit(1);
            }
        }
        Some(Commands::Config { .. }) => unreachable!("Config handled above"),
    }

    Ok(())
}

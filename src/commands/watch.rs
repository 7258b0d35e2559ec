//! Watch command implementation.
//!
//! Refreshes on a fixed interval and prints every snapshot. Refreshes run
//! sequentially on the calling thread; the next one starts only after the
//! previous snapshot has been printed.

use std::io::{self, Write};
use std::thread;
use std::time::Instant;
use tracing::info;

use sysnap::snapshot::SnapshotCollector;

use crate::cli::OutputFormat;
use crate::commands::snapshot::render_snapshot;
use crate::config::Config;

pub fn command_watch(config: &Config, count: usize, format: OutputFormat) -> anyhow::Result<()> {
    let mut collector = SnapshotCollector::new(config.reader(), config.collector_settings());
    let interval = config.refresh_interval();
    info!("Watching every {:?} ({} refreshes)", interval, if count == 0 { "unlimited".to_string() } else { count.to_string() });

    let mut iteration = 0usize;
    loop {
        let started = Instant::now();
        let snapshot = collector.refresh();
        iteration += 1;

        let rendered = render_snapshot(&snapshot, format, config.top_n())?;
        let mut stdout = io::stdout().lock();
        if format == OutputFormat::Table {
            writeln!(stdout, "── refresh {} at {} ──", iteration, snapshot.taken_at.format("%H:%M:%S"))?;
        }
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
        drop(stdout);

        if count != 0 && iteration >= count {
            return Ok(());
        }

        if let Some(remaining) = interval.checked_sub(started.elapsed()) {
            thread::sleep(remaining);
        }
    }
}

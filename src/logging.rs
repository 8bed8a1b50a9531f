use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

const LOG_ENV: &str = "BUDGETVIEW_LOG";

fn default_directive(tui: bool) -> &'static str {
    if tui {
        "budgetview=info"
    } else {
        "budgetview=warn"
    }
}

fn filter(tui: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(tui)))
}

/// The TUI owns the terminal, so it logs to a file; CLI runs log to stderr.
pub(crate) fn init(config: &Config, tui: bool) -> Result<()> {
    if !tui {
        tracing_subscriber::registry()
            .with(filter(false))
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
        return Ok(());
    }

    // Without a writable log file the TUI simply runs unlogged.
    let Some(file) = config.log_path.as_deref().and_then(|p| open_log_file(p).ok()) else {
        return Ok(());
    };
    tracing_subscriber::registry()
        .with(filter(true))
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "budgetview starting");
    Ok(())
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory: {}", dir.display()))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod logging_tests;

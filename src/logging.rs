//! Tracing subscriber setup.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const LOG_ENV: &str = "TASKDECK_LOG";

/// Where log lines go.
pub enum LogTarget<'a> {
    Stderr,
    /// Append to a file. Used by the TUI, which owns the terminal.
    File(&'a Path),
}

/// Install the global subscriber. `TASKDECK_LOG` wins over `default_filter`.
pub fn init_tracing(default_filter: &str, target: LogTarget<'_>) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match target {
        LogTarget::Stderr => {
            registry.with(fmt::layer().compact().with_writer(std::io::stderr)).init();
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => {
                    registry
                        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                        .init();
                }
                // No log file, no logging: stderr would draw over the UI.
                Err(_) => registry.init(),
            }
        }
    }
}

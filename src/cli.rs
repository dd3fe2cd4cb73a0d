use std::path::PathBuf;

use clap::Parser;

use crate::cmd::Commands;

/// Local task manager with a terminal UI.
/// Tasks are stored in `<data-dir>/<key>.json`.
#[derive(Parser)]
#[command(name = "taskdeck", version, about = "Organize your work and life with clear tasks")]
pub struct Cli {
    /// Directory holding the task data (overrides the config file).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage key, i.e. which task list to use (overrides the config file).
    #[arg(long, global = true)]
    pub key: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

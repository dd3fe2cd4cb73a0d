//! # taskdeck - a local task manager
//!
//! A small task manager with a terminal user interface (TUI) and a scriptable
//! command line. Tasks carry a title, description, priority, category, status
//! and an optional due date.
//!
//! ## Key Features
//!
//! - **One Screen**: an "Add New Task" form beside the task list, with inline
//!   editing, status changes and deletion from the list
//! - **Overdue Tracking**: open tasks past their due date are flagged in red
//! - **Local Storage**: one JSON file per storage key, rewritten atomically
//!   after every change
//! - **Scriptable**: every TUI action has a CLI counterpart
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the UI
//! taskdeck ui
//!
//! # Add a task via CLI
//! taskdeck add "Buy milk" --priority high --category Shopping --due tomorrow
//!
//! # List open tasks, soonest due first
//! taskdeck list --open --sort due
//!
//! # Complete it
//! taskdeck complete 1760572800000
//! ```
//!
//! Data is stored in the platform data directory (`taskdeck/tasks.json`)
//! unless `--data-dir` or the `[storage]` section of the config file says
//! otherwise. Set `TASKDECK_LOG` to change the log filter.

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, warn};

pub mod cli;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod logging;
pub mod nav;
pub mod persist;
pub mod store;
pub mod task;
pub mod view;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod run;
    pub mod task_form;
    pub mod utils;
}

use cli::Cli;
use cmd::*;
use config::Config;
use logging::{init_tracing, LogTarget};
use persist::FileKv;
use store::TaskStore;

fn main() {
    let cli = Cli::parse();

    let (config, config_err) = match Config::load() {
        Ok(c) => (c, None),
        Err(e) => (Config::default(), Some(e)),
    };

    let data_dir: PathBuf = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());

    // The TUI owns the terminal, so its log lines go to a file.
    match cli.command {
        Commands::Ui => {
            let log_path = data_dir.join("taskdeck.log");
            init_tracing(&config.log.filter, LogTarget::File(&log_path));
        }
        _ => init_tracing(&config.log.filter, LogTarget::Stderr),
    }
    if let Some(e) = config_err {
        warn!("{e}; using default configuration");
    }

    // Commands that don't touch the task list.
    match &cli.command {
        Commands::Nav => {
            cmd_nav();
            return;
        }
        Commands::Config => {
            cmd_config(&config);
            return;
        }
        Commands::Completions { shell } => {
            cmd_completions(*shell);
            return;
        }
        _ => {}
    }

    let key = cli.key.clone().unwrap_or_else(|| config.storage.key.clone());
    let mut store = TaskStore::open(FileKv::open(&data_dir), &key);
    debug!(dir = %store.backend().dir().display(), key = store.key(), "task list selected");

    match cli.command {
        Commands::Ui => {
            if let Err(e) = tui::run::run_tui(store, &config) {
                eprintln!("UI error: {e}");
                std::process::exit(1);
            }
        }

        Commands::Add { title, desc, priority, category, due } =>
            cmd_add(&mut store, title, desc, priority, category, due),

        Commands::List { status, priority, category, overdue, open, search, sort, limit } =>
            cmd_list(&store, &config, status, priority, category, overdue, open, search, sort, limit),

        Commands::View { id } => cmd_view(&store, id),

        Commands::Edit { id, title, desc, priority, category, due, clear_due } =>
            cmd_edit(&mut store, id, title, desc, priority, category, due, clear_due),

        Commands::Start { id } => cmd_set_status(&mut store, id, fields::Status::InProgress),
        Commands::Complete { id } => cmd_set_status(&mut store, id, fields::Status::Completed),
        Commands::Reopen { id } => cmd_set_status(&mut store, id, fields::Status::Pending),

        Commands::Delete { id } => cmd_delete(&mut store, id),

        Commands::Nav | Commands::Config | Commands::Completions { .. } =>
            unreachable!("handled before the store is opened"),
    }
}

//! Command implementations for the CLI interface.
//!
//! Each handler drives the same `TaskStore` the terminal UI uses. Handlers
//! report failures on stderr and exit non-zero.

use chrono::{Local, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};
use tracing::error;

use crate::config::Config;
use crate::fields::*;
use crate::nav::{MENU_ITEMS, SOCIAL_LINKS};
use crate::persist::KeyValueStore;
use crate::store::TaskStore;
use crate::task::{Task, TaskId};
use crate::tui::task_form::TaskForm;
use crate::view::*;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// What needs to be done.
        title: String,
        /// Details, notes, or instructions.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: low | medium | high | urgent.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Category label (Work, Personal, Shopping, Health, Learning, Other, ...).
        #[arg(long)]
        category: Option<String>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or "in Nw".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks with optional filters.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by category.
        #[arg(long)]
        category: Option<String>,
        /// Only overdue tasks.
        #[arg(long)]
        overdue: bool,
        /// Hide completed tasks.
        #[arg(long)]
        open: bool,
        /// Case-insensitive text search in title and description.
        #[arg(long)]
        search: Option<String>,
        /// Sort key (defaults to the configured one).
        #[arg(long, value_enum)]
        sort: Option<SortKey>,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show a single task.
    View {
        id: TaskId,
    },

    /// Edit fields on a task.
    Edit {
        id: TaskId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark a task in progress.
    Start {
        id: TaskId,
    },

    /// Mark a task completed.
    Complete {
        id: TaskId,
    },

    /// Reopen a task (status pending).
    Reopen {
        id: TaskId,
    },

    /// Delete a task.
    Delete {
        id: TaskId,
    },

    /// Show the navigation menu and links.
    Nav,

    /// Print the effective configuration.
    Config,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn fail(msg: impl std::fmt::Display) -> ! {
    error!("{msg}");
    eprintln!("{msg}");
    std::process::exit(1);
}

/// Add a new task through the task form.
pub fn cmd_add<S: KeyValueStore>(
    store: &mut TaskStore<S>,
    title: String,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
    due: Option<String>,
) {
    let today = Local::now().date_naive();
    let mut form = TaskForm::new();
    form.title.set(&title);
    form.description.set(desc.as_deref().unwrap_or(""));
    if let Some(p) = priority {
        form.select_priority(p);
    }
    if let Some(c) = category {
        form.select_category(&c);
    }
    form.due.set(due.as_deref().unwrap_or(""));

    match form.submit(store, today) {
        Ok(task) => println!("Added task {}", task.id),
        Err(e) => fail(format!("Failed to add task: {e}")),
    }
}

/// List tasks with optional filtering and sorting.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list<S: KeyValueStore>(
    store: &TaskStore<S>,
    config: &Config,
    status: Option<Status>,
    priority: Option<Priority>,
    category: Option<String>,
    overdue: bool,
    open: bool,
    search: Option<String>,
    sort: Option<SortKey>,
    limit: Option<usize>,
) {
    let today = Local::now().date_naive();
    let filter = TaskFilter {
        status,
        priority,
        category,
        overdue_only: overdue,
        hide_completed: open || !config.display.show_completed,
        text: search,
    };
    let mut rows = visible_tasks(store.tasks(), &filter, sort.unwrap_or(config.display.sort), today);
    if let Some(n) = limit {
        rows.truncate(n);
    }
    if rows.is_empty() {
        if store.is_empty() {
            println!("No tasks yet. Add a task to get started.");
        } else {
            println!("No tasks match.");
        }
        return;
    }
    print_table(&rows, today);
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task], today: chrono::NaiveDate) {
    println!(
        "{:<14} {:<12} {:<8} {:<10} {:<22} {}",
        "ID", "Status", "Pri", "Category", "Due", "Title"
    );
    for t in tasks {
        let due = due_label(t, today).unwrap_or_else(|| "-".into());
        println!(
            "{:<14} {:<12} {:<8} {:<10} {:<22} {}",
            t.id,
            status_label(t.status),
            priority_label(t.priority),
            truncate(&t.category, 10),
            due,
            t.title
        );
    }
}

/// Show every field of a task.
pub fn cmd_view<S: KeyValueStore>(store: &TaskStore<S>, id: TaskId) {
    let Some(t) = store.get(id) else {
        fail(format!("Task {id} not found."));
    };
    let now = Utc::now();
    let today = Local::now().date_naive();
    println!("{}  [{}]", t.title, t.id);
    println!("  Status:    {}", status_label(t.status));
    println!("  Priority:  {}", priority_label(t.priority));
    println!("  Category:  {}", t.category);
    println!("  Created:   {} ({})", t.created_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"), relative_time(t.created_at, now));
    if let Some(label) = due_label(t, today) {
        println!("  {label}");
    }
    if let Some(done) = t.completed_at {
        println!("  Completed {}", relative_time(done, now));
    }
    if !t.description.is_empty() {
        println!();
        for line in t.description.lines() {
            println!("  {line}");
        }
    }
}

/// Update fields on a task through the inline-edit form.
#[allow(clippy::too_many_arguments)]
pub fn cmd_edit<S: KeyValueStore>(
    store: &mut TaskStore<S>,
    id: TaskId,
    title: Option<String>,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<String>,
    due: Option<String>,
    clear_due: bool,
) {
    let Some(task) = store.get(id) else {
        fail(format!("Task {id} not found."));
    };
    let mut form = TaskForm::from_task(task);
    if let Some(t) = title {
        form.title.set(&t);
    }
    if let Some(d) = desc {
        form.description.set(&d);
    }
    if let Some(p) = priority {
        form.select_priority(p);
    }
    if let Some(c) = category {
        form.select_category(&c);
    }
    if let Some(d) = due {
        form.due.set(&d);
    }
    if clear_due {
        form.due.clear();
    }

    let today = Local::now().date_naive();
    match form.save_edit(store, id, today) {
        Ok(()) => println!("Updated {id}"),
        Err(e) => fail(format!("Edit rejected: {e}")),
    }
}

/// Move a task to `status`.
pub fn cmd_set_status<S: KeyValueStore>(store: &mut TaskStore<S>, id: TaskId, status: Status) {
    match store.set_status(id, status) {
        Ok(true) => println!("{} is now {}", id, status_label(status).to_lowercase()),
        Ok(false) => fail(format!("Task {id} not found.")),
        Err(e) => fail(format!("Failed to save tasks: {e}")),
    }
}

/// Delete a task. Deleting a task that does not exist is not an error.
pub fn cmd_delete<S: KeyValueStore>(store: &mut TaskStore<S>, id: TaskId) {
    match store.remove(id) {
        Ok(true) => println!("Deleted."),
        Ok(false) => println!("Nothing to delete: task {id} not found."),
        Err(e) => fail(format!("Failed to save tasks: {e}")),
    }
}

/// Print the navigation menu.
pub fn cmd_nav() {
    println!("{:<10} {:<10}", "Page", "Path");
    for route in MENU_ITEMS {
        let note = if route.is_wired() { "" } else { "(not available yet)" };
        println!("{:<10} {:<10} {}", route.label(), route.path(), note);
    }
    println!();
    for link in SOCIAL_LINKS {
        println!("{:<10} {}", link.label, link.href);
    }
}

/// Print the effective configuration as TOML.
pub fn cmd_config(config: &Config) {
    if let Some(path) = Config::config_path() {
        println!("# {}", path.display());
    }
    println!("# data dir: {}", config.data_dir().display());
    print!("{}", config.to_toml());
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

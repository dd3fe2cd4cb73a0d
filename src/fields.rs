//! Enumerations and field types for tasks.
//!
//! This module defines the structured values a task carries: its priority and
//! status, plus the sort keys the list views understand.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How pressing a task is.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// All priorities in ascending order, as offered by the form selector.
    pub const ALL: [Priority; 4] = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];
}

/// Task completion status.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    Pending,
    InProgress,
    Completed,
}

impl Status {
    pub fn is_completed(self) -> bool {
        self == Status::Completed
    }
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Storage order: most recently created first.
    #[default]
    Created,
    Due,
    Priority,
}

/// Categories offered by the task form. An unselected category is stored as
/// [`DEFAULT_CATEGORY`].
pub const CATEGORIES: [&str; 6] = ["Work", "Personal", "Shopping", "Health", "Learning", "Other"];

pub const DEFAULT_CATEGORY: &str = "General";

/// Normalise a category label: trimmed, falling back to [`DEFAULT_CATEGORY`].
pub fn normalise_category(s: &str) -> String {
    let s = s.trim();
    if s.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        s.to_string()
    }
}

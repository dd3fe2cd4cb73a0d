//! Display derivations for task lists.
//!
//! Everything here is a pure function of a task and the current time. None of
//! it is persisted and none of it feeds back into the store.

use chrono::{DateTime, NaiveDate, Utc};

use crate::fields::*;
use crate::task::Task;

/// True when the task has a due date before `today` and is not completed.
/// Only the date is compared, so a task due today is never overdue.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    match task.due_date {
        Some(due) => !task.status.is_completed() && due < today,
        None => false,
    }
}

/// Sort rank for a priority, higher is more pressing.
pub fn priority_rank(p: Priority) -> u8 {
    match p {
        Priority::Low => 0,
        Priority::Medium => 1,
        Priority::High => 2,
        Priority::Urgent => 3,
    }
}

/// Format a priority for display.
pub fn priority_label(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
        Priority::Urgent => "Urgent",
    }
}

/// Format a status for display.
pub fn status_label(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::InProgress => "In-progress",
        Status::Completed => "Completed",
    }
}

/// `Oct 16, 2026`
pub fn format_date(d: NaiveDate) -> String {
    d.format("%b %-d, %Y").to_string()
}

/// `Fri, Oct 16`, the short preview shown under the form.
pub fn format_date_short(d: NaiveDate) -> String {
    d.format("%a, %b %-d").to_string()
}

/// Due-date caption for a task, or `None` when it has no due date.
pub fn due_label(task: &Task, today: NaiveDate) -> Option<String> {
    let due = task.due_date?;
    let prefix = if is_overdue(task, today) { "Overdue" } else { "Due" };
    Some(format!("{}: {}", prefix, format_date(due)))
}

/// Human phrase for the distance between `then` and `now`: "a few seconds
/// ago", "3 hours ago", "in 2 days".
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    let phrase = distance_phrase(secs.unsigned_abs());
    if secs >= 0 {
        format!("{phrase} ago")
    } else {
        format!("in {phrase}")
    }
}

fn distance_phrase(secs: u64) -> String {
    // Rounded division, so 90 minutes reads "2 hours" rather than "1 hours".
    let round = |n: u64, d: u64| (n + d / 2) / d;
    let minutes = round(secs, 60);
    let hours = round(secs, 3_600);
    let days = round(secs, 86_400);
    match secs {
        0..=44 => "a few seconds".to_string(),
        45..=89 => "a minute".to_string(),
        _ if secs < 45 * 60 => format!("{minutes} minutes"),
        _ if secs < 90 * 60 => "an hour".to_string(),
        _ if secs < 22 * 3_600 => format!("{hours} hours"),
        _ if secs < 36 * 3_600 => "a day".to_string(),
        _ if secs < 26 * 86_400 => format!("{days} days"),
        _ if secs < 46 * 86_400 => "a month".to_string(),
        _ if secs < 320 * 86_400 => format!("{} months", ((days as f64) / 30.44).round().max(2.0) as u64),
        _ if secs < 548 * 86_400 => "a year".to_string(),
        _ => format!("{} years", ((days as f64) / 365.25).round().max(2.0) as u64),
    }
}

/// Criteria for narrowing a task list.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<String>,
    pub overdue_only: bool,
    pub hide_completed: bool,
    /// Case-insensitive substring of title or description.
    pub text: Option<String>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if let Some(s) = self.status {
            if task.status != s {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        if let Some(c) = &self.category {
            if !task.category.eq_ignore_ascii_case(c.trim()) {
                return false;
            }
        }
        if self.overdue_only && !is_overdue(task, today) {
            return false;
        }
        if self.hide_completed && task.status.is_completed() {
            return false;
        }
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            if !task.title.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Apply `filter` and order the survivors by `sort`. The store's own order
/// (newest first) breaks ties.
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter, sort: SortKey, today: NaiveDate) -> Vec<&'a Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t, today)).collect();
    match sort {
        SortKey::Created => {}
        // Tasks without a due date go last.
        SortKey::Due => out.sort_by_key(|t| (t.due_date.is_none(), t.due_date)),
        SortKey::Priority => out.sort_by_key(|t| std::cmp::Reverse(priority_rank(t.priority))),
    }
    out
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn task(status: Status, due: Option<NaiveDate>) -> Task {
        Task {
            id: 1,
            title: "t".into(),
            description: String::new(),
            priority: Priority::Medium,
            category: "General".into(),
            status,
            created_at: "2026-10-01T00:00:00Z".parse().unwrap(),
            due_date: due,
            completed_at: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn test_overdue_yesterday() {
        let yesterday = today() - Duration::days(1);
        assert!(is_overdue(&task(Status::Pending, Some(yesterday)), today()));
        assert!(is_overdue(&task(Status::InProgress, Some(yesterday)), today()));
        assert!(!is_overdue(&task(Status::Completed, Some(yesterday)), today()));
    }

    #[test]
    fn test_not_overdue_today_or_without_date() {
        assert!(!is_overdue(&task(Status::Pending, Some(today())), today()));
        assert!(!is_overdue(&task(Status::Pending, None), today()));
    }

    #[test]
    fn test_due_label() {
        let t = task(Status::Pending, NaiveDate::from_ymd_opt(2026, 10, 15));
        assert_eq!(due_label(&t, today()).unwrap(), "Overdue: Oct 15, 2026");
        let t = task(Status::Completed, NaiveDate::from_ymd_opt(2026, 10, 15));
        assert_eq!(due_label(&t, today()).unwrap(), "Due: Oct 15, 2026");
        assert!(due_label(&task(Status::Pending, None), today()).is_none());
    }

    #[test]
    fn test_relative_time_thresholds() {
        let now: DateTime<Utc> = "2026-10-16T12:00:00Z".parse().unwrap();
        let ago = |secs: i64| relative_time(now - Duration::seconds(secs), now);
        assert_eq!(ago(0), "a few seconds ago");
        assert_eq!(ago(50), "a minute ago");
        assert_eq!(ago(5 * 60), "5 minutes ago");
        assert_eq!(ago(60 * 60), "an hour ago");
        assert_eq!(ago(3 * 3_600), "3 hours ago");
        assert_eq!(ago(30 * 3_600), "a day ago");
        assert_eq!(ago(4 * 86_400), "4 days ago");
        assert_eq!(ago(30 * 86_400), "a month ago");
        assert_eq!(ago(92 * 86_400), "3 months ago");
        assert_eq!(ago(400 * 86_400), "a year ago");
        assert_eq!(ago(3 * 365 * 86_400), "3 years ago");
        assert_eq!(relative_time(now + Duration::days(2), now), "in 2 days");
    }

    #[test]
    fn test_labels() {
        assert_eq!(status_label(Status::InProgress), "In-progress");
        assert_eq!(priority_label(Priority::Urgent), "Urgent");
        assert!(priority_rank(Priority::Urgent) > priority_rank(Priority::Low));
    }

    #[test]
    fn test_filter_and_sort() {
        let mut a = task(Status::Pending, NaiveDate::from_ymd_opt(2026, 10, 20));
        a.id = 1;
        a.priority = Priority::Low;
        a.title = "Buy milk".into();
        let mut b = task(Status::Completed, NaiveDate::from_ymd_opt(2026, 10, 1));
        b.id = 2;
        b.priority = Priority::Urgent;
        let mut c = task(Status::Pending, None);
        c.id = 3;
        c.category = "Work".into();
        let tasks = vec![a, b, c];

        let ids = |v: Vec<&Task>| v.iter().map(|t| t.id).collect::<Vec<_>>();
        let all = TaskFilter::default();
        assert_eq!(ids(visible_tasks(&tasks, &all, SortKey::Created, today())), vec![1, 2, 3]);
        assert_eq!(ids(visible_tasks(&tasks, &all, SortKey::Due, today())), vec![2, 1, 3]);
        assert_eq!(ids(visible_tasks(&tasks, &all, SortKey::Priority, today())), vec![2, 3, 1]);

        let open = TaskFilter { hide_completed: true, ..TaskFilter::default() };
        assert_eq!(ids(visible_tasks(&tasks, &open, SortKey::Created, today())), vec![1, 3]);
        let work = TaskFilter { category: Some("work".into()), ..TaskFilter::default() };
        assert_eq!(ids(visible_tasks(&tasks, &work, SortKey::Created, today())), vec![3]);
        let text = TaskFilter { text: Some("MILK".into()), ..TaskFilter::default() };
        assert_eq!(ids(visible_tasks(&tasks, &text, SortKey::Created, today())), vec![1]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a longer title", 6), "a lon…");
    }
}

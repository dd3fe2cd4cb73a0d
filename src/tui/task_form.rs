//! Task form handling.
//!
//! `TaskForm` holds the pending values of the "Add New Task" form and of the
//! inline editor. It validates them and hands the result to the store, both
//! for the TUI and for the `add` / `edit` commands.

use chrono::{Duration, NaiveDate};

use crate::error::FormError;
use crate::fields::*;
use crate::persist::KeyValueStore;
use crate::store::TaskStore;
use crate::task::{NewTask, Task, TaskId, TaskPatch};
use crate::tui::input::InputField;
use crate::view::format_date_short;

/// Field order used for focus navigation.
pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const PRIORITY_FIELD: usize = 2;
pub const DUE_FIELD: usize = 3;
pub const CATEGORY_FIELD: usize = 4;
pub const FIELD_COUNT: usize = 5;

/// Pending task fields, before submission.
#[derive(Clone, Debug)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub due: InputField,
    pub priority: usize,
    pub category: usize,
    pub current_field: usize,
    pub priorities: Vec<Priority>,
    /// Category choices; index 0 is "no selection", stored as the default
    /// category.
    pub categories: Vec<String>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// An empty form with default priority and no category.
    pub fn new() -> Self {
        let mut categories = vec![String::new()];
        categories.extend(CATEGORIES.iter().map(|c| c.to_string()));
        let priorities = Priority::ALL.to_vec();
        let priority = priorities
            .iter()
            .position(|&p| p == Priority::default())
            .unwrap_or(0);
        let mut form = Self {
            title: InputField::new(),
            description: InputField::new(),
            due: InputField::new(),
            priority,
            category: 0,
            current_field: TITLE_FIELD,
            priorities,
            categories,
        };
        form.update_active_field();
        form
    }

    /// A form preloaded with the editable fields of `task`.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.title = InputField::with_value(&task.title);
        form.description = InputField::with_value(&task.description);
        form.due = InputField::with_value(&task.due_date.map(|d| d.to_string()).unwrap_or_default());
        form.select_priority(task.priority);
        form.select_category(&task.category);
        form.update_active_field();
        form
    }

    /// Clear every field back to its default.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Mirrors the disabled state of the submit button.
    pub fn can_submit(&self) -> bool {
        !self.title.value.trim().is_empty()
    }

    pub fn selected_priority(&self) -> Priority {
        self.priorities.get(self.priority).copied().unwrap_or_default()
    }

    /// Selected category label, or `None` for no selection.
    pub fn selected_category(&self) -> Option<&str> {
        self.categories
            .get(self.category)
            .map(String::as_str)
            .filter(|c| !c.is_empty())
    }

    /// Select a category by label, adding it to the choices when it is not a
    /// stock one so custom labels survive an edit.
    pub fn select_category(&mut self, label: &str) {
        let label = label.trim();
        if label.is_empty() || label == DEFAULT_CATEGORY {
            self.category = 0;
            return;
        }
        let found = self.categories.iter().position(|c| c.eq_ignore_ascii_case(label));
        match found {
            Some(i) => self.category = i,
            None => {
                self.categories.push(label.to_string());
                self.category = self.categories.len() - 1;
            }
        }
    }

    pub fn select_priority(&mut self, p: Priority) {
        if let Some(i) = self.priorities.iter().position(|&q| q == p) {
            self.priority = i;
        }
    }

    /// Parsed due date. Blank input means no due date.
    pub fn due_date(&self, today: NaiveDate) -> Result<Option<NaiveDate>, FormError> {
        let raw = self.due.value.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse_due_input(raw, today)
            .map(Some)
            .ok_or_else(|| FormError::InvalidDueDate(raw.to_string()))
    }

    /// Earliest date the date picker suggests. Earlier dates are still accepted.
    pub fn min_due_date(today: NaiveDate) -> NaiveDate {
        today
    }

    /// Short preview of the parsed due date, e.g. `Due: Fri, Oct 16`.
    pub fn due_preview(&self, today: NaiveDate) -> Option<String> {
        match self.due_date(today) {
            Ok(Some(d)) => Some(format!("Due: {}", format_date_short(d))),
            _ => None,
        }
    }

    /// Build the creation fields from the current values.
    pub fn to_new_task(&self, today: NaiveDate) -> Result<NewTask, FormError> {
        if !self.can_submit() {
            return Err(FormError::EmptyTitle);
        }
        Ok(NewTask {
            title: self.title.value.clone(),
            description: self.description.value.clone(),
            priority: Some(self.selected_priority()),
            category: self.selected_category().map(str::to_string),
            due_date: self.due_date(today)?,
        })
    }

    /// Build a patch carrying every editable field.
    pub fn to_patch(&self, today: NaiveDate) -> Result<TaskPatch, FormError> {
        if !self.can_submit() {
            return Err(FormError::EmptyTitle);
        }
        Ok(TaskPatch {
            title: Some(self.title.value.clone()),
            description: Some(self.description.value.clone()),
            priority: Some(self.selected_priority()),
            category: Some(self.selected_category().unwrap_or(DEFAULT_CATEGORY).to_string()),
            due_date: Some(self.due_date(today)?),
        })
    }

    /// Create a task from the form and reset it. On error nothing is created
    /// and the fields are kept.
    pub fn submit<S: KeyValueStore>(&mut self, store: &mut TaskStore<S>, today: NaiveDate) -> Result<Task, FormError> {
        let fields = self.to_new_task(today)?;
        let task = store.add(fields)?.ok_or(FormError::EmptyTitle)?;
        self.reset();
        Ok(task)
    }

    /// Write the form back to the task with `id`.
    pub fn save_edit<S: KeyValueStore>(
        &self,
        store: &mut TaskStore<S>,
        id: TaskId,
        today: NaiveDate,
    ) -> Result<(), FormError> {
        let patch = self.to_patch(today)?;
        if store.update_fields(id, patch)? {
            Ok(())
        } else if store.get(id).is_none() {
            Err(FormError::MissingTask(id))
        } else {
            Err(FormError::EmptyTitle)
        }
    }

    /// Move to the next field in the form.
    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
        self.update_active_field();
    }

    /// Move to the previous field in the form.
    pub fn prev_field(&mut self) {
        self.current_field = if self.current_field == 0 {
            FIELD_COUNT - 1
        } else {
            self.current_field - 1
        };
        self.update_active_field();
    }

    /// Update which text field shows the cursor.
    pub fn update_active_field(&mut self) {
        self.title.active = self.current_field == TITLE_FIELD;
        self.description.active = self.current_field == DESCRIPTION_FIELD;
        self.due.active = self.current_field == DUE_FIELD;
    }

    fn current_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            DUE_FIELD => Some(&mut self.due),
            _ => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.current_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.current_input() {
            field.handle_delete();
        }
    }

    /// Left/right move the cursor in text fields and cycle selectors.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PRIORITY_FIELD => self.priority = cycle(self.priority, self.priorities.len(), right),
            CATEGORY_FIELD => self.category = cycle(self.category, self.categories.len(), right),
            _ => {
                if let Some(field) = self.current_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    /// Jump to the start or end of the active text field.
    pub fn handle_home_end(&mut self, end: bool) {
        if let Some(field) = self.current_input() {
            if end {
                field.move_end();
            } else {
                field.move_home();
            }
        }
    }
}

fn cycle(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}

/// Parse due date input relative to `today`.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_days(days)?);
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return today.checked_add_signed(Duration::try_weeks(weeks)?);
            }
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::MemoryKv;
    use crate::store::DEFAULT_KEY;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn type_str(form: &mut TaskForm, s: &str) {
        for c in s.chars() {
            form.handle_char(c);
        }
    }

    #[test]
    fn test_defaults() {
        let form = TaskForm::new();
        assert_eq!(form.selected_priority(), Priority::Medium);
        assert_eq!(form.selected_category(), None);
        assert!(!form.can_submit());
        assert!(form.title.active);
    }

    #[test]
    fn test_submit_adds_and_resets() {
        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let mut form = TaskForm::new();
        type_str(&mut form, "  Write report ");
        form.next_field();
        type_str(&mut form, "quarterly");
        form.next_field();
        form.handle_left_right(true); // medium -> high
        form.next_field();
        type_str(&mut form, "2026-10-20");
        form.next_field();
        form.handle_left_right(true); // Work

        let task = form.submit(&mut store, today()).unwrap();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "quarterly");
        assert_eq!(task.priority, Priority::High);
        assert_eq!(task.category, "Work");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2026, 10, 20));
        assert_eq!(store.tasks()[0].id, task.id);

        assert!(form.title.value.is_empty());
        assert!(form.due.value.is_empty());
        assert_eq!(form.selected_priority(), Priority::Medium);
        assert_eq!(form.selected_category(), None);
        assert_eq!(form.current_field, TITLE_FIELD);
    }

    #[test]
    fn test_submit_blank_title_fails_without_action() {
        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let mut form = TaskForm::new();
        type_str(&mut form, "   ");
        form.next_field();
        type_str(&mut form, "kept");
        assert!(matches!(form.submit(&mut store, today()), Err(FormError::EmptyTitle)));
        assert!(store.is_empty());
        assert_eq!(form.description.value, "kept");
    }

    #[test]
    fn test_invalid_due_date_is_refused() {
        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let mut form = TaskForm::new();
        type_str(&mut form, "x");
        form.due.set("someday");
        assert!(matches!(form.submit(&mut store, today()), Err(FormError::InvalidDueDate(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn test_past_due_date_is_accepted() {
        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let mut form = TaskForm::new();
        type_str(&mut form, "late already");
        form.due.set("2020-01-01");
        let task = form.submit(&mut store, today()).unwrap();
        assert!(task.due_date.unwrap() < TaskForm::min_due_date(today()));
    }

    #[test]
    fn test_edit_round_trip() {
        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let task = store
            .add(NewTask {
                title: "Groceries".into(),
                category: Some("Errands".into()),
                due_date: NaiveDate::from_ymd_opt(2026, 10, 18),
                ..NewTask::default()
            })
            .unwrap()
            .unwrap();

        let mut form = TaskForm::from_task(&task);
        assert_eq!(form.selected_category(), Some("Errands"));
        assert_eq!(form.due.value, "2026-10-18");
        form.title.set("Groceries and bread");
        form.due.clear();
        form.save_edit(&mut store, task.id, today()).unwrap();

        let t = store.get(task.id).unwrap();
        assert_eq!(t.title, "Groceries and bread");
        assert_eq!(t.category, "Errands");
        assert!(t.due_date.is_none());
    }

    #[test]
    fn test_edit_blank_title_rejected() {
        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let task = store.add(NewTask::titled("stay")).unwrap().unwrap();
        let mut form = TaskForm::from_task(&task);
        form.title.set("  ");
        assert!(matches!(form.save_edit(&mut store, task.id, today()), Err(FormError::EmptyTitle)));
        assert_eq!(store.get(task.id).unwrap().title, "stay");
    }

    #[test]
    fn test_edit_missing_task() {
        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let mut form = TaskForm::new();
        form.title.set("orphan");
        assert!(matches!(form.save_edit(&mut store, 99, today()), Err(FormError::MissingTask(99))));
    }

    #[test]
    fn test_selector_cycling_wraps() {
        let mut form = TaskForm::new();
        form.current_field = PRIORITY_FIELD;
        form.handle_left_right(true);
        form.handle_left_right(true);
        assert_eq!(form.selected_priority(), Priority::Urgent);
        form.handle_left_right(true);
        assert_eq!(form.selected_priority(), Priority::Low);
        form.current_field = CATEGORY_FIELD;
        form.handle_left_right(false);
        assert_eq!(form.selected_category(), Some("Other"));
    }

    #[test]
    fn test_select_category() {
        let mut form = TaskForm::new();
        form.select_category("health");
        assert_eq!(form.selected_category(), Some("Health"));
        form.select_category("Garden");
        assert_eq!(form.selected_category(), Some("Garden"));
        form.select_category("General");
        assert_eq!(form.selected_category(), None);
    }

    #[test]
    fn test_parse_due_input() {
        assert_eq!(parse_due_input("today", today()), Some(today()));
        assert_eq!(parse_due_input("Tomorrow", today()), NaiveDate::from_ymd_opt(2026, 10, 17));
        assert_eq!(parse_due_input("in 3d", today()), NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(parse_due_input("in 2w", today()), NaiveDate::from_ymd_opt(2026, 10, 30));
        assert_eq!(parse_due_input("2026-12-25", today()), NaiveDate::from_ymd_opt(2026, 12, 25));
        assert_eq!(parse_due_input("next blue moon", today()), None);
    }

    #[test]
    fn test_out_of_range_offsets_are_invalid() {
        assert_eq!(parse_due_input("in 200000000000000d", today()), None);
        assert_eq!(parse_due_input("in 20000000000000w", today()), None);
        assert_eq!(parse_due_input("in 999999999d", today()), None);

        let mut store = TaskStore::open(MemoryKv::new(), DEFAULT_KEY);
        let mut form = TaskForm::new();
        form.title.set("far away");
        for due in ["in 200000000000000d", "in 20000000000000w"] {
            form.due.set(due);
            assert!(matches!(form.submit(&mut store, today()), Err(FormError::InvalidDueDate(_))));
        }
        assert!(store.is_empty());
        assert_eq!(form.title.value, "far away");
    }

    #[test]
    fn test_due_preview() {
        let mut form = TaskForm::new();
        assert!(form.due_preview(today()).is_none());
        form.due.set("2026-10-16");
        assert_eq!(form.due_preview(today()).unwrap(), "Due: Fri, Oct 16");
    }
}

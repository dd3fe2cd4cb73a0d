//! The task collection and its mutations.
//!
//! `TaskStore` owns the in-memory list of tasks (most recent first) and writes
//! the whole list back through its [`PersistentStore`] after every change.
//! Rejected mutations (blank titles, unknown ids) leave both the list and the
//! stored copy untouched.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::fields::*;
use crate::persist::{KeyValueStore, PersistentStore};
use crate::task::{NewTask, Task, TaskId, TaskPatch};

/// Storage key used when none is configured.
pub const DEFAULT_KEY: &str = "tasks";

pub struct TaskStore<S> {
    tasks: Vec<Task>,
    persist: PersistentStore<Vec<Task>, S>,
    key: String,
    /// Highest id seen or issued; new ids are always above it.
    high_water: TaskId,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Open the store, loading whatever is saved under `key`.
    pub fn open(backend: S, key: &str) -> Self {
        let persist: PersistentStore<Vec<Task>, S> = PersistentStore::new(backend);
        let tasks = persist.load(key, Vec::new());
        let high_water = tasks.iter().map(|t| t.id).max().unwrap_or(0);
        debug!(key, count = tasks.len(), "task store opened");
        Self {
            tasks,
            persist,
            key: key.to_string(),
            high_water,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &S {
        self.persist.backend()
    }

    /// Get a task by ID.
    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn get_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Create a task from `fields` and put it at the front of the list.
    ///
    /// Returns `Ok(None)` without touching storage when the trimmed title is
    /// empty.
    pub fn add(&mut self, fields: NewTask) -> Result<Option<Task>, StoreError> {
        let title = fields.title.trim();
        if title.is_empty() {
            return Ok(None);
        }
        let now = Utc::now();
        let task = Task {
            id: self.next_id(now)?,
            title: title.to_string(),
            description: fields.description.trim().to_string(),
            priority: fields.priority.unwrap_or_default(),
            category: normalise_category(fields.category.as_deref().unwrap_or("")),
            status: Status::Pending,
            created_at: now,
            due_date: fields.due_date,
            completed_at: None,
        };
        self.tasks.insert(0, task.clone());
        info!(id = task.id, title = %task.title, "task added");
        self.save()?;
        Ok(Some(task))
    }

    /// Merge `patch` into the task with `id`.
    ///
    /// Returns `Ok(false)` without touching storage when the id is unknown or
    /// the patched title would be blank.
    pub fn update_fields(&mut self, id: TaskId, patch: TaskPatch) -> Result<bool, StoreError> {
        let title = match &patch.title {
            Some(t) if t.trim().is_empty() => return Ok(false),
            Some(t) => Some(t.trim().to_string()),
            None => None,
        };
        let Some(task) = self.get_mut(id) else {
            return Ok(false);
        };
        if let Some(title) = title {
            task.title = title;
        }
        if let Some(desc) = patch.description {
            task.description = desc.trim().to_string();
        }
        if let Some(priority) = patch.priority {
            task.priority = priority;
        }
        if let Some(category) = patch.category {
            task.category = normalise_category(&category);
        }
        if let Some(due) = patch.due_date {
            task.due_date = due;
        }
        info!(id, "task updated");
        self.save()?;
        Ok(true)
    }

    /// Move the task with `id` to `status`, stamping or clearing its
    /// completion time to match.
    pub fn set_status(&mut self, id: TaskId, status: Status) -> Result<bool, StoreError> {
        let Some(task) = self.get_mut(id) else {
            return Ok(false);
        };
        task.status = status;
        task.completed_at = if status.is_completed() { Some(Utc::now()) } else { None };
        info!(id, ?status, "task status changed");
        self.save()?;
        Ok(true)
    }

    /// Flip a task between completed and pending, as the list checkbox does.
    pub fn toggle_completed(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let Some(current) = self.get(id).map(|t| t.status) else {
            return Ok(false);
        };
        let next = if current.is_completed() { Status::Pending } else { Status::Completed };
        self.set_status(id, next)
    }

    /// Remove the task with `id`. Removing an unknown id is a no-op.
    pub fn remove(&mut self, id: TaskId) -> Result<bool, StoreError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        info!(id, "task removed");
        self.save()?;
        Ok(true)
    }

    /// Millisecond timestamp of `now`, bumped past every id already seen so two
    /// tasks created in the same millisecond (or after a clock step back)
    /// never share an id.
    fn next_id(&mut self, now: DateTime<Utc>) -> Result<TaskId, StoreError> {
        let floor = self
            .high_water
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted { last: self.high_water })?;
        let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let id = stamp.max(floor);
        self.high_water = id;
        Ok(id)
    }

    fn save(&mut self) -> Result<(), StoreError> {
        self.persist.save(&self.key, &self.tasks)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::NaiveDate;
    use proptest::prelude::*;

    use super::*;
    use crate::persist::{FileKv, MemoryKv};

    fn store() -> TaskStore<MemoryKv> {
        TaskStore::open(MemoryKv::new(), DEFAULT_KEY)
    }

    fn stored(store: &TaskStore<MemoryKv>) -> Vec<Task> {
        let raw = store.backend().get(DEFAULT_KEY).unwrap().unwrap_or_else(|| "[]".into());
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn test_add_prepends_and_persists() {
        let mut s = store();
        let first = s.add(NewTask::titled("first")).unwrap().unwrap();
        let second = s.add(NewTask::titled("second")).unwrap().unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.tasks()[0].id, second.id);
        assert_eq!(s.tasks()[1].id, first.id);
        assert_eq!(stored(&s), s.tasks());
    }

    #[test]
    fn test_add_applies_defaults_and_trims() {
        let mut s = store();
        let task = s
            .add(NewTask {
                title: "  Buy milk  ".into(),
                description: "  semi-skimmed \n".into(),
                ..NewTask::default()
            })
            .unwrap()
            .unwrap();
        assert_eq!(task.title, "Buy milk");
        assert_eq!(task.description, "semi-skimmed");
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, "General");
        assert_eq!(task.status, Status::Pending);
        assert!(task.completed_at.is_none());
        assert!(task.due_date.is_none());
    }

    #[test]
    fn test_add_blank_title_is_rejected() {
        let mut s = store();
        assert!(s.add(NewTask::titled("")).unwrap().is_none());
        assert!(s.add(NewTask::titled("   ")).unwrap().is_none());
        assert!(s.is_empty());
        assert!(s.backend().get(DEFAULT_KEY).unwrap().is_none());
    }

    #[test]
    fn test_ids_are_unique_for_rapid_adds() {
        let mut s = store();
        for i in 0..200 {
            s.add(NewTask::titled(format!("task {i}"))).unwrap();
        }
        let ids: HashSet<_> = s.tasks().iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), 200);
    }

    #[test]
    fn test_ids_not_reused_after_remove() {
        let mut s = store();
        let a = s.add(NewTask::titled("a")).unwrap().unwrap();
        s.remove(a.id).unwrap();
        let b = s.add(NewTask::titled("b")).unwrap().unwrap();
        assert!(b.id > a.id);
    }

    #[test]
    fn test_ids_stay_above_loaded_ids() {
        // Ids from the future, e.g. written on a machine with a fast clock.
        let far = u64::MAX / 2;
        let json = format!(r#"[{{"id":{far},"title":"later","createdAt":"2026-01-01T00:00:00Z"}}]"#);
        let mut s = TaskStore::open(MemoryKv::new().with_entry(DEFAULT_KEY, &json), DEFAULT_KEY);
        let task = s.add(NewTask::titled("now")).unwrap().unwrap();
        assert_eq!(task.id, far + 1);
    }

    #[test]
    fn test_add_after_max_id_is_refused() {
        let json = format!(r#"[{{"id":{},"title":"last","createdAt":"2026-01-01T00:00:00Z"}}]"#, u64::MAX);
        let mut s = TaskStore::open(MemoryKv::new().with_entry(DEFAULT_KEY, &json), DEFAULT_KEY);
        assert!(matches!(
            s.add(NewTask::titled("y")),
            Err(StoreError::IdsExhausted { last: u64::MAX })
        ));
        assert_eq!(s.len(), 1);
        assert_eq!(stored(&s), s.tasks());
    }

    #[test]
    fn test_buy_milk_status_lifecycle() {
        let mut s = store();
        let task = s
            .add(NewTask {
                title: "Buy milk".into(),
                priority: Some(Priority::Medium),
                ..NewTask::default()
            })
            .unwrap()
            .unwrap();
        assert_eq!(s.tasks().len(), 1);
        assert_eq!(s.tasks()[0].status, Status::Pending);
        assert!(s.tasks()[0].completed_at.is_none());

        assert!(s.set_status(task.id, Status::Completed).unwrap());
        let t = s.get(task.id).unwrap();
        assert_eq!(t.status, Status::Completed);
        assert!(t.completed_at.is_some());

        assert!(s.set_status(task.id, Status::Pending).unwrap());
        assert!(s.get(task.id).unwrap().completed_at.is_none());
        assert_eq!(stored(&s), s.tasks());
    }

    #[test]
    fn test_in_progress_clears_completion() {
        let mut s = store();
        let id = s.add(NewTask::titled("x")).unwrap().unwrap().id;
        s.set_status(id, Status::Completed).unwrap();
        s.set_status(id, Status::InProgress).unwrap();
        let t = s.get(id).unwrap();
        assert_eq!(t.status, Status::InProgress);
        assert!(t.completed_at.is_none());
    }

    #[test]
    fn test_toggle_completed() {
        let mut s = store();
        let id = s.add(NewTask::titled("x")).unwrap().unwrap().id;
        s.toggle_completed(id).unwrap();
        assert_eq!(s.get(id).unwrap().status, Status::Completed);
        s.toggle_completed(id).unwrap();
        assert_eq!(s.get(id).unwrap().status, Status::Pending);
        assert!(!s.toggle_completed(id + 1).unwrap());
    }

    #[test]
    fn test_set_status_unknown_id() {
        let mut s = store();
        assert!(!s.set_status(42, Status::Completed).unwrap());
    }

    #[test]
    fn test_update_fields_merges_patch() {
        let mut s = store();
        let id = s.add(NewTask::titled("draft")).unwrap().unwrap().id;
        let due = NaiveDate::from_ymd_opt(2026, 12, 1);
        let applied = s
            .update_fields(
                id,
                TaskPatch {
                    title: Some(" final ".into()),
                    description: Some(" notes ".into()),
                    priority: Some(Priority::Urgent),
                    category: Some("Work".into()),
                    due_date: Some(due),
                },
            )
            .unwrap();
        assert!(applied);
        let t = s.get(id).unwrap();
        assert_eq!(t.title, "final");
        assert_eq!(t.description, "notes");
        assert_eq!(t.priority, Priority::Urgent);
        assert_eq!(t.category, "Work");
        assert_eq!(t.due_date, due);

        s.update_fields(id, TaskPatch { due_date: Some(None), ..TaskPatch::default() }).unwrap();
        assert!(s.get(id).unwrap().due_date.is_none());
        assert_eq!(s.get(id).unwrap().title, "final");
    }

    #[test]
    fn test_update_blank_title_is_rejected() {
        let mut s = store();
        let id = s.add(NewTask::titled("keep me")).unwrap().unwrap().id;
        let before = stored(&s);
        let applied = s
            .update_fields(
                id,
                TaskPatch {
                    title: Some("  ".into()),
                    description: Some("changed".into()),
                    ..TaskPatch::default()
                },
            )
            .unwrap();
        assert!(!applied);
        assert_eq!(s.get(id).unwrap().title, "keep me");
        assert_eq!(s.get(id).unwrap().description, "");
        assert_eq!(stored(&s), before);
    }

    #[test]
    fn test_update_unknown_id() {
        let mut s = store();
        assert!(!s.update_fields(9, TaskPatch { title: Some("x".into()), ..TaskPatch::default() }).unwrap());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut s = store();
        let id = s.add(NewTask::titled("gone")).unwrap().unwrap().id;
        s.add(NewTask::titled("stays")).unwrap();
        assert!(s.remove(id).unwrap());
        assert!(!s.remove(id).unwrap());
        assert_eq!(s.len(), 1);
        assert_eq!(s.tasks()[0].title, "stays");
    }

    #[test]
    fn test_reopen_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut s = TaskStore::open(FileKv::open(dir.path()), DEFAULT_KEY);
            let id = s.add(NewTask::titled("persisted")).unwrap().unwrap().id;
            s.set_status(id, Status::Completed).unwrap();
            id
        };
        let s = TaskStore::open(FileKv::open(dir.path()), DEFAULT_KEY);
        let t = s.get(id).unwrap();
        assert_eq!(t.title, "persisted");
        assert!(t.completed_at.is_some());
    }

    #[test]
    fn test_corrupted_storage_opens_empty() {
        let s = TaskStore::open(MemoryKv::new().with_entry(DEFAULT_KEY, "[{\"id\":"), DEFAULT_KEY);
        assert!(s.is_empty());
    }

    proptest! {
        #[test]
        fn prop_add_grows_by_one_and_prepends(title in "[a-zA-Z0-9 ]{0,24}", pre in 0usize..4) {
            let mut s = store();
            for i in 0..pre {
                s.add(NewTask::titled(format!("seed {i}"))).unwrap();
            }
            let before = s.len();
            let added = s.add(NewTask::titled(title.clone())).unwrap();
            if title.trim().is_empty() {
                prop_assert!(added.is_none());
                prop_assert_eq!(s.len(), before);
            } else {
                let added = added.unwrap();
                prop_assert_eq!(s.len(), before + 1);
                prop_assert_eq!(s.tasks()[0].id, added.id);
                prop_assert_eq!(s.tasks()[0].title.as_str(), title.trim());
            }
        }

        #[test]
        fn prop_completed_at_tracks_status(steps in proptest::collection::vec(0u8..3, 1..12)) {
            let mut s = store();
            let id = s.add(NewTask::titled("t")).unwrap().unwrap().id;
            for step in steps {
                let status = match step {
                    0 => Status::Pending,
                    1 => Status::InProgress,
                    _ => Status::Completed,
                };
                s.set_status(id, status).unwrap();
                let t = s.get(id).unwrap();
                prop_assert_eq!(t.completed_at.is_some(), t.status == Status::Completed);
            }
        }
    }
}

//! Task checklist with persistence.
//!
//! The whole list is stored as one JSON array under [`TASKS_KEY`] and
//! rewritten after every mutation. It is read once, when the list is
//! loaded; unreadable or malformed data yields an empty list.

mod error;
mod store;

pub use error::{StoreError, TaskLookupError};
pub use store::{FileStore, KeyValueStore, MemoryStore};

use tracing::{debug, warn};

use crate::types::TaskItem;

/// Store key under which the task array is persisted.
pub const TASKS_KEY: &str = "pomodoroTasks";

/// Ordered, persisted list of tasks.
pub struct TaskList {
    tasks: Vec<TaskItem>,
    store: Box<dyn KeyValueStore>,
    save_error: Option<StoreError>,
}

impl TaskList {
    /// Loads the list from `store`, falling back to empty on any failure.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let tasks = match Self::read(store.as_ref()) {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!(error = %e, "Failed to load saved tasks, starting with an empty list");
                Vec::new()
            }
        };
        debug!(count = tasks.len(), "Tasks loaded");

        Self {
            tasks,
            store,
            save_error: None,
        }
    }

    fn read(store: &dyn KeyValueStore) -> Result<Vec<TaskItem>, StoreError> {
        let Some(json) = store.get(TASKS_KEY)? else {
            return Ok(Vec::new());
        };
        let mut tasks: Vec<TaskItem> =
            serde_json::from_str(&json).map_err(|source| StoreError::Malformed {
                key: TASKS_KEY.to_string(),
                source,
            })?;

        let stored = tasks.len();
        tasks.retain(|t| !t.text.trim().is_empty());
        if tasks.len() < stored {
            warn!(dropped = stored - tasks.len(), "Ignoring saved tasks with blank text");
        }
        Ok(tasks)
    }

    /// Appends a task. Blank input is ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<&TaskItem> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        self.tasks.push(TaskItem::new(text));
        self.save();
        self.tasks.last()
    }

    /// Flips `completed` on the task with `id`. Returns false for unknown ids.
    pub fn toggle(&mut self, id: &str) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            return false;
        };
        task.completed = !task.completed;
        self.save();
        true
    }

    /// Deletes the task with `id`. Returns false for unknown ids.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.save();
        true
    }

    /// Resolves a 1-based position or an id prefix to a task id.
    pub fn resolve(&self, selector: &str) -> Result<String, TaskLookupError> {
        let selector = selector.trim();
        if selector.is_empty() {
            return Err(TaskLookupError::NotFound(selector.to_string()));
        }

        if let Ok(position) = selector.parse::<usize>() {
            if let Some(task) = position.checked_sub(1).and_then(|i| self.tasks.get(i)) {
                return Ok(task.id.clone());
            }
        }

        if let Some(task) = self.tasks.iter().find(|t| t.id == selector) {
            return Ok(task.id.clone());
        }

        let mut matches = self.tasks.iter().filter(|t| t.id.starts_with(selector));
        match (matches.next(), matches.next()) {
            (Some(task), None) => Ok(task.id.clone()),
            (Some(_), Some(_)) => Err(TaskLookupError::Ambiguous(selector.to_string())),
            (None, _) => Err(TaskLookupError::NotFound(selector.to_string())),
        }
    }

    pub fn tasks(&self) -> &[TaskItem] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&TaskItem> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.completed).count()
    }

    /// Writes the full list to the store.
    pub fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.tasks).map_err(|source| StoreError::Serialize {
            key: TASKS_KEY.to_string(),
            source,
        })?;
        self.store.set(TASKS_KEY, &json)
    }

    /// Returns the most recent save failure, if any, clearing it.
    pub fn take_save_error(&mut self) -> Option<StoreError> {
        self.save_error.take()
    }

    fn save(&mut self) {
        match self.persist() {
            Ok(()) => self.save_error = None,
            Err(e) => {
                warn!(error = %e, "Failed to save tasks");
                self.save_error = Some(e);
            }
        }
    }
}

impl std::fmt::Debug for TaskList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskList")
            .field("tasks", &self.tasks)
            .field("save_error", &self.save_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> (TaskList, MemoryStore) {
        let store = MemoryStore::new();
        (TaskList::load(Box::new(store.clone())), store)
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_missing_key_is_empty() {
            let (list, _store) = empty();
            assert!(list.is_empty());
        }

        #[test]
        fn test_loads_saved_tasks() {
            let json = r#"[{"id":"a1","text":"Write report","completed":true}]"#;
            let list = TaskList::load(Box::new(MemoryStore::with_value(TASKS_KEY, json)));

            assert_eq!(list.len(), 1);
            assert_eq!(list.tasks()[0].text, "Write report");
            assert!(list.tasks()[0].completed);
        }

        #[test]
        fn test_malformed_data_is_empty() {
            let list = TaskList::load(Box::new(MemoryStore::with_value(TASKS_KEY, "{not json")));
            assert!(list.is_empty());
        }

        #[test]
        fn test_wrong_shape_is_empty() {
            let list = TaskList::load(Box::new(MemoryStore::with_value(TASKS_KEY, r#"{"id":"x"}"#)));
            assert!(list.is_empty());
        }

        #[test]
        fn test_blank_text_items_are_dropped() {
            let json = r#"[
                {"id":"a1","text":"","completed":false},
                {"id":"b2","text":"Keep me","completed":false},
                {"id":"c3","text":"   ","completed":true}
            ]"#;
            let list = TaskList::load(Box::new(MemoryStore::with_value(TASKS_KEY, json)));

            assert_eq!(list.len(), 1);
            assert_eq!(list.tasks()[0].id, "b2");
            assert!(list.get("a1").is_none());
            assert!(list.get("c3").is_none());
        }
    }

    mod mutation_tests {
        use super::*;

        #[test]
        fn test_add_trims_and_persists() {
            let (mut list, store) = empty();

            let task = list.add("  Write report  ").cloned().unwrap();

            assert_eq!(task.text, "Write report");
            assert!(!task.completed);
            let saved: Vec<TaskItem> = serde_json::from_str(&store.raw(TASKS_KEY).unwrap()).unwrap();
            assert_eq!(saved, vec![task]);
        }

        #[test]
        fn test_add_blank_is_ignored() {
            let (mut list, store) = empty();

            assert!(list.add("").is_none());
            assert!(list.add("   ").is_none());

            assert!(list.is_empty());
            assert!(store.raw(TASKS_KEY).is_none());
        }

        #[test]
        fn test_add_generates_distinct_ids() {
            let (mut list, _store) = empty();
            let a = list.add("a").unwrap().id.clone();
            let b = list.add("b").unwrap().id.clone();
            assert_ne!(a, b);
        }

        #[test]
        fn test_toggle_twice_restores() {
            let (mut list, store) = empty();
            let id = list.add("Read").unwrap().id.clone();

            assert!(list.toggle(&id));
            assert!(list.get(&id).unwrap().completed);
            assert_eq!(list.completed_count(), 1);

            assert!(list.toggle(&id));
            assert!(!list.get(&id).unwrap().completed);
            assert!(store.raw(TASKS_KEY).unwrap().contains("\"completed\":false"));
        }

        #[test]
        fn test_unknown_ids_are_noops() {
            let (mut list, _store) = empty();
            list.add("keep");

            assert!(!list.toggle("missing"));
            assert!(!list.remove("missing"));
            assert_eq!(list.len(), 1);
        }

        #[test]
        fn test_remove_keeps_order() {
            let (mut list, store) = empty();
            list.add("one");
            let id = list.add("two").unwrap().id.clone();
            list.add("three");

            assert!(list.remove(&id));

            let texts: Vec<_> = list.tasks().iter().map(|t| t.text.as_str()).collect();
            assert_eq!(texts, ["one", "three"]);
            let saved: Vec<TaskItem> = serde_json::from_str(&store.raw(TASKS_KEY).unwrap()).unwrap();
            assert_eq!(saved.len(), 2);
        }

        #[test]
        fn test_save_failure_is_kept_in_memory() {
            let (mut list, store) = empty();
            store.set_fail_writes(true);

            list.add("offline");

            assert_eq!(list.len(), 1);
            assert!(list.take_save_error().is_some());
            assert!(list.take_save_error().is_none());
        }
    }

    mod resolve_tests {
        use super::*;

        fn list_with_ids(ids: &[&str]) -> TaskList {
            let tasks: Vec<TaskItem> = ids
                .iter()
                .map(|id| TaskItem {
                    id: id.to_string(),
                    text: format!("task {id}"),
                    completed: false,
                })
                .collect();
            let json = serde_json::to_string(&tasks).unwrap();
            TaskList::load(Box::new(MemoryStore::with_value(TASKS_KEY, &json)))
        }

        #[test]
        fn test_position() {
            let list = list_with_ids(&["abc", "def"]);
            assert_eq!(list.resolve("2").unwrap(), "def");
            assert_eq!(list.resolve(" 1 ").unwrap(), "abc");
        }

        #[test]
        fn test_unique_prefix() {
            let list = list_with_ids(&["abc", "abd", "xyz"]);
            assert_eq!(list.resolve("x").unwrap(), "xyz");
            assert_eq!(list.resolve("abd").unwrap(), "abd");
        }

        #[test]
        fn test_ambiguous_prefix() {
            let list = list_with_ids(&["abc", "abd"]);
            assert_eq!(
                list.resolve("ab"),
                Err(TaskLookupError::Ambiguous("ab".to_string()))
            );
        }

        #[test]
        fn test_not_found() {
            let list = list_with_ids(&["abc"]);
            assert!(matches!(list.resolve("9"), Err(TaskLookupError::NotFound(_))));
            assert!(matches!(list.resolve("0"), Err(TaskLookupError::NotFound(_))));
            assert!(matches!(list.resolve(""), Err(TaskLookupError::NotFound(_))));
        }
    }
}

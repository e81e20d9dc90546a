use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::utils::percentage::Percentage;

use super::resolve_prefix;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Tasks in display order, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList(Vec<Task>);

impl TaskList {
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Task> {
        self.0.iter().find(|t| t.id == id)
    }

    /// Prepends a task. Blank text is ignored and yields `None`.
    pub fn add(&self, text: &str, now: DateTime<Utc>) -> Option<(TaskList, Uuid)> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let task = Task {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed: false,
            created_at: now,
        };
        let id = task.id;
        let tasks = std::iter::once(task)
            .chain(self.0.iter().cloned())
            .collect::<Vec<_>>();
        Some((Self(tasks), id))
    }

    pub fn toggle(&self, id: Uuid) -> TaskList {
        Self(
            self.0
                .iter()
                .map(|t| {
                    if t.id == id {
                        Task {
                            completed: !t.completed,
                            ..t.clone()
                        }
                    } else {
                        t.clone()
                    }
                })
                .collect(),
        )
    }

    pub fn delete(&self, id: Uuid) -> TaskList {
        Self(self.0.iter().filter(|t| t.id != id).cloned().collect())
    }

    pub fn clear_completed(&self) -> TaskList {
        Self(self.0.iter().filter(|t| !t.completed).cloned().collect())
    }

    pub fn completed_count(&self) -> usize {
        self.0.iter().filter(|t| t.completed).count()
    }

    pub fn pending_count(&self) -> usize {
        self.len() - self.completed_count()
    }

    pub fn completion_rate(&self) -> Percentage {
        Percentage::of(self.completed_count(), self.len())
    }

    pub fn resolve(&self, prefix: &str) -> Result<Uuid> {
        resolve_prefix(self.0.iter().map(|t| t.id), prefix, "task")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::TaskList;

    fn now() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_add_to_empty_list() {
        let (tasks, id) = TaskList::default().add("  Buy milk ", now()).unwrap();

        assert_eq!(tasks.len(), 1);
        let task = tasks.get(id).unwrap();
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert_eq!(task.created_at, now());
    }

    #[test]
    fn test_add_blank_is_ignored() {
        let (tasks, _) = TaskList::default().add("Buy milk", now()).unwrap();

        assert!(tasks.add("", now()).is_none());
        assert!(tasks.add("   \t", now()).is_none());
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn test_add_prepends_with_unique_ids() {
        let (tasks, first) = TaskList::default().add("first", now()).unwrap();
        let (tasks, second) = tasks.add("second", now()).unwrap();

        assert_ne!(first, second);
        let texts = tasks.iter().map(|t| t.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn test_toggle_leaves_previous_list_untouched() {
        let (tasks, id) = TaskList::default().add("write report", now()).unwrap();

        let toggled = tasks.toggle(id);

        assert!(toggled.get(id).unwrap().completed);
        assert!(!tasks.get(id).unwrap().completed);
        assert!(!toggled.toggle(id).get(id).unwrap().completed);
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let (tasks, _) = TaskList::default().add("keep me", now()).unwrap();

        assert_eq!(tasks.delete(Uuid::new_v4()), tasks);
    }

    #[test]
    fn test_clear_completed_keeps_pending_in_order() {
        let (tasks, a) = TaskList::default().add("a", now()).unwrap();
        let (tasks, _) = tasks.add("b", now()).unwrap();
        let (tasks, c) = tasks.add("c", now()).unwrap();
        let (tasks, _) = tasks.add("d", now()).unwrap();
        let tasks = tasks.toggle(a).toggle(c);

        let cleared = tasks.clear_completed();

        let texts = cleared.iter().map(|t| t.text.as_str()).collect::<Vec<_>>();
        assert_eq!(texts, vec!["d", "b"]);
    }

    #[test]
    fn test_counts_and_rate() {
        assert_eq!(TaskList::default().completion_rate().rounded(), 0);

        let (tasks, a) = TaskList::default().add("a", now()).unwrap();
        let (tasks, _) = tasks.add("b", now()).unwrap();
        let (tasks, _) = tasks.add("c", now()).unwrap();
        let tasks = tasks.toggle(a);

        assert_eq!(tasks.completed_count(), 1);
        assert_eq!(tasks.pending_count(), 2);
        assert_eq!(tasks.completion_rate().rounded(), 33);
    }

    #[test]
    fn test_resolve_by_prefix() {
        let (tasks, id) = TaskList::default().add("a", now()).unwrap();

        assert_eq!(tasks.resolve(&id.to_string()[..6]).unwrap(), id);
        assert_eq!(tasks.resolve(&id.to_string()).unwrap(), id);
        assert!(tasks.resolve("zzzz").is_err());
        assert!(tasks.resolve("").is_err());
    }

    #[test]
    fn test_serialized_shape() {
        let (tasks, id) = TaskList::default().add("Buy milk", now()).unwrap();

        let value = serde_json::to_value(&tasks).unwrap();

        assert_eq!(
            value,
            serde_json::json!([{
                "id": id.to_string(),
                "text": "Buy milk",
                "completed": false,
                "createdAt": now().timestamp_millis(),
            }])
        );
    }
}

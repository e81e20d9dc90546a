use anyhow::{anyhow, Result};
use tracing::info;
use uuid::Uuid;

use crate::{
    collections::{
        notes::{EditTarget, Note, NoteList},
        tasks::{Task, TaskList},
    },
    store::{json_store::KeyValueStore, persisted::Persisted, NOTES_KEY, TASKS_KEY},
    utils::clock::Clock,
};

/// The task and note collections together with the clock that stamps them. Both the shell
/// and the one-shot commands mutate state only through here, so every change is persisted
/// before anyone renders it.
pub struct Workspace<S> {
    tasks: Persisted<TaskList, S>,
    notes: Persisted<NoteList, S>,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore + Clone> Workspace<S> {
    pub async fn load(store: S, clock: Box<dyn Clock>) -> Result<Self> {
        let tasks = Persisted::load(store.clone(), TASKS_KEY, TaskList::default()).await?;
        let notes = Persisted::load(store, NOTES_KEY, NoteList::default()).await?;
        Ok(Self {
            tasks,
            notes,
            clock,
        })
    }
}

impl<S: KeyValueStore> Workspace<S> {
    pub fn tasks(&self) -> &TaskList {
        self.tasks.get()
    }

    pub fn notes(&self) -> &NoteList {
        self.notes.get()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    /// Returns the id of the new task, or `None` when the text was blank.
    pub async fn add_task(&mut self, text: &str) -> Result<Option<Uuid>> {
        let Some((tasks, id)) = self.tasks.get().add(text, self.clock.time()) else {
            return Ok(None);
        };
        self.tasks.replace(tasks).await?;
        info!("Added task {id}");
        Ok(Some(id))
    }

    pub async fn toggle_task(&mut self, id_prefix: &str) -> Result<Task> {
        let id = self.tasks.get().resolve(id_prefix)?;
        let tasks = self.tasks.get().toggle(id);
        self.tasks.replace(tasks).await?;
        self.task(id)
    }

    pub async fn delete_task(&mut self, id_prefix: &str) -> Result<Task> {
        let id = self.tasks.get().resolve(id_prefix)?;
        let removed = self.task(id)?;
        let tasks = self.tasks.get().delete(id);
        self.tasks.replace(tasks).await?;
        info!("Deleted task {id}");
        Ok(removed)
    }

    /// Returns how many tasks were removed.
    pub async fn clear_completed(&mut self) -> Result<usize> {
        let removed = self.tasks.get().completed_count();
        if removed == 0 {
            return Ok(0);
        }
        let tasks = self.tasks.get().clear_completed();
        self.tasks.replace(tasks).await?;
        info!("Cleared {removed} completed tasks");
        Ok(removed)
    }

    fn task(&self, id: Uuid) -> Result<Task> {
        self.tasks
            .get()
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Task {id} disappeared"))
    }

    pub fn find_note(&self, id_prefix: &str) -> Result<&Note> {
        let id = self.notes.get().resolve(id_prefix)?;
        self.notes
            .get()
            .get(id)
            .ok_or_else(|| anyhow!("Note {id} disappeared"))
    }

    /// Returns the id of the saved note, or `None` when there was nothing to save.
    pub async fn save_note(
        &mut self,
        target: EditTarget,
        title: &str,
        content: &str,
    ) -> Result<Option<Uuid>> {
        let Some((notes, id)) = self
            .notes
            .get()
            .save(target, title, content, self.clock.time())
        else {
            return Ok(None);
        };
        self.notes.replace(notes).await?;
        info!("Saved note {id}");
        Ok(Some(id))
    }

    /// Deleting an id that is already gone is not an error.
    pub async fn delete_note(&mut self, id: Uuid) -> Result<bool> {
        if self.notes.get().get(id).is_none() {
            return Ok(false);
        }
        let notes = self.notes.get().delete(id);
        self.notes.replace(notes).await?;
        info!("Deleted note {id}");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;
    use uuid::Uuid;

    use crate::{
        collections::notes::EditTarget,
        store::json_store::JsonFileStore,
        utils::clock::FixedClock,
    };

    use super::Workspace;

    fn clock() -> Box<FixedClock> {
        Box::new(FixedClock(Utc.with_ymd_and_hms(2025, 3, 15, 10, 0, 0).unwrap()))
    }

    #[tokio::test]
    async fn test_changes_survive_reload() -> Result<()> {
        let dir = tempdir()?;
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf())?);
        let mut workspace = Workspace::load(store.clone(), clock()).await?;

        let id = workspace.add_task("Buy milk").await?.unwrap();
        workspace.toggle_task(&id.to_string()[..8]).await?;
        workspace.save_note(EditTarget::New, "", "remember the milk").await?;

        let reloaded = Workspace::load(store, clock()).await?;
        assert_eq!(reloaded.tasks(), workspace.tasks());
        assert!(reloaded.tasks().get(id).unwrap().completed);
        assert_eq!(reloaded.notes().len(), 1);
        assert_eq!(
            reloaded.notes().iter().next().unwrap().title,
            "Untitled Note"
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_submissions_do_not_write() -> Result<()> {
        let dir = tempdir()?;
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf())?);
        let mut workspace = Workspace::load(store, clock()).await?;

        assert_eq!(workspace.add_task("   ").await?, None);
        assert_eq!(workspace.save_note(EditTarget::New, "", " ").await?, None);

        assert!(!dir.path().join("tasks.json").exists());
        assert!(!dir.path().join("notes.json").exists());
        Ok(())
    }

    #[tokio::test]
    async fn test_clear_completed_and_delete() -> Result<()> {
        let dir = tempdir()?;
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf())?);
        let mut workspace = Workspace::load(store, clock()).await?;

        let a = workspace.add_task("a").await?.unwrap();
        let b = workspace.add_task("b").await?.unwrap();
        workspace.add_task("c").await?;
        workspace.toggle_task(&a.to_string()).await?;

        assert_eq!(workspace.clear_completed().await?, 1);
        assert_eq!(workspace.clear_completed().await?, 0);
        let removed = workspace.delete_task(&b.to_string()).await?;
        assert_eq!(removed.text, "b");
        assert_eq!(workspace.tasks().len(), 1);
        assert!(workspace.toggle_task(&b.to_string()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_note_is_not_an_error() -> Result<()> {
        let dir = tempdir()?;
        let store = Arc::new(JsonFileStore::new(dir.path().to_path_buf())?);
        let mut workspace = Workspace::load(store, clock()).await?;
        workspace.save_note(EditTarget::New, "keep", "").await?;

        assert!(!workspace.delete_note(Uuid::new_v4()).await?);
        assert_eq!(workspace.notes().len(), 1);
        Ok(())
    }
}

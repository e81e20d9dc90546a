use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::resolve_prefix;

pub const UNTITLED_NOTE: &str = "Untitled Note";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// What the editor is saving into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    New,
    Existing(Uuid),
}

/// Notes in display order, most recent first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteList(Vec<Note>);

impl NoteList {
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Note> {
        self.0.iter().find(|n| n.id == id)
    }

    /// Saves the editor contents. A draft with both fields blank is dropped and yields `None`,
    /// as does an edit of a note that no longer exists. Otherwise returns the new list and the
    /// id of the saved note.
    pub fn save(
        &self,
        target: EditTarget,
        title: &str,
        content: &str,
        now: DateTime<Utc>,
    ) -> Option<(NoteList, Uuid)> {
        if title.trim().is_empty() && content.trim().is_empty() {
            return None;
        }
        let title = match title.trim() {
            "" => UNTITLED_NOTE.to_string(),
            v => v.to_string(),
        };

        match target {
            EditTarget::New => {
                let note = Note {
                    id: Uuid::new_v4(),
                    title,
                    content: content.to_string(),
                    updated_at: now,
                };
                let id = note.id;
                let notes = std::iter::once(note)
                    .chain(self.0.iter().cloned())
                    .collect::<Vec<_>>();
                Some((Self(notes), id))
            }
            EditTarget::Existing(id) => {
                self.get(id)?;
                let notes = self
                    .0
                    .iter()
                    .map(|n| {
                        if n.id == id {
                            Note {
                                id,
                                title: title.clone(),
                                content: content.to_string(),
                                updated_at: now,
                            }
                        } else {
                            n.clone()
                        }
                    })
                    .collect();
                Some((Self(notes), id))
            }
        }
    }

    pub fn delete(&self, id: Uuid) -> NoteList {
        Self(self.0.iter().filter(|n| n.id != id).cloned().collect())
    }

    pub fn resolve(&self, prefix: &str) -> Result<Uuid> {
        resolve_prefix(self.0.iter().map(|n| n.id), prefix, "note")
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use uuid::Uuid;

    use super::{EditTarget, NoteList, UNTITLED_NOTE};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 16, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_save_new_note() {
        let (notes, id) = NoteList::default()
            .save(EditTarget::New, " Groceries ", "milk\neggs", now())
            .unwrap();

        let note = notes.get(id).unwrap();
        assert_eq!(note.title, "Groceries");
        assert_eq!(note.content, "milk\neggs");
        assert_eq!(note.updated_at, now());
    }

    #[test]
    fn test_blank_title_gets_placeholder() {
        let (notes, id) = NoteList::default()
            .save(EditTarget::New, "   ", "just content", now())
            .unwrap();

        assert_eq!(notes.get(id).unwrap().title, UNTITLED_NOTE);
    }

    #[test]
    fn test_blank_draft_is_dropped() {
        assert!(NoteList::default()
            .save(EditTarget::New, " ", "\n ", now())
            .is_none());
    }

    #[test]
    fn test_edit_replaces_in_place_and_refreshes_timestamp() {
        let (notes, first) = NoteList::default()
            .save(EditTarget::New, "first", "", now())
            .unwrap();
        let (notes, _) = notes.save(EditTarget::New, "second", "", now()).unwrap();
        let later = now() + Duration::minutes(5);

        let (edited, id) = notes
            .save(EditTarget::Existing(first), "first, edited", "body", later)
            .unwrap();

        assert_eq!(id, first);
        assert_eq!(edited.len(), 2);
        let titles = edited.iter().map(|n| n.title.as_str()).collect::<Vec<_>>();
        assert_eq!(titles, vec!["second", "first, edited"]);
        assert_eq!(edited.get(first).unwrap().updated_at, later);
    }

    #[test]
    fn test_edit_of_missing_note_is_dropped() {
        let (notes, _) = NoteList::default()
            .save(EditTarget::New, "only", "", now())
            .unwrap();

        assert!(notes
            .save(EditTarget::Existing(Uuid::new_v4()), "ghost", "", now())
            .is_none());
    }

    #[test]
    fn test_delete_unknown_id_is_noop() {
        let (notes, _) = NoteList::default()
            .save(EditTarget::New, "only", "", now())
            .unwrap();

        assert_eq!(notes.delete(Uuid::new_v4()), notes);
    }

    #[test]
    fn test_delete_removes_note() {
        let (notes, id) = NoteList::default()
            .save(EditTarget::New, "gone soon", "", now())
            .unwrap();

        assert!(notes.delete(id).is_empty());
    }
}

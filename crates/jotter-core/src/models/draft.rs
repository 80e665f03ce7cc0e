//! Draft model: the editor's local copy of a note

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{CategoryId, Note, NoteId, NotePayload};

/// In-memory note being edited.
///
/// A draft with `remote_id` set has been created on the server at least once
/// and is only ever updated in place afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    pub title: String,
    pub content: String,
    pub category_id: Option<CategoryId>,
    pub remote_id: Option<NoteId>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Draft {
    /// Hydrate a bound draft from a fetched note.
    #[must_use]
    pub fn from_note(note: &Note) -> Self {
        Self {
            title: note.title.clone(),
            content: note.content.clone(),
            category_id: Some(note.category),
            remote_id: Some(note.id),
            created_at: note.created_at,
        }
    }

    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.remote_id.is_some()
    }

    /// No title, no content and no (non-zero) category.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.content.is_empty() && self.selected_category().is_none()
    }

    /// The chosen category, treating id 0 as "none selected".
    #[must_use]
    pub fn selected_category(&self) -> Option<CategoryId> {
        self.category_id.filter(|id| id.get() != 0)
    }

    /// Request body for this draft, substituting `fallback` for a missing category.
    #[must_use]
    pub fn payload(&self, fallback: CategoryId) -> NotePayload {
        NotePayload {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.selected_category().unwrap_or(fallback),
        }
    }

    /// Record the identity the server assigned on first save.
    ///
    /// Identity and creation time are only ever set once.
    pub fn bind(&mut self, note: &Note) {
        if self.remote_id.is_none() {
            self.remote_id = Some(note.id);
        }
        if self.created_at.is_none() {
            self.created_at = note.created_at;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64) -> Note {
        Note {
            id: NoteId::new(id),
            title: "Groceries".to_string(),
            content: "milk, eggs".to_string(),
            created_at: DateTime::from_timestamp(1_704_467_232, 0),
            category: CategoryId::new(2),
        }
    }

    #[test]
    fn new_draft_is_blank_and_unbound() {
        let draft = Draft::default();
        assert!(draft.is_blank());
        assert!(!draft.is_bound());
    }

    #[test]
    fn zero_category_counts_as_blank() {
        let draft = Draft {
            category_id: Some(CategoryId::new(0)),
            ..Draft::default()
        };
        assert!(draft.is_blank());
        assert_eq!(draft.payload(CategoryId::new(1)).category, CategoryId::new(1));
    }

    #[test]
    fn payload_keeps_selected_category() {
        let draft = Draft {
            title: "Groceries".to_string(),
            category_id: Some(CategoryId::new(2)),
            ..Draft::default()
        };
        assert_eq!(draft.payload(CategoryId::new(1)).category, CategoryId::new(2));
    }

    #[test]
    fn bind_never_changes_identity() {
        let mut draft = Draft::default();
        draft.bind(&note(7));
        draft.bind(&Note {
            created_at: None,
            ..note(9)
        });
        assert_eq!(draft.remote_id, Some(NoteId::new(7)));
        assert!(draft.created_at.is_some());
    }

    #[test]
    fn from_note_is_bound() {
        let draft = Draft::from_note(&note(7));
        assert!(draft.is_bound());
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.category_id, Some(CategoryId::new(2)));
    }
}

//! Note model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::CategoryId;

/// Server-assigned note identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

/// A note as returned by the notes API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Set by the server on creation
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// The list endpoint sends a bare id, the detail endpoint an object
    #[serde(deserialize_with = "deserialize_category_ref")]
    pub category: CategoryId,
}

/// Request body for creating or updating a note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotePayload {
    pub title: String,
    pub content: String,
    pub category: CategoryId,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryRef {
    Id(CategoryId),
    Object { id: CategoryId },
}

fn deserialize_category_ref<'de, D>(deserializer: D) -> Result<CategoryId, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CategoryRef::deserialize(deserializer)? {
        CategoryRef::Id(id) | CategoryRef::Object { id } => id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_item_with_bare_category_id() {
        let note: Note = serde_json::from_str(
            r#"{"id": 7, "title": "Groceries", "content": "milk, eggs",
                "created_at": "2024-01-05T15:07:12.345678Z", "category": 2}"#,
        )
        .unwrap();
        assert_eq!(note.id, NoteId::new(7));
        assert_eq!(note.category, CategoryId::new(2));
        assert_eq!(
            note.created_at.map(|at| at.timestamp()),
            Some(1_704_467_232)
        );
    }

    #[test]
    fn detail_with_nested_category_object() {
        let note: Note = serde_json::from_str(
            r##"{"id": 7, "title": "Groceries", "content": "milk",
                "created_at": "2024-01-05T15:07:12+01:00",
                "category": {"id": 3, "name": "School", "color": "#FFFFFF"}}"##,
        )
        .unwrap();
        assert_eq!(note.category, CategoryId::new(3));
        assert_eq!(
            note.created_at.map(|at| at.to_rfc3339()),
            Some("2024-01-05T14:07:12+00:00".to_string())
        );
    }

    #[test]
    fn missing_created_at_is_none() {
        let note: Note =
            serde_json::from_str(r#"{"id": 1, "title": "", "content": "", "category": 1}"#)
                .unwrap();
        assert!(note.created_at.is_none());
    }

    #[test]
    fn payload_serializes_category_as_integer() {
        let payload = NotePayload {
            title: "Groceries".to_string(),
            content: "milk, eggs".to_string(),
            category: CategoryId::new(2),
        };
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            serde_json::json!({"title": "Groceries", "content": "milk, eggs", "category": 2})
        );
    }
}

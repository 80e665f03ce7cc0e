//! Shared sync-status type published by the editor.

use crate::models::NoteId;

/// Where the editor stands relative to the server copy of its draft.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum SyncStatus {
    /// Nothing has been saved in this session yet
    #[default]
    Idle,
    Saving,
    Saved(NoteId),
    Failed(String),
}

impl SyncStatus {
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Saving => "saving",
            Self::Saved(_) => "saved",
            Self::Failed(_) => "failed",
        }
    }
}

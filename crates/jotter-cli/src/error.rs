use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] jotter_core::Error),
    #[error(transparent)]
    Save(#[from] jotter_core::editor::SaveError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Invalid note ID: {0}")]
    InvalidNoteId(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Not logged in. Run `jotter auth login --email <email> --password <password>` first.")]
    NotLoggedIn,
}

//! jotter-core - Core library for Jotter
//!
//! This crate contains the models, session handling, API clients, and the
//! debounced autosave editor shared by every Jotter front end.

pub mod api;
pub mod auth;
pub mod config;
pub mod editor;
pub mod error;
pub mod format;
pub mod models;
pub mod session;
pub mod state;
pub mod util;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use models::{Category, CategoryId, Draft, Note, NoteId};

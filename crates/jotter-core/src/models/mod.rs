//! Data models for Jotter

mod category;
mod draft;
mod note;

pub use category::{Category, CategoryId, HexColor, ParseColorError, DEFAULT_CATEGORY_COLOR};
pub use draft::Draft;
pub use note::{Note, NoteId, NotePayload};

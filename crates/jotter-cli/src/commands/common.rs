use std::collections::HashMap;
use std::io::{self, IsTerminal, Read};

use chrono::{DateTime, Local, Utc};
use jotter_core::format::format_card_date;
use jotter_core::{Category, CategoryId, Note, NoteId};
use serde::Serialize;

use crate::error::CliError;

pub const EMPTY_NOTES_MESSAGE: &str = "I'm just here waiting for your charming notes...";

/// List cards draw their border this much darker than the category color.
pub const CARD_BORDER_DARKEN: u8 = 30;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub color: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub card_date: Option<String>,
}

/// Lookup from category id to its server record.
pub fn index_categories(categories: &[Category]) -> HashMap<CategoryId, &Category> {
    categories
        .iter()
        .map(|category| (category.id, category))
        .collect()
}

pub fn category_label(
    category_id: CategoryId,
    categories: &HashMap<CategoryId, &Category>,
) -> String {
    categories
        .get(&category_id)
        .map_or_else(|| format!("#{category_id}"), |category| category.name.clone())
}

pub fn format_note_lines(notes: &[Note], categories: &[Category]) -> Vec<String> {
    if notes.is_empty() {
        return vec![EMPTY_NOTES_MESSAGE.to_string()];
    }

    let index = index_categories(categories);
    notes
        .iter()
        .map(|note| {
            let date = note
                .created_at
                .map(|at| format_card_date(&at.with_timezone(&Local)))
                .unwrap_or_default();
            let category = category_label(note.category, &index);
            let title = if note.title.trim().is_empty() {
                "(untitled)".to_string()
            } else {
                note_preview(&note.title, 30)
            };
            let preview = note_preview(&note.content, 40);
            format!(
                "{:<6}  {date:<6}  {category:<14}  {title:<30}  {preview}",
                note.id.get()
            )
        })
        .collect()
}

pub fn format_category_lines(categories: &[Category]) -> Vec<String> {
    categories
        .iter()
        .map(|category| {
            format!(
                "{:<4}  {:<20}  {}  (border {})",
                category.id.get(),
                category.name,
                category.color,
                category.color.darken(CARD_BORDER_DARKEN)
            )
        })
        .collect()
}

pub fn note_to_list_item(
    note: &Note,
    categories: &HashMap<CategoryId, &Category>,
) -> NoteListItem {
    let category = categories.get(&note.category);
    NoteListItem {
        id: note.id.get(),
        title: note.title.clone(),
        preview: note_preview(&note.content, 80),
        category_id: note.category.get(),
        category_name: category.map(|category| category.name.clone()),
        color: category.map(|category| category.color.to_string()),
        created_at: note.created_at,
        card_date: note
            .created_at
            .map(|at| format_card_date(&at.with_timezone(&Local))),
    }
}

/// Newest first; notes the server has not stamped sort last.
pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|left, right| right.created_at.cmp(&left.created_at));
}

pub fn note_preview(text: &str, max_chars: usize) -> String {
    let first_line = text.lines().next().unwrap_or("").trim();
    let collapsed = first_line.split_whitespace().collect::<Vec<_>>().join(" ");

    if collapsed.chars().count() <= max_chars {
        collapsed
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = collapsed.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_note_id(raw: &str) -> Result<NoteId, CliError> {
    let id = raw
        .parse::<NoteId>()
        .map_err(|_| CliError::InvalidNoteId(raw.trim().to_string()))?;
    if id.get() <= 0 {
        return Err(CliError::InvalidNoteId(raw.trim().to_string()));
    }
    Ok(id)
}

pub fn parse_category_id(raw: i64) -> Result<CategoryId, CliError> {
    if raw <= 0 {
        return Err(CliError::Config(format!(
            "category must be a positive id, got {raw}"
        )));
    }
    Ok(CategoryId::new(raw))
}

pub fn resolve_note_content(content: Option<String>) -> Result<String, CliError> {
    if let Some(content) = content.as_deref().and_then(normalize_content) {
        return Ok(content);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

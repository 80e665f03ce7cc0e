//! Interactive line editor backed by the autosave controller.
//!
//! Plain lines are appended to the note content; lines starting with `:` are
//! commands. Every change restarts the autosave timer.

use jotter_core::api::NoteRemote;
use jotter_core::editor::{Editor, EditorSettings, SaveError};
use jotter_core::state::SyncStatus;
use jotter_core::{CategoryId, Note};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::auth::ProfileContext;
use crate::commands::common::parse_note_id;
use crate::error::CliError;

const HELP: &str = "Type to append lines. Commands: :title <text>, :category <id>, :save, :quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorLine {
    Append(String),
    Title(String),
    Category(Option<CategoryId>),
    Save,
    Quit,
    Help,
    Invalid(String),
}

pub fn parse_line(line: &str) -> EditorLine {
    let Some(command) = line.strip_prefix(':') else {
        return EditorLine::Append(line.to_string());
    };

    let (name, argument) = command
        .split_once(char::is_whitespace)
        .map_or((command, ""), |(name, rest)| (name, rest.trim()));
    match name {
        "title" => EditorLine::Title(argument.to_string()),
        "category" if argument.is_empty() => EditorLine::Category(None),
        "category" => match argument.parse::<CategoryId>() {
            Ok(id) if id.get() > 0 => EditorLine::Category(Some(id)),
            _ => EditorLine::Invalid(format!("Not a category id: {argument}")),
        },
        "save" | "w" => EditorLine::Save,
        "quit" | "q" | "wq" => EditorLine::Quit,
        "help" | "h" => EditorLine::Help,
        _ => EditorLine::Invalid(format!("Unknown command :{name}")),
    }
}

pub fn append_line(content: &str, line: &str) -> String {
    if content.is_empty() {
        line.to_string()
    } else {
        format!("{content}\n{line}")
    }
}

pub async fn run_edit(id: Option<&str>, global_profile: Option<&str>) -> Result<(), CliError> {
    let id = id.map(parse_note_id).transpose()?;
    let profile = ProfileContext::load(global_profile)?;
    let api = profile.notes_api()?;
    let settings = EditorSettings::from_config(&profile.config);

    let editor = match id {
        Some(id) => {
            let editor = Editor::open(api, settings, id).await;
            if editor.remote_id().is_none() {
                eprintln!("Could not load note {id}; starting a new note.");
            }
            editor
        }
        None => Editor::new(api, settings),
    };

    print_header(&editor);
    let status_task = tokio::spawn(report_status(editor.status()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            EditorLine::Append(text) => {
                let content = append_line(&editor.draft().content, &text);
                editor.set_content(content);
            }
            EditorLine::Title(title) => editor.set_title(title),
            EditorLine::Category(category) => editor.set_category(category),
            EditorLine::Save => {
                if flush(&editor).await?.is_none() {
                    eprintln!("Nothing to save.");
                }
            }
            EditorLine::Quit => break,
            EditorLine::Help => eprintln!("{HELP}"),
            EditorLine::Invalid(message) => eprintln!("{message}"),
        }
    }

    let result = flush(&editor).await;
    editor.close();
    drop(editor);
    status_task.abort();

    if let Some(note) = result? {
        println!("{}", note.id);
    }
    Ok(())
}

/// Save outstanding edits, waiting for any save already in flight.
pub async fn flush<R: NoteRemote>(editor: &Editor<R>) -> Result<Option<Note>, CliError> {
    let draft = editor.draft();
    if !draft.is_bound() && draft.is_blank() {
        return Ok(None);
    }
    let mut status = editor.status();
    loop {
        match editor.save_now().await {
            Err(SaveError::InFlight) => {
                if status.changed().await.is_err() {
                    return Ok(None);
                }
            }
            Ok(note) => return Ok(note),
            Err(error) => return Err(error.into()),
        }
    }
}

fn print_header<R: NoteRemote>(editor: &Editor<R>) {
    let draft = editor.draft();
    match draft.remote_id {
        Some(id) => eprintln!("Editing note {id}: {}", draft.title),
        None => eprintln!("New note"),
    }
    if let Some(label) = editor.last_edited_label() {
        eprintln!("{label}");
    }
    if !draft.content.is_empty() {
        eprintln!("{}", draft.content);
    }
    eprintln!("{HELP}");
}

async fn report_status(mut status: tokio::sync::watch::Receiver<SyncStatus>) {
    while status.changed().await.is_ok() {
        let current = status.borrow_and_update().clone();
        if let Some(line) = status_line(&current) {
            eprintln!("{line}");
        }
    }
}

/// Line shown for a status change; in-progress states stay quiet.
pub fn status_line(status: &SyncStatus) -> Option<String> {
    match status {
        SyncStatus::Saved(id) => Some(format!("[{} note {id}]", status.label())),
        SyncStatus::Failed(message) => Some(format!("[save {}: {message}]", status.label())),
        SyncStatus::Idle | SyncStatus::Saving => None,
    }
}

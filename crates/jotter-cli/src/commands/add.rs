use jotter_core::editor::{Editor, EditorSettings};

use crate::auth::ProfileContext;
use crate::commands::common::{parse_category_id, resolve_note_content};
use crate::error::CliError;

pub async fn run_new(
    title: String,
    content: Option<String>,
    category: Option<i64>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let content = resolve_note_content(content)?;
    let category = category.map(parse_category_id).transpose()?;

    let profile = ProfileContext::load(global_profile)?;
    let editor = Editor::new(
        profile.notes_api()?,
        EditorSettings::from_config(&profile.config),
    );
    editor.set_title(title.trim());
    editor.set_content(content);
    editor.set_category(category);

    let note = editor.save_now().await?;
    editor.close();

    match note {
        Some(note) => println!("{}", note.id),
        None => return Err(CliError::EmptyContent),
    }
    Ok(())
}

use chrono::Local;
use jotter_core::format::format_last_edited;

use crate::auth::ProfileContext;
use crate::commands::common::{
    category_label, format_category_lines, format_note_lines, index_categories,
    note_to_list_item, parse_category_id, parse_note_id, sort_newest_first, NoteListItem,
};
use crate::error::CliError;

pub async fn run_categories(as_json: bool, global_profile: Option<&str>) -> Result<(), CliError> {
    let api = ProfileContext::load(global_profile)?.notes_api()?;
    let categories = api.list_categories().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&categories)?);
    } else {
        for line in format_category_lines(&categories) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_list(
    category: Option<i64>,
    as_json: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let category = category.map(parse_category_id).transpose()?;
    let api = ProfileContext::load(global_profile)?.notes_api()?;
    let (categories, mut notes) =
        tokio::try_join!(api.list_categories(), api.list_notes(category))?;
    sort_newest_first(&mut notes);

    if as_json {
        let index = index_categories(&categories);
        let json_items = notes
            .iter()
            .map(|note| note_to_list_item(note, &index))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else {
        for line in format_note_lines(&notes, &categories) {
            println!("{line}");
        }
    }

    Ok(())
}

pub async fn run_show(
    id: &str,
    as_json: bool,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let id = parse_note_id(id)?;
    let api = ProfileContext::load(global_profile)?.notes_api()?;
    let (categories, note) = tokio::try_join!(api.list_categories(), api.get_note(id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&note)?);
        return Ok(());
    }

    let index = index_categories(&categories);
    println!("{}", note.title);
    if let Some(created_at) = note.created_at {
        println!("{}", format_last_edited(&created_at.with_timezone(&Local)));
    }
    println!("Category: {}", category_label(note.category, &index));
    println!();
    println!("{}", note.content);
    Ok(())
}

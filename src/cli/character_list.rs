use crate::api::client::EveClient;
use crate::core::selection::CharacterSelection;
use crate::core::views::CharactersView;
use std::error::Error;
use std::fmt::{self, Write as _};

pub async fn list_characters(
    client: &EveClient,
    limit: Option<u32>,
    select: Option<i64>,
) -> Result<(), Box<dyn Error>> {
    let view = CharactersView::load(client, limit).await?;

    if let Some(id) = select {
        if !view.select(id) {
            eprintln!("⚠️  Character #{id} is not in the list; keeping the current selection");
        }
    }

    print!("{}", render_character_list(&view.snapshot())?);
    Ok(())
}

pub fn render_character_list(selection: &CharacterSelection) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if selection.items().is_empty() {
        writeln!(out, "No characters found.")?;
        return Ok(out);
    }

    writeln!(out, "Available characters:\n")?;
    for character in selection.items() {
        let marker = if selection.is_selected(character.id) {
            "▶"
        } else {
            " "
        };
        let default_tag = if character.is_default { " [default]" } else { "" };
        writeln!(
            out,
            "{marker} #{:<4} {}{default_tag}",
            character.id, character.name
        )?;
    }

    if let Some(selected) = selection.selected() {
        writeln!(out)?;
        writeln!(out, "Selected: {}", selected.name)?;
        if !selected.description.is_empty() {
            writeln!(out, "  {}", selected.description)?;
        }
        if let Some(emotions) = selected.enabled_emotions.as_ref().filter(|e| !e.is_empty()) {
            let names: Vec<&str> = emotions.iter().map(|e| e.as_str()).collect();
            writeln!(out, "  Traits: {}", names.join(", "))?;
        }
        writeln!(out)?;
        writeln!(out, "💡 Start chatting with: eve conversations {}", selected.id)?;
    }
    Ok(out)
}

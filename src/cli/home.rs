use crate::api::client::EveClient;
use crate::core::views::HomeView;
use chrono::Local;
use std::error::Error;
use std::fmt::{self, Write as _};

pub async fn show_home(client: &EveClient, limit: u32) -> Result<(), Box<dyn Error>> {
    let view = HomeView::load(client, limit).await?;
    let today = Local::now().format("%A, %d %B %Y").to_string();
    print!("{}", render_home(&view, &today)?);
    Ok(())
}

pub fn render_home(view: &HomeView, today: &str) -> Result<String, fmt::Error> {
    let mut out = String::new();
    writeln!(out, "📅 {today}")?;
    writeln!(out)?;

    match &view.default_character {
        Some(character) => {
            writeln!(out, "💬 Resume conversation with {}", character.name)?;
            if !character.description.is_empty() {
                writeln!(out, "   {}", character.description)?;
            }
        }
        None => writeln!(out, "💬 No default character set")?,
    }
    writeln!(out)?;

    if view.characters.is_empty() {
        writeln!(out, "No characters yet.")?;
    } else {
        writeln!(out, "Characters:")?;
        for character in &view.characters {
            writeln!(out, "  • {} (#{})", character.name, character.id)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "💡 See all characters with: eve characters")?;
    Ok(out)
}

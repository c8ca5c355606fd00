use crate::api::client::EveClient;
use crate::api::{parse_timestamp, Character};
use std::error::Error;
use std::fmt::{self, Write as _};

pub async fn show_character(client: &EveClient, id: i64) -> Result<(), Box<dyn Error>> {
    let character = client
        .get_specific_character(id)
        .await?
        .with_decoded_json_fields();
    print!("{}", render_character(&character)?);
    Ok(())
}

pub async fn show_default_character(client: &EveClient) -> Result<(), Box<dyn Error>> {
    let character = client
        .get_default_character()
        .await?
        .with_decoded_json_fields();
    print!("{}", render_character(&character)?);
    Ok(())
}

fn field(out: &mut String, label: &str, value: Option<&str>) -> fmt::Result {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => writeln!(out, "  {label:<18} {value}"),
        None => Ok(()),
    }
}

pub fn render_character(character: &Character) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mut title = format!("{} (#{})", character.name, character.id);
    if character.is_default {
        title.push_str(" [default]");
    }
    if !character.is_active {
        title.push_str(" [inactive]");
    }
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "━".repeat(title.chars().count()))?;

    field(&mut out, "Description", Some(&character.description))?;
    field(&mut out, "Personality", Some(&character.personality))?;
    field(&mut out, "Role in world", character.role_in_world.as_deref())?;
    field(&mut out, "World context", character.world_context.as_deref())?;
    field(&mut out, "Avatar", Some(&character.avatar))?;
    field(&mut out, "Model", Some(&character.vrm_path))?;

    writeln!(out)?;
    writeln!(out, "Behavior")?;
    field(&mut out, "Speech pattern", character.speech_pattern.as_deref())?;
    field(
        &mut out,
        "Sentence length",
        character.sentence_length_preference.as_deref(),
    )?;
    let response_length = character
        .response_length_default
        .as_ref()
        .map(|r| r.to_string());
    field(&mut out, "Response length", response_length.as_deref())?;
    let ask = format!("{:.0}%", character.ask_questions_frequency * 100.0);
    field(&mut out, "Asks questions", Some(&ask))?;
    field(&mut out, "Emoticons", Some(&character.emoticons_frequency))?;
    field(
        &mut out,
        "Memory",
        character.memory_retention_preference.as_deref(),
    )?;
    match &character.favorite_phrases {
        Some(phrases) if !phrases.is_empty() => {
            let quoted: Vec<String> = phrases.iter().map(|p| format!("\"{p}\"")).collect();
            field(&mut out, "Favorite phrases", Some(&quoted.join(", ")))?;
        }
        _ => {}
    }

    writeln!(out)?;
    writeln!(out, "Emotions")?;
    field(&mut out, "Default", Some(&character.default_emotion))?;
    match &character.enabled_emotions {
        Some(emotions) => {
            let names: Vec<&str> = emotions.iter().map(|e| e.as_str()).collect();
            field(&mut out, "Enabled", Some(&names.join(", ")))?;
        }
        None => field(&mut out, "Enabled", Some("(unknown)"))?,
    }

    if character.voice_id.is_some() || character.speech_rate.is_some() || character.pitch.is_some()
    {
        writeln!(out)?;
        writeln!(out, "Voice")?;
        field(&mut out, "Voice", character.voice_id.as_deref())?;
        let rate = character.speech_rate.map(|r| format!("{r:.2}"));
        field(&mut out, "Speech rate", rate.as_deref())?;
        let pitch = character.pitch.map(|p| format!("{p:.2}"));
        field(&mut out, "Pitch", pitch.as_deref())?;
    }

    let last_seen = character
        .last_interaction_at
        .as_deref()
        .and_then(parse_timestamp)
        .map(|ts| ts.format("%Y-%m-%d %H:%M UTC").to_string());
    if let Some(last_seen) = last_seen {
        writeln!(out)?;
        field(&mut out, "Last interaction", Some(&last_seen))?;
    }
    Ok(out)
}

use crate::api::client::EveClient;
use crate::api::AiConfig;
use std::error::Error;
use std::fmt::{self, Write as _};

pub async fn show_ai_config(client: &EveClient) -> Result<(), Box<dyn Error>> {
    let config = client.get_config().await?;
    print!("{}", render_ai_config(&config)?);
    Ok(())
}

/// Keep just enough of a key to recognize it.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}…{tail}")
}

pub fn render_ai_config(config: &AiConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    let mode = match config.mode_kind() {
        Some(_) => config.mode.to_lowercase(),
        None => format!("{} (unrecognized)", config.mode),
    };
    writeln!(out, "AI configuration:")?;
    writeln!(out, "  mode: {mode}")?;
    writeln!(out, "  model: {}", config.model_name)?;
    writeln!(out, "  gpu-layers: {}", config.gpu_layers)?;
    writeln!(out, "  temperature: {:.2}", config.temperature)?;
    writeln!(out, "  max-tokens: {}", config.max_tokens)?;
    writeln!(
        out,
        "  memory-length: {} messages",
        config.conversation_memory_length
    )?;
    writeln!(
        out,
        "  emotion-threshold: {:.2}",
        config.emotion_confidence_threshold
    )?;
    for (label, key) in [
        ("openai-api-key", &config.openai_api_key),
        ("anthropic-api-key", &config.anthropic_api_key),
    ] {
        match key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => writeln!(out, "  {label}: {}", mask_secret(key))?,
            None => writeln!(out, "  {label}: (unset)")?,
        }
    }
    Ok(out)
}

use crate::api::client::{EveClient, HistoryQuery};
use crate::api::{parse_timestamp, Conversation, HistoryPage, ROLE_ASSISTANT, ROLE_SYSTEM, ROLE_USER};
use crate::core::views::ChatView;
use std::error::Error;
use std::fmt::{self, Write as _};

pub async fn list_conversations(
    client: &EveClient,
    character_id: i64,
    as_json: bool,
) -> Result<(), Box<dyn Error>> {
    if as_json {
        let raw = client.get_conversations(character_id).await?;
        println!("{}", serde_json::to_string_pretty(&raw)?);
        return Ok(());
    }

    let view = ChatView::load(client, character_id).await?;
    print!(
        "{}",
        render_conversations(&view.character.name, &view.conversations)?
    );
    Ok(())
}

pub async fn show_history(
    client: &EveClient,
    character_id: i64,
    conversation_id: i64,
    query: HistoryQuery,
) -> Result<(), Box<dyn Error>> {
    let page = client
        .get_chat_history(character_id, conversation_id, query)
        .await?;
    print!("{}", render_history(&page)?);
    Ok(())
}

fn short_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|ts| ts.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| raw.to_string())
}

pub fn render_conversations(
    character_name: &str,
    conversations: &[Conversation],
) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if conversations.is_empty() {
        writeln!(out, "No conversations with {character_name} yet.")?;
        return Ok(out);
    }

    writeln!(out, "Conversations with {character_name}:\n")?;
    for conversation in conversations {
        let title = conversation
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or("(untitled)");
        let status = if conversation.is_active { "" } else { " [archived]" };
        writeln!(out, "  #{:<4} {title}{status}", conversation.id)?;
        let mut meta = format!("{} messages", conversation.message_count);
        if !conversation.last_activity.is_empty() {
            write!(meta, ", last active {}", short_time(&conversation.last_activity))?;
        }
        writeln!(out, "        {meta}")?;
    }
    Ok(out)
}

fn speaker(role: &str) -> &str {
    match role {
        ROLE_USER => "You",
        ROLE_ASSISTANT => "AI",
        ROLE_SYSTEM => "System",
        other => other,
    }
}

pub fn render_history(page: &HistoryPage) -> Result<String, fmt::Error> {
    let mut out = String::new();
    if page.messages.is_empty() {
        writeln!(out, "No messages (total {}).", page.total)?;
        return Ok(out);
    }

    let first = page.offset + 1;
    let last = page.offset + page.messages.len() as i64;
    writeln!(out, "Messages {first}-{last} of {}\n", page.total)?;
    for message in &page.messages {
        let mut header = format!("[{}] {}", short_time(&message.created_at), speaker(&message.role));
        if let Some(emotion) = message.emotion.as_deref().filter(|e| !e.is_empty()) {
            match message.emotion_intensity {
                Some(intensity) => write!(header, " ({emotion}, {:.0}%)", intensity * 100.0)?,
                None => write!(header, " ({emotion})")?,
            }
        }
        writeln!(out, "{header}")?;
        for line in message.content.lines() {
            writeln!(out, "  {line}")?;
        }
        writeln!(out)?;
    }

    if last < page.total {
        writeln!(out, "💡 More messages available: use --offset {last}")?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn renders_conversation_summaries() {
        let conversations: Vec<Conversation> = serde_json::from_value(json!([
            {"id": 3, "character_id": 1, "title": "Evening chat", "message_count": 12,
             "is_active": true, "last_activity": "2025-01-05T21:15:00"},
            {"id": 4, "character_id": 1, "title": "  ", "message_count": 0, "is_active": false}
        ]))
        .unwrap();

        let out = render_conversations("Avangarda", &conversations).unwrap();

        assert!(out.starts_with("Conversations with Avangarda:"));
        assert!(out.contains("#3    Evening chat\n"));
        assert!(out.contains("12 messages, last active 2025-01-05 21:15"));
        assert!(out.contains("#4    (untitled) [archived]"));
    }

    #[test]
    fn renders_empty_conversation_list() {
        assert_eq!(
            render_conversations("Mika", &[]).unwrap(),
            "No conversations with Mika yet.\n"
        );
    }

    #[test]
    fn renders_history_page_with_paging_hint() {
        let page: HistoryPage = serde_json::from_value(json!({
            "total": 5, "limit": 2, "offset": 0,
            "messages": [
                {"id": 1, "role": "user", "content": "Hi!", "created_at": "2025-01-05T21:15:00"},
                {"id": 2, "role": "assistant", "content": "Hello.\nMissed me?",
                 "created_at": "2025-01-05T21:15:03", "emotion": "smug", "emotion_intensity": 0.75}
            ]
        }))
        .unwrap();

        let out = render_history(&page).unwrap();

        assert!(out.starts_with("Messages 1-2 of 5"));
        assert!(out.contains("[2025-01-05 21:15] You\n  Hi!\n"));
        assert!(out.contains("AI (smug, 75%)\n  Hello.\n  Missed me?\n"));
        assert!(out.contains("use --offset 2"));
    }

    #[test]
    fn renders_empty_history() {
        let page = HistoryPage {
            total: 0,
            limit: 50,
            offset: 0,
            messages: Vec::new(),
        };
        assert_eq!(render_history(&page).unwrap(), "No messages (total 0).\n");
    }
}

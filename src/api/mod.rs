//! Wire types for the EVE backend.
//!
//! These mirror the JSON the backend returns. Entities are read-only from the
//! client's point of view; their lifecycle is owned entirely by the server.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod client;
pub mod error;

pub const ROLE_USER: &str = "user";
pub const ROLE_ASSISTANT: &str = "assistant";
pub const ROLE_SYSTEM: &str = "system";

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Emotion {
    Neutral,
    Content,
    Joyful,
    Curious,
    Protective,
    Excited,
    Irritated,
    Angry,
    Anxious,
    Embarrassed,
    Disappointed,
    Scared,
    Sarcastic,
    Affectionate,
    Playful,
    Smug,
    Vulnerable,
    Flustered,
    Tired,
    Confused,
}

impl Emotion {
    pub const ALL: [Emotion; 20] = [
        Emotion::Neutral,
        Emotion::Content,
        Emotion::Joyful,
        Emotion::Curious,
        Emotion::Protective,
        Emotion::Excited,
        Emotion::Irritated,
        Emotion::Angry,
        Emotion::Anxious,
        Emotion::Embarrassed,
        Emotion::Disappointed,
        Emotion::Scared,
        Emotion::Sarcastic,
        Emotion::Affectionate,
        Emotion::Playful,
        Emotion::Smug,
        Emotion::Vulnerable,
        Emotion::Flustered,
        Emotion::Tired,
        Emotion::Confused,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Content => "content",
            Emotion::Joyful => "joyful",
            Emotion::Curious => "curious",
            Emotion::Protective => "protective",
            Emotion::Excited => "excited",
            Emotion::Irritated => "irritated",
            Emotion::Angry => "angry",
            Emotion::Anxious => "anxious",
            Emotion::Embarrassed => "embarrassed",
            Emotion::Disappointed => "disappointed",
            Emotion::Scared => "scared",
            Emotion::Sarcastic => "sarcastic",
            Emotion::Affectionate => "affectionate",
            Emotion::Playful => "playful",
            Emotion::Smug => "smug",
            Emotion::Vulnerable => "vulnerable",
            Emotion::Flustered => "flustered",
            Emotion::Tired => "tired",
            Emotion::Confused => "confused",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Emotion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Emotion::ALL
            .iter()
            .copied()
            .find(|emotion| emotion.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("Unknown emotion: {s}"))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EmotionsFrequency {
    Frequently,
    Sometimes,
    Rarely,
    Never,
}

impl FromStr for EmotionsFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frequently" => Ok(Self::Frequently),
            "sometimes" => Ok(Self::Sometimes),
            "rarely" => Ok(Self::Rarely),
            "never" => Ok(Self::Never),
            other => Err(format!("Unknown emoticon frequency: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemoryRetentionPreference {
    ShortTerm,
    LongTerm,
}

impl FromStr for MemoryRetentionPreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short_term" => Ok(Self::ShortTerm),
            "long_term" => Ok(Self::LongTerm),
            other => Err(format!("Unknown memory retention preference: {other}")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AiMode {
    Local,
    Remote,
}

impl FromStr for AiMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            other => Err(format!("Unknown AI mode: {other}")),
        }
    }
}

/// The backend declares this as an int but seeds it with prose like
/// "1-2 sentences", so both shapes show up.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum ResponseLength {
    Sentences(i64),
    Text(String),
}

impl fmt::Display for ResponseLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseLength::Sentences(n) => write!(f, "{n}"),
            ResponseLength::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Character {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_image: Option<String>,
    #[serde(default)]
    pub vrm_path: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role_in_world: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world_context: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_pattern: Option<String>,
    /// Raw JSON list of phrases as stored by the backend.
    #[serde(default)]
    pub favorite_phrases_json: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentence_length_preference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_length_default: Option<ResponseLength>,
    #[serde(default)]
    pub ask_questions_frequency: f64,
    #[serde(default)]
    pub emoticons_frequency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_retention_preference: Option<String>,

    #[serde(default)]
    pub default_emotion: String,
    /// Raw JSON list of emotion names as stored by the backend.
    #[serde(default)]
    pub enabled_emotions_json: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speech_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,

    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_default: bool,

    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_interaction_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversations: Option<Vec<Conversation>>,

    /// Derived from `favorite_phrases_json`. Only present when the server
    /// sent it or after [`Character::decode_json_fields`] succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub favorite_phrases: Option<Vec<String>>,
    /// Derived from `enabled_emotions_json`, same rules as `favorite_phrases`.
    /// Names that are not a known [`Emotion`] are dropped, whichever path
    /// filled the list.
    #[serde(
        default,
        deserialize_with = "deserialize_emotion_names",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled_emotions: Option<Vec<Emotion>>,
}

impl Character {
    /// Fill the derived phrase/emotion lists from their raw JSON strings.
    ///
    /// Lists the server already supplied are left alone. A blank or malformed
    /// raw string leaves the derived field `None`; unknown emotion names are
    /// dropped rather than failing the whole list.
    pub fn decode_json_fields(&mut self) {
        if self.favorite_phrases.is_none() {
            self.favorite_phrases = decode_string_list(&self.favorite_phrases_json);
        }
        if self.enabled_emotions.is_none() {
            self.enabled_emotions = decode_string_list(&self.enabled_emotions_json)
                .map(|names| emotions_from_names(names.iter().map(String::as_str)));
        }
    }

    pub fn with_decoded_json_fields(mut self) -> Self {
        self.decode_json_fields();
        self
    }

    pub fn default_emotion_kind(&self) -> Option<Emotion> {
        self.default_emotion.parse().ok()
    }

    pub fn emoticons_frequency_kind(&self) -> Option<EmotionsFrequency> {
        self.emoticons_frequency.parse().ok()
    }

    pub fn memory_retention_kind(&self) -> Option<MemoryRetentionPreference> {
        self.memory_retention_preference
            .as_deref()
            .and_then(|value| value.parse().ok())
    }
}

fn emotions_from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<Emotion> {
    names
        .into_iter()
        .filter_map(|name| name.parse::<Emotion>().ok())
        .collect()
}

fn deserialize_emotion_names<'de, D>(deserializer: D) -> Result<Option<Vec<Emotion>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let names = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(names.map(|names| emotions_from_names(names.iter().filter_map(serde_json::Value::as_str))))
}

fn decode_string_list(raw: &str) -> Option<Vec<String>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    serde_json::from_str::<Vec<String>>(raw).ok()
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Conversation {
    pub id: i64,
    pub character_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<Box<Character>>,
    #[serde(default)]
    pub user_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,

    #[serde(default)]
    pub relationship_type: String,
    #[serde(default)]
    pub user_intent: String,
    #[serde(default)]
    pub world_state: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub message_count: i64,
    #[serde(default)]
    pub is_active: bool,

    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub last_activity: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_notes: Option<Vec<MemoryNote>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<Message>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Message {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<i64>,
    pub role: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emotion_intensity: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_time_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_count: Option<i64>,
    #[serde(default)]
    pub created_at: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_note: Option<Box<MemoryNote>>,
}

impl Message {
    pub fn emotion_kind(&self) -> Option<Emotion> {
        self.emotion.as_deref().and_then(|e| e.parse().ok())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MemoryNote {
    pub id: i64,
    pub character_id: i64,
    pub conversation_id: i64,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_message_id: Option<i64>,
    #[serde(default)]
    pub importance_score: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Box<Message>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct UserProfile {
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub dislikes: Vec<String>,
    #[serde(default)]
    pub personality: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<i64>,
    #[serde(default)]
    pub profile_json: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversations: Option<Vec<Conversation>>,
}

impl User {
    /// Decode `profile_json`; `None` when it is blank or not a profile object.
    pub fn profile(&self) -> Option<UserProfile> {
        let raw = self.profile_json.trim();
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str(raw).ok()
    }
}

/// Global AI settings. The backend keeps exactly one row.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AiConfig {
    pub id: i64,
    pub mode: String,
    pub model_name: String,
    #[serde(default)]
    pub gpu_layers: i64,
    #[serde(default)]
    pub temperature: f64,
    #[serde(default)]
    pub max_tokens: i64,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub conversation_memory_length: i64,
    #[serde(default)]
    pub emotion_confidence_threshold: f64,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl AiConfig {
    pub fn mode_kind(&self) -> Option<AiMode> {
        self.mode.parse().ok()
    }
}

/// One page of a conversation's message history.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryPage {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub messages: Vec<Message>,
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 as well as the naive ISO form SQLite hands back, which
/// is taken to be UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_character(extra: serde_json::Value) -> Character {
        let mut value = json!({"id": 1, "name": "Avangarda"});
        if let (Some(base), Some(extra)) = (value.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(value).expect("character should deserialize")
    }

    #[test]
    fn list_projection_deserializes_with_defaults() {
        let character: Character = serde_json::from_value(json!({
            "id": 3,
            "name": "Mika",
            "description": "A sarcastic but caring companion",
            "avatar": "/avatars/mika.png",
            "model_image": null,
            "vrm_path": "",
            "enabled_emotions": ["neutral", "smug"],
            "favorite_phrases": ["Hmph."],
            "default_emotion": "neutral",
            "is_active": true
        }))
        .expect("reduced projection should deserialize");

        assert_eq!(character.id, 3);
        assert!(character.favorite_phrases_json.is_empty());
        assert_eq!(
            character.enabled_emotions,
            Some(vec![Emotion::Neutral, Emotion::Smug])
        );
        assert!(!character.is_default);
        assert_eq!(character.default_emotion_kind(), Some(Emotion::Neutral));
    }

    #[test]
    fn server_emotion_list_tolerates_unknown_and_capitalized_names() {
        let character = minimal_character(json!({
            "enabled_emotions": ["neutral", "happy", "Smug", 7, null]
        }));

        assert_eq!(
            character.enabled_emotions,
            Some(vec![Emotion::Neutral, Emotion::Smug])
        );

        let character = minimal_character(json!({ "enabled_emotions": null }));
        assert_eq!(character.enabled_emotions, None);
    }

    #[test]
    fn decode_fills_derived_fields_from_raw_strings() {
        let character = minimal_character(json!({
            "favorite_phrases_json": "[\"Hello there\", \"Indeed\"]",
            "enabled_emotions_json": "[\"joyful\", \"not-an-emotion\", \"tired\"]"
        }))
        .with_decoded_json_fields();

        assert_eq!(
            character.favorite_phrases,
            Some(vec!["Hello there".to_string(), "Indeed".to_string()])
        );
        assert_eq!(
            character.enabled_emotions,
            Some(vec![Emotion::Joyful, Emotion::Tired])
        );
    }

    #[test]
    fn decode_leaves_malformed_or_blank_fields_unset() {
        let character = minimal_character(json!({
            "favorite_phrases_json": "",
            "enabled_emotions_json": "{not json"
        }))
        .with_decoded_json_fields();

        assert_eq!(character.favorite_phrases, None);
        assert_eq!(character.enabled_emotions, None);
    }

    #[test]
    fn decode_keeps_server_supplied_lists() {
        let character = minimal_character(json!({
            "favorite_phrases": ["from server"],
            "favorite_phrases_json": "[\"from raw\"]"
        }))
        .with_decoded_json_fields();

        assert_eq!(
            character.favorite_phrases,
            Some(vec!["from server".to_string()])
        );
    }

    #[test]
    fn response_length_accepts_text_and_numbers() {
        let text = minimal_character(json!({"response_length_default": "1-2 sentences"}));
        let number = minimal_character(json!({"response_length_default": 2}));

        assert_eq!(
            text.response_length_default,
            Some(ResponseLength::Text("1-2 sentences".to_string()))
        );
        assert_eq!(
            number.response_length_default,
            Some(ResponseLength::Sentences(2))
        );
    }

    #[test]
    fn emotion_parsing_is_case_insensitive() {
        assert_eq!("Affectionate".parse::<Emotion>(), Ok(Emotion::Affectionate));
        assert!("furious".parse::<Emotion>().is_err());
        assert_eq!(Emotion::ALL.len(), 20);
        assert_eq!(
            serde_json::to_string(&Emotion::Flustered).unwrap(),
            "\"flustered\""
        );
    }

    #[test]
    fn enum_accessors_tolerate_unknown_values() {
        let character = minimal_character(json!({
            "emoticons_frequency": "rarely",
            "memory_retention_preference": "forever"
        }));

        assert_eq!(
            character.emoticons_frequency_kind(),
            Some(EmotionsFrequency::Rarely)
        );
        assert_eq!(character.memory_retention_kind(), None);
    }

    #[test]
    fn user_profile_decodes_or_returns_none() {
        let mut user: User = serde_json::from_value(json!({
            "id": 1,
            "name": "Kasia",
            "profile_json": "{\"likes\": [\"tea\"], \"dislikes\": [], \"personality\": [\"calm\"]}"
        }))
        .unwrap();

        let profile = user.profile().expect("profile should decode");
        assert_eq!(profile.likes, vec!["tea".to_string()]);
        assert_eq!(profile.personality, vec!["calm".to_string()]);

        user.profile_json = "{\"likes\": [], \"dislikes\": [],\"personality\": []}\"".to_string();
        assert_eq!(user.profile(), None);
    }

    #[test]
    fn history_page_deserializes_backend_shape() {
        let page: HistoryPage = serde_json::from_value(json!({
            "total": 2,
            "limit": 50,
            "offset": 0,
            "messages": [
                {"id": 1, "role": "user", "content": "hi", "created_at": "2025-01-01T10:00:00"},
                {"id": 2, "role": "assistant", "content": "hey", "created_at": "2025-01-01T10:00:02",
                 "emotion": "playful", "emotion_intensity": 0.7}
            ]
        }))
        .unwrap();

        assert_eq!(page.messages.len(), 2);
        assert_eq!(page.messages[1].emotion_kind(), Some(Emotion::Playful));
        assert_eq!(page.messages[0].role, ROLE_USER);
    }

    #[test]
    fn parse_timestamp_accepts_naive_and_rfc3339() {
        let naive = parse_timestamp("2025-03-01T12:30:00.123456").expect("naive");
        let zoned = parse_timestamp("2025-03-01T13:30:00.123456+01:00").expect("zoned");
        assert_eq!(naive, zoned);
        assert!(parse_timestamp("2025-03-01 12:30:00").is_some());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }
}

//! Page-level view state: what each screen fetches and what it keeps.

use crate::api::client::conversations_from_value;
use crate::api::error::ApiError;
use crate::api::{Character, Conversation};
use crate::core::selection::CharacterSelection;
use crate::core::source::CharacterSource;
use futures_util::future;
use serde_json::Value;
use std::sync::{Mutex, MutexGuard};
use tracing::warn;

/// The home dashboard: the default character and the first few characters.
#[derive(Debug, Clone)]
pub struct HomeView {
    pub default_character: Option<Character>,
    pub characters: Vec<Character>,
}

impl HomeView {
    /// Both requests go out together. A missing default character is not
    /// fatal for the dashboard; a failed list is.
    pub async fn load<S: CharacterSource + ?Sized>(
        source: &S,
        limit: u32,
    ) -> Result<Self, ApiError> {
        let (default_character, characters) =
            future::join(source.default_character(), source.characters(Some(limit))).await;

        let characters = characters?;
        let default_character = match default_character {
            Ok(character) => Some(character.with_decoded_json_fields()),
            Err(err) => {
                warn!(error = %err, "default character unavailable");
                None
            }
        };

        Ok(Self {
            default_character,
            characters: characters
                .into_iter()
                .map(Character::with_decoded_json_fields)
                .collect(),
        })
    }
}

/// Character browser with one selected entry.
///
/// The selection sits behind a lock that is only taken between awaits, so
/// several refreshes can be in flight at once; the last one started wins.
#[derive(Debug, Default)]
pub struct CharactersView {
    selection: Mutex<CharacterSelection>,
}

impl CharactersView {
    pub fn new(selection: CharacterSelection) -> Self {
        Self {
            selection: Mutex::new(selection),
        }
    }

    pub async fn load<S: CharacterSource + ?Sized>(
        source: &S,
        limit: Option<u32>,
    ) -> Result<Self, ApiError> {
        let view = Self::new(CharacterSelection::new());
        view.refresh(source, limit).await?;
        Ok(view)
    }

    fn lock(&self) -> MutexGuard<'_, CharacterSelection> {
        self.selection
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Re-fetch the list. Returns `false` when a refresh started later has
    /// already claimed the view and this result was dropped.
    pub async fn refresh<S: CharacterSource + ?Sized>(
        &self,
        source: &S,
        limit: Option<u32>,
    ) -> Result<bool, ApiError> {
        let ticket = self.lock().begin_load();
        let items = source
            .characters(limit)
            .await?
            .into_iter()
            .map(Character::with_decoded_json_fields)
            .collect();
        Ok(self.lock().finish_load(ticket, items))
    }

    pub fn select(&self, id: i64) -> bool {
        self.lock().select(id)
    }

    pub fn selected(&self) -> Option<Character> {
        self.lock().selected().cloned()
    }

    pub fn characters(&self) -> Vec<Character> {
        self.lock().items().to_vec()
    }

    /// Copy of the current selection state, for rendering.
    pub fn snapshot(&self) -> CharacterSelection {
        self.lock().clone()
    }
}

/// The chat screen for one character.
#[derive(Debug, Clone)]
pub struct ChatView {
    pub character: Character,
    pub conversations: Vec<Conversation>,
    /// Payload exactly as the backend sent it.
    pub raw_conversations: Value,
}

impl ChatView {
    /// Both requests must succeed. A conversations payload that does not
    /// match [`Conversation`] leaves the typed list empty; the raw value is
    /// still kept.
    pub async fn load<S: CharacterSource + ?Sized>(
        source: &S,
        character_id: i64,
    ) -> Result<Self, ApiError> {
        let (character, raw_conversations) = future::try_join(
            source.character(character_id),
            source.conversations(character_id),
        )
        .await?;

        let conversations = match conversations_from_value(&raw_conversations) {
            Ok(conversations) => conversations,
            Err(err) => {
                warn!(character_id, error = %err, "conversations payload not understood");
                Vec::new()
            }
        };

        Ok(Self {
            character: character.with_decoded_json_fields(),
            conversations,
            raw_conversations,
        })
    }
}

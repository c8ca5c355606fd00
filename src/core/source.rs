use crate::api::client::EveClient;
use crate::api::error::ApiError;
use crate::api::Character;
use serde_json::Value;

/// Where views get their character data from. [`EveClient`] is the real
/// implementation; tests substitute an in-memory one.
#[async_trait::async_trait]
pub trait CharacterSource: Send + Sync {
    async fn default_character(&self) -> Result<Character, ApiError>;

    async fn characters(&self, limit: Option<u32>) -> Result<Vec<Character>, ApiError>;

    async fn character(&self, id: i64) -> Result<Character, ApiError>;

    async fn conversations(&self, character_id: i64) -> Result<Value, ApiError>;
}

#[async_trait::async_trait]
impl CharacterSource for EveClient {
    async fn default_character(&self) -> Result<Character, ApiError> {
        self.get_default_character().await
    }

    async fn characters(&self, limit: Option<u32>) -> Result<Vec<Character>, ApiError> {
        self.get_characters(limit).await
    }

    async fn character(&self, id: i64) -> Result<Character, ApiError> {
        self.get_specific_character(id).await
    }

    async fn conversations(&self, character_id: i64) -> Result<Value, ApiError> {
        self.get_conversations(character_id).await
    }
}

//! HTTP access to the EVE backend.
//!
//! Every method issues exactly one GET against the configured base URL and
//! maps the response onto a typed value. There are no retries, no timeouts
//! and no caching at this layer.

use crate::api::error::ApiError;
use crate::api::{AiConfig, Character, Conversation, HistoryPage};
use crate::utils::url::normalize_base_url;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

const DEFAULT_CHARACTER_FAILED: &str = "Failed to fetch default character";
const CHARACTERS_FAILED: &str = "Failed to fetch characters";
const CHARACTER_FAILED: &str = "Failed to fetch character";
const CONVERSATIONS_FAILED: &str = "Failed to fetch conversations";
const HISTORY_FAILED: &str = "Failed to fetch chat history";
const CONFIG_FAILED: &str = "Failed to fetch config";

pub const HISTORY_LIMIT_DEFAULT: u32 = 50;
pub const HISTORY_LIMIT_MAX: u32 = 200;

/// Paging options for [`EveClient::get_chat_history`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: u32,
    pub offset: u32,
    pub sort_desc: bool,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            limit: HISTORY_LIMIT_DEFAULT,
            offset: 0,
            sort_desc: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EveClient {
    http: reqwest::Client,
    base_url: String,
}

impl EveClient {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self::with_http(reqwest::Client::new(), base_url)
    }

    pub fn with_http(http: reqwest::Client, base_url: impl AsRef<str>) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url.as_ref()),
        }
    }

    pub async fn get_default_character(&self) -> Result<Character, ApiError> {
        let url = self.endpoint(&["characters", "default"])?;
        self.get_json(url, DEFAULT_CHARACTER_FAILED).await
    }

    /// List characters in backend order. A `limit` of `None` or zero sends
    /// no `limit` parameter at all.
    pub async fn get_characters(&self, limit: Option<u32>) -> Result<Vec<Character>, ApiError> {
        let url = self.characters_url(limit)?;
        self.get_json(url, CHARACTERS_FAILED).await
    }

    pub async fn get_specific_character(&self, id: i64) -> Result<Character, ApiError> {
        let url = self.endpoint(&["characters", &id.to_string()])?;
        self.get_json(url, CHARACTER_FAILED).await
    }

    /// The backend does not pin down this payload's shape, so it is handed
    /// back untyped. See [`conversations_from_value`].
    pub async fn get_conversations(&self, character_id: i64) -> Result<Value, ApiError> {
        let url = self.endpoint(&["chat", &character_id.to_string(), "conversations_list"])?;
        self.get_json(url, CONVERSATIONS_FAILED).await
    }

    pub async fn get_chat_history(
        &self,
        character_id: i64,
        conversation_id: i64,
        query: HistoryQuery,
    ) -> Result<HistoryPage, ApiError> {
        let url = self.history_url(character_id, conversation_id, query)?;
        self.get_json(url, HISTORY_FAILED).await
    }

    pub async fn get_config(&self) -> Result<AiConfig, ApiError> {
        let url = self.endpoint(&["config"])?;
        self.get_json(url, CONFIG_FAILED).await
    }

    /// Join path segments onto the base URL. Any fragment on the base is
    /// dropped so it cannot swallow the path or query.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let invalid = |reason: String| ApiError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|err| invalid(err.to_string()))?;
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|()| invalid("cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub(crate) fn characters_url(&self, limit: Option<u32>) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&["characters"])?;
        if let Some(n) = limit.filter(|n| *n > 0) {
            url.query_pairs_mut().append_pair("limit", &n.to_string());
        }
        Ok(url)
    }

    pub(crate) fn history_url(
        &self,
        character_id: i64,
        conversation_id: i64,
        query: HistoryQuery,
    ) -> Result<Url, ApiError> {
        let mut url = self.endpoint(&[
            "chat",
            &character_id.to_string(),
            &conversation_id.to_string(),
            "messages",
        ])?;
        url.query_pairs_mut()
            .append_pair("limit", &query.limit.clamp(1, HISTORY_LIMIT_MAX).to_string())
            .append_pair("offset", &query.offset.to_string())
            .append_pair("sort_desc", &query.sort_desc.to_string());
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        failure: &'static str,
    ) -> Result<T, ApiError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "request failed");
            return Err(ApiError::RequestFailed {
                message: failure,
                status,
            });
        }

        response.json::<T>().await.map_err(ApiError::Decode)
    }
}

/// Interpret a conversations payload as typed conversations.
///
/// Accepts either a bare array or an object wrapping one under
/// `conversations`.
pub fn conversations_from_value(value: &Value) -> Result<Vec<Conversation>, serde_json::Error> {
    let list = match value {
        Value::Object(map) => map.get("conversations").cloned().unwrap_or(Value::Null),
        other => other.clone(),
    };
    if list.is_null() {
        return Ok(Vec::new());
    }
    serde_json::from_value(list)
}

use crate::api::client::{HISTORY_LIMIT_DEFAULT, HISTORY_LIMIT_MAX};
use crate::core::config::data::Config;
use crate::utils::url::normalize_base_url;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000/api/v1";
pub const BASE_URL_ENV_VAR: &str = "EVE_API_URL";
/// The home dashboard shows this many characters unless configured.
pub const DEFAULT_CHARACTER_LIMIT: u32 = 3;
pub const DEFAULT_HISTORY_LIMIT: u32 = HISTORY_LIMIT_DEFAULT;

/// Keys accepted by `eve set` / `eve unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    BaseUrl,
    CharacterLimit,
    HistoryLimit,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 3] = [
        ConfigKey::BaseUrl,
        ConfigKey::CharacterLimit,
        ConfigKey::HistoryLimit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::BaseUrl => "base-url",
            ConfigKey::CharacterLimit => "character-limit",
            ConfigKey::HistoryLimit => "history-limit",
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConfigKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ConfigKey::ALL.iter().map(|k| k.as_str()).collect();
                format!("Unknown config key: {s}. Known keys: {}", known.join(", "))
            })
    }
}

impl Config {
    pub fn set_value(&mut self, key: ConfigKey, value: &str) -> Result<(), String> {
        let value = value.trim();
        match key {
            ConfigKey::BaseUrl => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(format!(
                        "base-url must start with http:// or https://, got: {value}"
                    ));
                }
                self.base_url = Some(normalize_base_url(value));
            }
            ConfigKey::CharacterLimit => {
                self.character_limit = Some(parse_positive(key, value, u32::MAX)?);
            }
            ConfigKey::HistoryLimit => {
                self.history_limit = Some(parse_positive(key, value, HISTORY_LIMIT_MAX)?);
            }
        }
        Ok(())
    }

    pub fn unset_value(&mut self, key: ConfigKey) {
        match key {
            ConfigKey::BaseUrl => self.base_url = None,
            ConfigKey::CharacterLimit => self.character_limit = None,
            ConfigKey::HistoryLimit => self.history_limit = None,
        }
    }

    /// Resolve the backend URL: explicit flag, then `EVE_API_URL`, then the
    /// config file, then [`DEFAULT_BASE_URL`].
    pub fn resolve_base_url(&self, flag: Option<&str>) -> String {
        let env_value = std::env::var(BASE_URL_ENV_VAR).ok();
        let resolved = [flag, env_value.as_deref(), self.base_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(normalize_base_url);
        resolved.unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    pub fn character_limit_or_default(&self) -> u32 {
        self.character_limit.unwrap_or(DEFAULT_CHARACTER_LIMIT)
    }

    pub fn history_limit_or_default(&self) -> u32 {
        self.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT)
    }
}

fn parse_positive(key: ConfigKey, value: &str, max: u32) -> Result<u32, String> {
    match value.parse::<u32>() {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(format!("{key} must be a number between 1 and {max}, got: {value}")),
    }
}

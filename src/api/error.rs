use reqwest::StatusCode;
use std::error::Error as StdError;
use std::fmt;

/// Errors produced by [`crate::api::client::EveClient`].
#[derive(Debug)]
pub enum ApiError {
    /// The backend answered with a status outside 200-299.
    RequestFailed {
        /// Fixed text naming the call that failed.
        message: &'static str,
        /// Status the backend returned. The body is never read.
        status: StatusCode,
    },

    /// No response was obtained (connection refused, DNS failure, ...).
    Transport(reqwest::Error),

    /// A success response whose body did not match the expected JSON.
    Decode(reqwest::Error),

    /// The configured base URL cannot have endpoint paths joined onto it.
    InvalidUrl { url: String, reason: String },
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_request_failed(&self) -> bool {
        matches!(self, ApiError::RequestFailed { .. })
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::RequestFailed { message, .. } => f.write_str(message),
            ApiError::Transport(source) => write!(f, "{source}"),
            ApiError::Decode(source) => write!(f, "Failed to decode response: {source}"),
            ApiError::InvalidUrl { url, reason } => {
                write!(f, "Invalid backend URL {url}: {reason}")
            }
        }
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            ApiError::RequestFailed { .. } | ApiError::InvalidUrl { .. } => None,
            ApiError::Transport(source) => Some(source),
            ApiError::Decode(source) => Some(source),
        }
    }
}

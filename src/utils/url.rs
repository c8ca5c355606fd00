//! URL helpers for the backend base URL
//!
//! Base URLs come from flags, the environment or user config and frequently
//! carry stray whitespace or a trailing slash. Endpoint paths and query
//! strings are joined with `reqwest::Url` in the client.

/// Normalize a base URL by trimming whitespace and trailing slashes
///
/// ```
/// use eve_client::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("http://127.0.0.1:8000/api/v1/"), "http://127.0.0.1:8000/api/v1");
/// assert_eq!(normalize_base_url(" http://127.0.0.1:8000/api/v1"), "http://127.0.0.1:8000/api/v1");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim().trim_end_matches('/').to_string()
}

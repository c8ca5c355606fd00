use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq)]
pub struct Config {
    /// Backend base URL, e.g. "http://127.0.0.1:8000/api/v1"
    pub base_url: Option<String>,
    /// How many characters the home and list views request
    pub character_limit: Option<u32>,
    /// Page size for chat history
    pub history_limit: Option<u32>,
}

/// Get a user-friendly display string for a path
/// Converts absolute paths under the home directory to `~` notation on Unix.
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}

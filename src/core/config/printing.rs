use crate::core::config::data::{path_display, Config};
use crate::core::config::defaults::{DEFAULT_CHARACTER_LIMIT, DEFAULT_HISTORY_LIMIT};

impl Config {
    pub fn print_all(&self) {
        println!(
            "Current configuration ({}):",
            path_display(Config::config_path())
        );
        match &self.base_url {
            Some(url) => println!("  base-url: {url}"),
            None => println!("  base-url: (unset)"),
        }
        match self.character_limit {
            Some(limit) => println!("  character-limit: {limit}"),
            None => println!("  character-limit: (unset, default {DEFAULT_CHARACTER_LIMIT})"),
        }
        match self.history_limit {
            Some(limit) => println!("  history-limit: {limit}"),
            None => println!("  history-limit: (unset, default {DEFAULT_HISTORY_LIMIT})"),
        }
    }
}

//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod ai_config;
pub mod character_detail;
pub mod character_list;
pub mod conversations;
pub mod home;

use std::error::Error;

use clap::{Parser, Subcommand};

use crate::api::client::{EveClient, HistoryQuery};
use crate::cli::ai_config::show_ai_config;
use crate::cli::character_detail::{show_character, show_default_character};
use crate::cli::character_list::list_characters;
use crate::cli::conversations::{list_conversations, show_history};
use crate::cli::home::show_home;
use crate::core::config::{Config, ConfigKey};
use crate::utils::logging::init_tracing;

#[derive(Parser)]
#[command(name = "eve")]
#[command(about = "Browse characters and conversations on an EVE AI backend")]
#[command(
    long_about = "eve is a terminal client for the EVE character-chat backend. It reads \
characters, conversations, chat history and the global AI configuration over HTTP.\n\n\
Backend URL resolution (first match wins):\n\
  --base-url URL    Flag on the command line\n\
  EVE_API_URL       Environment variable\n\
  base-url          Value saved with 'eve set base-url <URL>'\n\
  default           http://127.0.0.1:8000/api/v1\n\n\
Logging:\n\
  -v                Show request-level debug logs on stderr\n\
  RUST_LOG          Overrides the log filter entirely"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Backend base URL, e.g. http://127.0.0.1:8000/api/v1
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Log requests and state changes to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Show the dashboard: default character and the first few characters (default)
    Home {
        /// Number of characters to show
        #[arg(short = 'n', long)]
        limit: Option<u32>,
    },
    /// List characters and mark the selected one
    Characters {
        /// Maximum number of characters to request
        #[arg(short = 'n', long)]
        limit: Option<u32>,
        /// Character id to select instead of the first one
        #[arg(short = 's', long, value_name = "ID")]
        select: Option<i64>,
    },
    /// Show one character in detail
    Character {
        /// Character id
        id: i64,
    },
    /// Show the default character in detail
    Default,
    /// List conversations held with a character
    Conversations {
        /// Character id
        character_id: i64,
        /// Print the backend payload as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Show the message history of one conversation
    History {
        /// Character id
        character_id: i64,
        /// Conversation id
        conversation_id: i64,
        /// Messages per page (1-200)
        #[arg(short = 'n', long)]
        limit: Option<u32>,
        /// Messages to skip
        #[arg(long, default_value_t = 0)]
        offset: u32,
        /// Newest messages first
        #[arg(long)]
        desc: bool,
    },
    /// Show the backend's global AI configuration
    AiConfig,
    /// Set configuration values, or print the configuration when no key is given
    Set {
        /// Configuration key to set (base-url, character-limit, history-limit)
        key: Option<String>,
        /// Value to set for the key
        value: Option<String>,
    },
    /// Unset configuration values
    Unset {
        /// Configuration key to unset
        key: String,
    },
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing(args.verbose);

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let client = || EveClient::new(config.resolve_base_url(args.base_url.as_deref()));

    match args.command.unwrap_or(Commands::Home { limit: None }) {
        Commands::Home { limit } => {
            show_home(&client(), limit.unwrap_or(config.character_limit_or_default())).await
        }
        Commands::Characters { limit, select } => {
            list_characters(&client(), limit.or(config.character_limit), select).await
        }
        Commands::Character { id } => show_character(&client(), id).await,
        Commands::Default => show_default_character(&client()).await,
        Commands::Conversations { character_id, json } => {
            list_conversations(&client(), character_id, json).await
        }
        Commands::History {
            character_id,
            conversation_id,
            limit,
            offset,
            desc,
        } => {
            let query = HistoryQuery {
                limit: limit.unwrap_or(config.history_limit_or_default()),
                offset,
                sort_desc: desc,
            };
            show_history(&client(), character_id, conversation_id, query).await
        }
        Commands::AiConfig => show_ai_config(&client()).await,
        Commands::Set { key, value } => run_set(key, value),
        Commands::Unset { key } => run_unset(&key),
    }
}

fn run_set(key: Option<String>, value: Option<String>) -> Result<(), Box<dyn Error>> {
    let Some(key) = key else {
        Config::load()?.print_all();
        return Ok(());
    };
    let key: ConfigKey = key.parse()?;
    let Some(value) = value else {
        return Err(format!("Missing value. Example: eve set {key} <VALUE>").into());
    };

    Config::mutate(|config| {
        config.set_value(key, &value)?;
        Ok(())
    })?;
    println!("✅ Set {key} to: {}", value.trim());
    Ok(())
}

fn run_unset(key: &str) -> Result<(), Box<dyn Error>> {
    let key: ConfigKey = key.parse()?;
    Config::mutate(|config| {
        config.unset_value(key);
        Ok(())
    })?;
    println!("✅ Unset {key}");
    Ok(())
}

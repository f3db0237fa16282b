//! Bot configuration loaded from environment variables.
//!
//! `STATE_DATABASE_URL` (unset: in-memory state), `LOG_FILE`, `WELCOME_MESSAGE`,
//! `FALLBACK_MESSAGE`. Call `dotenvy::dotenv()` first to pick up a `.env` file.

use std::env;

pub const DEFAULT_WELCOME_MESSAGE: &str = "Olá seja bem vindo ao bot do Ibmec, digite hello ou help";
pub const DEFAULT_FALLBACK_MESSAGE: &str = "Diga alguma coisa para eu poder te ajudar ou digite help";
pub const DEFAULT_LOG_FILE: &str = "logs/wbot.log";

/// Texts the bot sends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotMessages {
    /// Sent once per member joining the conversation.
    pub welcome: String,
    /// Sent for any message that is not a known utterance.
    pub fallback: String,
}

impl Default for BotMessages {
    fn default() -> Self {
        Self {
            welcome: DEFAULT_WELCOME_MESSAGE.to_string(),
            fallback: DEFAULT_FALLBACK_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// SQLite URL or path for durable user state; `None` keeps state in memory.
    pub database_url: Option<String>,
    pub log_file: String,
    pub messages: BotMessages,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
            messages: BotMessages::default(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl BotConfig {
    /// Loads from environment; `database_url` overrides `STATE_DATABASE_URL` when given.
    pub fn load(database_url: Option<String>) -> Self {
        let defaults = BotMessages::default();
        Self {
            database_url: database_url.or_else(|| non_empty_var("STATE_DATABASE_URL")),
            log_file: non_empty_var("LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            messages: BotMessages {
                welcome: non_empty_var("WELCOME_MESSAGE").unwrap_or(defaults.welcome),
                fallback: non_empty_var("FALLBACK_MESSAGE").unwrap_or(defaults.fallback),
            },
        }
    }
}

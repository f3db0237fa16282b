//! CLI parser and config loading.

use clap::{Parser, Subcommand};
use welcome_bot::BotConfig;

#[derive(Parser)]
#[command(name = "wbot")]
#[command(about = "Welcome bot console host", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Chat with the bot on stdin/stdout (config from env; database URL can override STATE_DATABASE_URL).
    Run {
        #[arg(long, default_value = "console")]
        channel_id: String,
        #[arg(long, default_value = "console-user")]
        user_id: String,
        #[arg(long)]
        user_name: Option<String>,
        /// Conversation id; a fresh one is generated when omitted.
        #[arg(long)]
        conversation_id: Option<String>,
        #[arg(short, long)]
        database_url: Option<String>,
    },
}

/// Load BotConfig from environment. If `database_url` is provided it overrides STATE_DATABASE_URL.
pub fn load_config(database_url: Option<String>) -> BotConfig {
    BotConfig::load(database_url)
}

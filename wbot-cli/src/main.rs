//! wbot: run the welcome bot on the console. Config from env and optional CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use wbot_cli::{load_config, run_console, Cli, Commands, ConsoleSender, ConsoleSession};
use wbot_core::{init_tracing, ChannelAccount, LogOutput};
use welcome_bot::build_pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            channel_id,
            user_id,
            user_name,
            conversation_id,
            database_url,
        } => {
            let config = load_config(database_url);
            // stdout carries the conversation; logs go to the file only.
            init_tracing(&config.log_file, LogOutput::FileOnly)
                .with_context(|| format!("Initialize logging to {}", config.log_file))?;

            let pipeline = build_pipeline(&config, Arc::new(ConsoleSender))
                .await
                .context("Build turn pipeline (check STATE_DATABASE_URL)")?;

            let mut user = ChannelAccount::new(user_id);
            if let Some(name) = user_name {
                user = user.with_name(name);
            }
            let conversation_id =
                conversation_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let session = ConsoleSession::new(channel_id, conversation_id, user);

            run_console(pipeline, session).await
        }
    }
}

//! Wiring: choose the storage backend from [`BotConfig`] and assemble the turn pipeline.

use std::sync::Arc;

use storage::{MemoryStorage, SqliteStorage, Storage, StorageError};
use tracing::info;
use turn_pipeline::TurnPipeline;
use wbot_core::{ChannelSender, UserState};

use crate::bot::WelcomeUserBot;
use crate::config::BotConfig;

/// SQLite when `database_url` is set, otherwise process-local memory.
pub async fn build_storage(config: &BotConfig) -> Result<Arc<dyn Storage>, StorageError> {
    match config.database_url.as_deref() {
        Some(url) => {
            info!(database_url = %url, "Using SQLite state storage");
            Ok(Arc::new(SqliteStorage::new(url).await?))
        }
        None => {
            info!("Using in-memory state storage");
            Ok(Arc::new(MemoryStorage::new()))
        }
    }
}

/// Builds the welcome bot pipeline delivering replies through `sender`.
pub async fn build_pipeline(
    config: &BotConfig,
    sender: Arc<dyn ChannelSender>,
) -> anyhow::Result<TurnPipeline> {
    let storage = build_storage(config).await?;
    let user_state = UserState::new(storage);
    let bot = WelcomeUserBot::new(&user_state, config.messages.clone());
    Ok(TurnPipeline::new(Arc::new(bot), user_state, sender))
}

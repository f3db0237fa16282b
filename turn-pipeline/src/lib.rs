//! # Turn pipeline
//!
//! Runs one inbound activity end to end: build the turn context, dispatch to the bot's
//! handler, then commit user state. Steps run strictly in sequence; a failed dispatch
//! ends the turn before the commit, so no partial state is persisted.

use std::sync::Arc;

use tracing::{error, info, instrument};
use wbot_core::{dispatch, Activity, ActivityHandler, ChannelSender, TurnContext, TurnError, UserState};

/// Orchestrator invoked once per inbound activity. Cheap to clone and share across tasks.
#[derive(Clone)]
pub struct TurnPipeline {
    handler: Arc<dyn ActivityHandler>,
    user_state: UserState,
    sender: Arc<dyn ChannelSender>,
}

impl TurnPipeline {
    pub fn new(
        handler: Arc<dyn ActivityHandler>,
        user_state: UserState,
        sender: Arc<dyn ChannelSender>,
    ) -> Self {
        Self {
            handler,
            user_state,
            sender,
        }
    }

    /// Processes one activity. The context is dropped when this returns, so every
    /// send of the turn happens before the state commit.
    #[instrument(
        skip(self, activity),
        fields(
            activity_type = %activity.activity_type,
            channel_id = %activity.channel_id,
            conversation_id = %activity.conversation.id,
            from_id = %activity.from.id,
        )
    )]
    pub async fn on_turn(&self, activity: Activity) -> Result<(), TurnError> {
        info!("step: turn started");
        let ctx = TurnContext::new(activity, Arc::clone(&self.sender));

        if let Err(e) = dispatch(self.handler.as_ref(), &ctx).await {
            error!(error = %e, "step: dispatch failed, state not committed");
            return Err(e.into());
        }

        self.user_state.save_changes(&ctx).await.map_err(|e| {
            error!(error = %e, "step: state commit failed");
            e
        })?;

        info!(responded = ctx.responded(), "step: turn finished");
        Ok(())
    }
}

// Integration tests live in tests/turn_pipeline_test.rs

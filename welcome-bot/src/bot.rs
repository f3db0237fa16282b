//! [`WelcomeUserBot`]: greets new members and answers fixed utterances.
//!
//! Holds no per-turn data; everything that must survive a turn lives in
//! [`UserState`] and is committed by the turn pipeline.

use async_trait::async_trait;
use tracing::{debug, info, instrument};
use wbot_core::{
    Activity, ActivityHandler, ChannelAccount, HandlerError, HandlerResult, StatePropertyAccessor,
    TurnContext, UserState,
};

use crate::cards::intro_card;
use crate::config::BotMessages;
use crate::state::{WelcomeUserState, WELCOME_USER_STATE_PROPERTY};

pub struct WelcomeUserBot {
    state_accessor: StatePropertyAccessor<WelcomeUserState>,
    messages: BotMessages,
}

impl WelcomeUserBot {
    pub fn new(user_state: &UserState, messages: BotMessages) -> Self {
        Self {
            state_accessor: user_state.create_property(WELCOME_USER_STATE_PROPERTY),
            messages,
        }
    }

    async fn send_intro_card(&self, ctx: &TurnContext) -> HandlerResult {
        let attachment = intro_card()
            .to_attachment()
            .map_err(|e| HandlerError::InvalidActivity(format!("intro card: {}", e)))?;
        ctx.send_activity(Activity::attachment(attachment)).await?;
        Ok(())
    }
}

#[async_trait]
impl ActivityHandler for WelcomeUserBot {
    #[instrument(skip(self, members_added, ctx))]
    async fn on_members_added(
        &self,
        members_added: &[ChannelAccount],
        ctx: &TurnContext,
    ) -> HandlerResult {
        let recipient = &ctx.activity().recipient;
        let welcomes: Vec<Activity> = members_added
            .iter()
            .filter(|m| *m != recipient)
            .map(|member| {
                info!(member_id = %member.id, "step: welcoming new member");
                Activity::message(self.messages.welcome.clone())
            })
            .collect();
        ctx.send_activities(welcomes).await?;
        Ok(())
    }

    #[instrument(skip(self, ctx))]
    async fn on_message_activity(&self, ctx: &TurnContext) -> HandlerResult {
        // Fetched on every message, before any reply.
        let _user_state = self
            .state_accessor
            .get(ctx, WelcomeUserState::default)
            .await?;

        let text = ctx
            .activity()
            .text
            .as_deref()
            .unwrap_or_default()
            .trim()
            .to_lowercase();
        debug!(text = %text, "Handling message");

        match text.as_str() {
            "hello" | "hi" => {
                ctx.send_text(format!("You said {}", text)).await?;
            }
            "intro" | "help" => self.send_intro_card(ctx).await?,
            _ => {
                ctx.send_text(self.messages.fallback.clone()).await?;
            }
        }
        Ok(())
    }
}

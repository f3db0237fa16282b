//! Console channel: every stdin line becomes a message activity, every reply is printed.
//!
//! The session opens with a conversationUpdate adding the user and the bot, the way
//! chat channels announce a new conversation.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, instrument};
use turn_pipeline::TurnPipeline;
use wbot_core::{Activity, ChannelAccount, ChannelSender, HeroCard, ResourceResponse, SendError};

const BOT_ID: &str = "welcome-bot";

/// Prints outbound activities to stdout.
pub struct ConsoleSender;

/// Renders an outbound activity as console text: the text line, then each hero card.
pub fn render_activity(activity: &Activity) -> String {
    let mut lines = Vec::new();
    if let Some(text) = activity.text.as_deref() {
        lines.push(format!("bot> {}", text));
    }
    for attachment in &activity.attachments {
        match HeroCard::from_attachment(attachment) {
            Some(card) => {
                lines.push(format!("bot> [{}]", card.title.as_deref().unwrap_or("card")));
                if let Some(text) = card.text.as_deref() {
                    lines.push(format!("     {}", text));
                }
                for button in &card.buttons {
                    lines.push(format!("     ({}) {}", button.title, button.value));
                }
            }
            None => lines.push(format!("bot> <attachment {}>", attachment.content_type)),
        }
    }
    lines.join("\n")
}

#[async_trait]
impl ChannelSender for ConsoleSender {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse, SendError> {
        let id = activity
            .id
            .clone()
            .ok_or_else(|| SendError::InvalidActivity("outbound activity has no id".to_string()))?;
        println!("{}", render_activity(activity));
        Ok(ResourceResponse { id })
    }
}

/// Identities of one console conversation.
#[derive(Debug, Clone)]
pub struct ConsoleSession {
    pub channel_id: String,
    pub conversation_id: String,
    pub user: ChannelAccount,
    pub bot: ChannelAccount,
}

impl ConsoleSession {
    pub fn new(channel_id: String, conversation_id: String, user: ChannelAccount) -> Self {
        Self {
            channel_id,
            conversation_id,
            user,
            bot: ChannelAccount::new(BOT_ID).with_name("Welcome Bot"),
        }
    }

    fn address(&self, activity: Activity) -> Activity {
        activity
            .with_channel(self.channel_id.clone(), self.conversation_id.clone())
            .with_from(self.user.clone())
            .with_recipient(self.bot.clone())
            .with_id(uuid::Uuid::new_v4().to_string())
    }

    pub fn join_activity(&self) -> Activity {
        self.address(Activity::conversation_update(vec![
            self.user.clone(),
            self.bot.clone(),
        ]))
    }

    pub fn message_activity(&self, text: &str) -> Activity {
        self.address(Activity::message(text))
    }
}

/// Runs the session until stdin closes. A failed turn is logged and the loop continues.
#[instrument(skip(pipeline, session), fields(conversation_id = %session.conversation_id))]
pub async fn run_console(pipeline: TurnPipeline, session: ConsoleSession) -> anyhow::Result<()> {
    if let Err(e) = pipeline.on_turn(session.join_activity()).await {
        error!(error = %e, "Join turn failed");
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        if let Err(e) = pipeline.on_turn(session.message_activity(&line)).await {
            error!(error = %e, "Turn failed");
            eprintln!("error: {}", e);
        }
    }

    info!("Console input closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wbot_core::CardAction;

    #[test]
    fn test_render_text() {
        let activity = Activity::message("You said hi");
        assert_eq!(render_activity(&activity), "bot> You said hi");
    }

    #[test]
    fn test_render_hero_card() {
        let card = HeroCard {
            title: Some("Title".to_string()),
            text: Some("Body".to_string()),
            buttons: vec![CardAction::open_url("Docs", "https://example.com")],
            ..Default::default()
        };
        let activity = Activity::attachment(card.to_attachment().unwrap());

        assert_eq!(
            render_activity(&activity),
            "bot> [Title]\n     Body\n     (Docs) https://example.com"
        );
    }

    #[test]
    fn test_session_addressing() {
        let session = ConsoleSession::new(
            "console".to_string(),
            "conv".to_string(),
            ChannelAccount::new("me"),
        );

        let join = session.join_activity();
        assert_eq!(join.members_added.len(), 2);
        assert_eq!(join.recipient.id, BOT_ID);

        let msg = session.message_activity("hello");
        assert_eq!(msg.from.id, "me");
        assert_eq!(msg.conversation.id, "conv");
        assert!(msg.id.is_some());
    }

    #[tokio::test]
    async fn test_console_sender_requires_id() {
        let result = ConsoleSender.send_activity(&Activity::message("x")).await;
        assert!(result.is_err());
    }
}

//! Activity dispatch: classify the inbound activity and route it to exactly one
//! handler category.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::activity::{ActivityKind, ChannelAccount};
use crate::context::TurnContext;
use crate::error::{DispatchError, HandlerResult};

/// Bot behaviour per activity category. Every method defaults to a no-op success.
#[async_trait]
pub trait ActivityHandler: Send + Sync {
    /// Members joined the conversation; the bot's own identity is already filtered out.
    async fn on_members_added(
        &self,
        _members_added: &[ChannelAccount],
        _ctx: &TurnContext,
    ) -> HandlerResult {
        Ok(())
    }

    /// Members left the conversation; the bot's own identity is already filtered out.
    async fn on_members_removed(
        &self,
        _members_removed: &[ChannelAccount],
        _ctx: &TurnContext,
    ) -> HandlerResult {
        Ok(())
    }

    async fn on_message_activity(&self, _ctx: &TurnContext) -> HandlerResult {
        Ok(())
    }

    /// Any activity type without a dedicated handler (typing, event, ...).
    async fn on_unrecognized_activity(&self, _ctx: &TurnContext) -> HandlerResult {
        Ok(())
    }
}

fn without_recipient(members: &[ChannelAccount], recipient: &ChannelAccount) -> Vec<ChannelAccount> {
    members
        .iter()
        .filter(|member| *member != recipient)
        .cloned()
        .collect()
}

/// Routes the turn's activity to one handler method and propagates its failure.
///
/// `conversationUpdate` with a non-empty added list goes to members-added (skipped when
/// only the bot joined); with no added members it goes to members-removed when someone
/// other than the bot left; `message` goes
/// to the message handler; everything else to the unrecognized handler.
#[instrument(skip(handler, ctx), fields(activity_type = %ctx.activity().activity_type))]
pub async fn dispatch(handler: &dyn ActivityHandler, ctx: &TurnContext) -> Result<(), DispatchError> {
    let activity = ctx.activity();

    let (name, result) = match activity.kind() {
        ActivityKind::ConversationUpdate if !activity.members_added.is_empty() => {
            let added = without_recipient(&activity.members_added, &activity.recipient);
            if added.is_empty() {
                debug!("Only the bot was added, nothing to do");
                ("members_added", Ok(()))
            } else {
                info!(count = added.len(), "step: dispatch members added");
                ("members_added", handler.on_members_added(&added, ctx).await)
            }
        }
        ActivityKind::ConversationUpdate => {
            let removed = without_recipient(&activity.members_removed, &activity.recipient);
            if removed.is_empty() {
                debug!("Conversation update without foreign members, nothing to do");
                ("conversation_update", Ok(()))
            } else {
                info!(count = removed.len(), "step: dispatch members removed");
                ("members_removed", handler.on_members_removed(&removed, ctx).await)
            }
        }
        ActivityKind::Message => {
            info!("step: dispatch message");
            ("message", handler.on_message_activity(ctx).await)
        }
        ActivityKind::Other(activity_type) => {
            debug!(activity_type = %activity_type, "Unrecognized activity type");
            ("unrecognized", handler.on_unrecognized_activity(ctx).await)
        }
    };

    result.map_err(|source| DispatchError::Handler {
        handler: name,
        source,
    })
}

//! Outbound send capability.
//!
//! [`ChannelSender`] is transport-agnostic; [`TranscriptSender`] records every
//! activity in memory (tests, local hosts).

use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activity::Activity;
use crate::card::HeroCard;
use crate::error::SendError;

/// Channel acknowledgement of a sent activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceResponse {
    pub id: String,
}

/// Delivers outbound activities to a channel. The activity is already addressed
/// (conversation, sender, recipient) by the turn context.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse, SendError>;
}

/// Sender that keeps every activity in send order.
#[derive(Debug, Default)]
pub struct TranscriptSender {
    sent: Mutex<Vec<Activity>>,
}

impl TranscriptSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything sent so far.
    pub fn sent(&self) -> Vec<Activity> {
        self.sent.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Text of every plain-text activity, in order.
    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|a| a.text)
            .collect()
    }

    /// Every hero card sent, in order.
    pub fn hero_cards(&self) -> Vec<HeroCard> {
        self.sent()
            .iter()
            .flat_map(|a| a.attachments.iter())
            .filter_map(HeroCard::from_attachment)
            .collect()
    }
}

#[async_trait]
impl ChannelSender for TranscriptSender {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse, SendError> {
        let id = activity
            .id
            .clone()
            .ok_or_else(|| SendError::InvalidActivity("outbound activity has no id".to_string()))?;
        debug!(activity_id = %id, conversation_id = %activity.conversation.id, "Recording outbound activity");
        self.sent
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(activity.clone());
        Ok(ResourceResponse { id })
    }
}

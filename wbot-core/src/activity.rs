//! Activity schema: inbound and outbound conversation events, channel identities,
//! and the [`ConversationKey`] that partitions durable state.
//!
//! Field names follow the camelCase wire shape channels deliver.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::Attachment;

/// Well-known values of [`Activity::activity_type`].
pub mod activity_types {
    pub const MESSAGE: &str = "message";
    pub const CONVERSATION_UPDATE: &str = "conversationUpdate";
}

/// A user or bot identity on a channel. Identities compare by `id` only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl PartialEq for ChannelAccount {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ChannelAccount {}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationAccount {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_group: Option<bool>,
}

/// Classification of an activity for dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityKind {
    ConversationUpdate,
    Message,
    Other(String),
}

impl ActivityKind {
    pub fn from_type(activity_type: &str) -> Self {
        match activity_type {
            activity_types::MESSAGE => ActivityKind::Message,
            activity_types::CONVERSATION_UPDATE => ActivityKind::ConversationUpdate,
            other => ActivityKind::Other(other.to_string()),
        }
    }
}

/// One inbound or outbound event in a conversation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub conversation: ConversationAccount,
    #[serde(default)]
    pub from: ChannelAccount,
    #[serde(default)]
    pub recipient: ChannelAccount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_added: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members_removed: Vec<ChannelAccount>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Activity {
    pub fn new(activity_type: impl Into<String>) -> Self {
        Self {
            activity_type: activity_type.into(),
            ..Default::default()
        }
    }

    /// Plain text message.
    pub fn message(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::new(activity_types::MESSAGE)
        }
    }

    /// Message carrying a single attachment (e.g. a hero card).
    pub fn attachment(attachment: Attachment) -> Self {
        Self {
            attachments: vec![attachment],
            ..Self::new(activity_types::MESSAGE)
        }
    }

    pub fn conversation_update(members_added: Vec<ChannelAccount>) -> Self {
        Self {
            members_added,
            ..Self::new(activity_types::CONVERSATION_UPDATE)
        }
    }

    pub fn with_channel(
        mut self,
        channel_id: impl Into<String>,
        conversation_id: impl Into<String>,
    ) -> Self {
        self.channel_id = channel_id.into();
        self.conversation.id = conversation_id.into();
        self
    }

    pub fn with_from(mut self, from: ChannelAccount) -> Self {
        self.from = from;
        self
    }

    pub fn with_recipient(mut self, recipient: ChannelAccount) -> Self {
        self.recipient = recipient;
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn kind(&self) -> ActivityKind {
        ActivityKind::from_type(&self.activity_type)
    }

    /// Addresses `reply` back into this activity's conversation: swaps sender and
    /// recipient, copies channel and conversation, links `replyToId`.
    pub fn create_reply(&self, mut reply: Activity) -> Activity {
        reply.id = Some(Uuid::new_v4().to_string());
        reply.channel_id = self.channel_id.clone();
        reply.conversation = self.conversation.clone();
        reply.from = self.recipient.clone();
        reply.recipient = self.from.clone();
        reply.reply_to_id = self.id.clone();
        reply.timestamp = Some(Utc::now());
        reply
    }
}

/// Durable-state partition of a turn: (channel, conversation, user).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConversationKey {
    pub channel_id: String,
    pub conversation_id: String,
    pub user_id: String,
}

impl ConversationKey {
    /// Derives the key from the activity; `None` when any component is empty.
    pub fn from_activity(activity: &Activity) -> Option<Self> {
        let key = Self {
            channel_id: activity.channel_id.clone(),
            conversation_id: activity.conversation.id.clone(),
            user_id: activity.from.id.clone(),
        };
        if key.channel_id.is_empty() || key.conversation_id.is_empty() || key.user_id.is_empty() {
            return None;
        }
        Some(key)
    }

    /// Storage key string: `{channel}/conversations/{conversation}/users/{user}`.
    pub fn storage_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/conversations/{}/users/{}",
            self.channel_id, self.conversation_id, self.user_id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound(text: &str) -> Activity {
        Activity::message(text)
            .with_channel("emulator", "conv-1")
            .with_from(ChannelAccount::new("user-1").with_name("User"))
            .with_recipient(ChannelAccount::new("bot-1"))
            .with_id("act-1")
    }

    #[test]
    fn test_kind_classification() {
        assert_eq!(Activity::message("x").kind(), ActivityKind::Message);
        assert_eq!(
            Activity::conversation_update(vec![]).kind(),
            ActivityKind::ConversationUpdate
        );
        assert_eq!(
            Activity::new("typing").kind(),
            ActivityKind::Other("typing".to_string())
        );
    }

    #[test]
    fn test_account_equality_is_by_id() {
        let a = ChannelAccount::new("same").with_name("First");
        let b = ChannelAccount::new("same").with_name("Second");
        assert_eq!(a, b);
        assert_ne!(a, ChannelAccount::new("other"));
    }

    #[test]
    fn test_conversation_key_derivation() {
        let key = ConversationKey::from_activity(&inbound("hi")).unwrap();
        assert_eq!(key.storage_key(), "emulator/conversations/conv-1/users/user-1");
    }

    #[test]
    fn test_conversation_key_requires_all_parts() {
        let mut activity = inbound("hi");
        activity.from.id.clear();
        assert!(ConversationKey::from_activity(&activity).is_none());
        assert!(ConversationKey::from_activity(&Activity::message("hi")).is_none());
    }

    #[test]
    fn test_create_reply_swaps_addressing() {
        let incoming = inbound("hi");
        let reply = incoming.create_reply(Activity::message("hello back"));

        assert_eq!(reply.from.id, "bot-1");
        assert_eq!(reply.recipient.id, "user-1");
        assert_eq!(reply.conversation.id, "conv-1");
        assert_eq!(reply.channel_id, "emulator");
        assert_eq!(reply.reply_to_id.as_deref(), Some("act-1"));
        assert!(reply.id.is_some());
        assert_eq!(reply.text.as_deref(), Some("hello back"));
    }

    #[test]
    fn test_deserialize_wire_shape() {
        let raw = r#"{
            "type": "conversationUpdate",
            "channelId": "msteams",
            "conversation": {"id": "c"},
            "from": {"id": "u"},
            "recipient": {"id": "b", "name": "Bot"},
            "membersAdded": [{"id": "u"}, {"id": "b"}]
        }"#;
        let activity: Activity = serde_json::from_str(raw).unwrap();

        assert_eq!(activity.kind(), ActivityKind::ConversationUpdate);
        assert_eq!(activity.members_added.len(), 2);
        assert!(activity.text.is_none());
        assert_eq!(activity.recipient.name.as_deref(), Some("Bot"));
    }
}

//! Attachments and hero cards for outbound replies.

use serde::{Deserialize, Serialize};

pub const HERO_CARD_CONTENT_TYPE: &str = "application/vnd.microsoft.card.hero";

/// Structured payload carried by an outbound activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    OpenUrl,
    ImBack,
    PostBack,
}

/// A clickable button on a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardAction {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    pub value: String,
}

impl CardAction {
    /// Button that opens `url`; the label doubles as text and display text.
    pub fn open_url(label: impl Into<String>, url: impl Into<String>) -> Self {
        let label = label.into();
        Self {
            action_type: ActionType::OpenUrl,
            text: Some(label.clone()),
            display_text: Some(label.clone()),
            title: label,
            value: url.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroCard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default)]
    pub buttons: Vec<CardAction>,
}

impl HeroCard {
    pub fn to_attachment(&self) -> Result<Attachment, serde_json::Error> {
        Ok(Attachment {
            content_type: HERO_CARD_CONTENT_TYPE.to_string(),
            content: Some(serde_json::to_value(self)?),
            name: None,
        })
    }

    /// Reads a hero card back out of an attachment; `None` for other content types.
    pub fn from_attachment(attachment: &Attachment) -> Option<Self> {
        if attachment.content_type != HERO_CARD_CONTENT_TYPE {
            return None;
        }
        attachment
            .content
            .as_ref()
            .and_then(|content| serde_json::from_value(content.clone()).ok())
    }
}

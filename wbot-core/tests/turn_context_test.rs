//! Integration tests for [`wbot_core::TurnContext`] sending.
//!
//! Covers: reply addressing, batch sends in order, the responded flag, and a failing
//! send stopping the batch.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use wbot_core::{
    Activity, ChannelAccount, ChannelSender, ResourceResponse, SendError, TranscriptSender,
    TurnContext,
};

fn inbound() -> Activity {
    Activity::message("hi")
        .with_channel("test", "conv")
        .with_from(ChannelAccount::new("user"))
        .with_recipient(ChannelAccount::new("bot"))
        .with_id("in-1")
}

/// **Test: send_activities delivers every activity in order, addressed as replies.**
#[tokio::test]
async fn test_send_activities_in_order() {
    let sender = Arc::new(TranscriptSender::new());
    let ctx = TurnContext::new(inbound(), sender.clone());
    assert!(!ctx.responded());

    let responses = ctx
        .send_activities(vec![
            Activity::message("one"),
            Activity::message("two"),
            Activity::message("three"),
        ])
        .await
        .unwrap();

    assert_eq!(responses.len(), 3);
    assert_eq!(sender.texts(), vec!["one", "two", "three"]);
    for sent in sender.sent() {
        assert_eq!(sent.from.id, "bot");
        assert_eq!(sent.recipient.id, "user");
        assert_eq!(sent.reply_to_id.as_deref(), Some("in-1"));
    }
    assert!(ctx.responded());
}

/// **Test: An empty batch sends nothing and leaves the turn unanswered.**
#[tokio::test]
async fn test_send_activities_empty() {
    let sender = Arc::new(TranscriptSender::new());
    let ctx = TurnContext::new(inbound(), sender.clone());

    let responses = ctx.send_activities(Vec::new()).await.unwrap();

    assert!(responses.is_empty());
    assert!(sender.sent().is_empty());
    assert!(!ctx.responded());
}

/// **Test: The first failing send stops the batch.**
#[tokio::test]
async fn test_send_activities_stops_at_failure() {
    struct FailSecond {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl ChannelSender for FailSecond {
        async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse, SendError> {
            if self.attempts.fetch_add(1, Ordering::SeqCst) == 1 {
                return Err(SendError::Transport("connection reset".to_string()));
            }
            Ok(ResourceResponse {
                id: activity.id.clone().unwrap_or_default(),
            })
        }
    }

    let sender = Arc::new(FailSecond {
        attempts: AtomicUsize::new(0),
    });
    let ctx = TurnContext::new(inbound(), sender.clone());

    let result = ctx
        .send_activities(vec![
            Activity::message("one"),
            Activity::message("two"),
            Activity::message("three"),
        ])
        .await;

    assert!(matches!(result, Err(SendError::Transport(_))));
    assert_eq!(sender.attempts.load(Ordering::SeqCst), 2);
}

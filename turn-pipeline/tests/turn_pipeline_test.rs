//! Integration tests for [`turn_pipeline::TurnPipeline`].
//!
//! Covers: commit after a successful dispatch, exactly one commit per turn, all sends
//! observed before the commit, no commit when the handler fails, and commit errors
//! surfacing as `TurnError::State`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use storage::{MemoryStorage, Storage, StorageError, StoreItem};
use turn_pipeline::TurnPipeline;
use wbot_core::{
    Activity, ActivityHandler, ChannelAccount, ChannelSender, HandlerError, HandlerResult,
    ResourceResponse, SendError, StatePropertyAccessor, TranscriptSender, TurnContext, TurnError,
    UserState,
};

type EventLog = Arc<Mutex<Vec<String>>>;

/// Storage wrapper that logs every write into a shared event log.
struct LoggingStorage {
    inner: MemoryStorage,
    events: EventLog,
    fail_writes: bool,
}

#[async_trait]
impl Storage for LoggingStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, StoreItem>, StorageError> {
        self.inner.read(keys).await
    }

    async fn write(
        &self,
        changes: HashMap<String, StoreItem>,
    ) -> Result<HashMap<String, String>, StorageError> {
        self.events.lock().unwrap().push("commit".to_string());
        if self.fail_writes {
            return Err(StorageError::Database("disk full".to_string()));
        }
        self.inner.write(changes).await
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        self.inner.delete(keys).await
    }
}

/// Sender that logs every send into the same event log.
struct LoggingSender {
    inner: TranscriptSender,
    events: EventLog,
}

#[async_trait]
impl ChannelSender for LoggingSender {
    async fn send_activity(&self, activity: &Activity) -> Result<ResourceResponse, SendError> {
        self.events
            .lock()
            .unwrap()
            .push(format!("send:{}", activity.text.clone().unwrap_or_default()));
        self.inner.send_activity(activity).await
    }
}

/// Touches state, sends two replies, then fails if the text is "fail".
struct TwoReplyBot {
    visits: StatePropertyAccessor<u32>,
}

#[async_trait]
impl ActivityHandler for TwoReplyBot {
    async fn on_message_activity(&self, ctx: &TurnContext) -> HandlerResult {
        let visits = self.visits.get(ctx, || 0).await? + 1;
        self.visits.set(ctx, &visits).await?;
        ctx.send_text("first").await?;
        ctx.send_text("second").await?;
        if ctx.activity().text.as_deref() == Some("fail") {
            return Err(HandlerError::InvalidActivity("requested failure".to_string()));
        }
        Ok(())
    }
}

struct Harness {
    pipeline: TurnPipeline,
    storage: MemoryStorage,
    events: EventLog,
}

fn harness(fail_writes: bool) -> Harness {
    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let storage = MemoryStorage::new();
    let user_state = UserState::new(Arc::new(LoggingStorage {
        inner: storage.clone(),
        events: events.clone(),
        fail_writes,
    }));
    let bot = TwoReplyBot {
        visits: user_state.create_property("Visits"),
    };
    let sender = LoggingSender {
        inner: TranscriptSender::new(),
        events: events.clone(),
    };
    Harness {
        pipeline: TurnPipeline::new(Arc::new(bot), user_state, Arc::new(sender)),
        storage,
        events,
    }
}

fn message(text: &str) -> Activity {
    Activity::message(text)
        .with_channel("test", "conv")
        .with_from(ChannelAccount::new("user"))
        .with_recipient(ChannelAccount::new("bot"))
}

const KEY: &str = "test/conversations/conv/users/user";

/// **Test: Sends happen before the single commit of the turn.**
#[tokio::test]
async fn test_sends_precede_single_commit() {
    let h = harness(false);

    h.pipeline.on_turn(message("go")).await.unwrap();

    assert_eq!(
        *h.events.lock().unwrap(),
        vec!["send:first", "send:second", "commit"]
    );
    assert_eq!(h.storage.raw(KEY).await.as_deref(), Some(r#"{"Visits":1}"#));
}

/// **Test: State mutations accumulate across successive turns.**
#[tokio::test]
async fn test_state_carries_across_turns() {
    let h = harness(false);

    for _ in 0..3 {
        h.pipeline.on_turn(message("go")).await.unwrap();
    }

    assert_eq!(h.storage.raw(KEY).await.as_deref(), Some(r#"{"Visits":3}"#));
}

/// **Test: A failing handler aborts the turn before commit; storage is never written.**
#[tokio::test]
async fn test_no_commit_on_handler_failure() {
    let h = harness(false);

    let result = h.pipeline.on_turn(message("fail")).await;

    assert!(matches!(result, Err(TurnError::Dispatch(_))));
    assert!(!h.events.lock().unwrap().contains(&"commit".to_string()));
    assert!(h.storage.is_empty().await);
}

/// **Test: Storage failure during commit surfaces as TurnError::State.**
#[tokio::test]
async fn test_commit_failure_surfaces() {
    let h = harness(true);

    let result = h.pipeline.on_turn(message("go")).await;

    assert!(matches!(result, Err(TurnError::State(_))));
    assert_eq!(
        *h.events.lock().unwrap(),
        vec!["send:first", "send:second", "commit"]
    );
}

/// **Test: A turn that never touches state does not write to storage.**
#[tokio::test]
async fn test_turn_without_state_access_commits_nothing() {
    let h = harness(false);
    let update = Activity::conversation_update(vec![ChannelAccount::new("user")])
        .with_channel("test", "conv")
        .with_from(ChannelAccount::new("user"))
        .with_recipient(ChannelAccount::new("bot"));

    h.pipeline.on_turn(update).await.unwrap();

    assert!(h.events.lock().unwrap().is_empty());
}

/// **Test: Concurrent turns for different users all commit.**
#[tokio::test]
async fn test_concurrent_turns_for_different_users() {
    let h = harness(false);

    let mut tasks = Vec::new();
    for i in 0..10 {
        let pipeline = h.pipeline.clone();
        let activity = message("go").with_from(ChannelAccount::new(format!("user-{i}")));
        tasks.push(tokio::spawn(async move { pipeline.on_turn(activity).await }));
    }
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(h.storage.len().await, 10);
}

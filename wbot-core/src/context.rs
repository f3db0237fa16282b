//! Per-turn handle: the inbound activity, the reply capability, and the
//! turn-scoped cache of loaded state records.
//!
//! A context lives for exactly one turn. Anything that must outlive the turn goes
//! through [`crate::UserState`], never through the context.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::activity::Activity;
use crate::bot::{ChannelSender, ResourceResponse};
use crate::error::SendError;

/// A state record as loaded for this turn, plus the e-tag it was read at.
#[derive(Debug, Clone, Default)]
pub(crate) struct CachedState {
    pub(crate) storage_key: String,
    pub(crate) record: Map<String, Value>,
    pub(crate) e_tag: Option<String>,
}

pub struct TurnContext {
    activity: Activity,
    sender: Arc<dyn ChannelSender>,
    state_cache: RwLock<HashMap<&'static str, CachedState>>,
    responded: AtomicBool,
}

impl TurnContext {
    pub fn new(activity: Activity, sender: Arc<dyn ChannelSender>) -> Self {
        Self {
            activity,
            sender,
            state_cache: RwLock::new(HashMap::new()),
            responded: AtomicBool::new(false),
        }
    }

    /// The inbound activity of this turn.
    pub fn activity(&self) -> &Activity {
        &self.activity
    }

    /// True once any reply has been sent in this turn.
    pub fn responded(&self) -> bool {
        self.responded.load(Ordering::SeqCst)
    }

    /// Addresses `activity` as a reply to the inbound activity and sends it.
    pub async fn send_activity(&self, activity: Activity) -> Result<ResourceResponse, SendError> {
        let reply = self.activity.create_reply(activity);
        info!(
            conversation_id = %reply.conversation.id,
            recipient_id = %reply.recipient.id,
            has_attachments = !reply.attachments.is_empty(),
            "step: sending reply"
        );
        let response = self.sender.send_activity(&reply).await?;
        self.responded.store(true, Ordering::SeqCst);
        Ok(response)
    }

    pub async fn send_text(&self, text: impl Into<String>) -> Result<ResourceResponse, SendError> {
        self.send_activity(Activity::message(text)).await
    }

    /// Sends each activity in order, stopping at the first failure.
    pub async fn send_activities(
        &self,
        activities: Vec<Activity>,
    ) -> Result<Vec<ResourceResponse>, SendError> {
        let mut responses = Vec::with_capacity(activities.len());
        for activity in activities {
            responses.push(self.send_activity(activity).await?);
        }
        Ok(responses)
    }

    pub(crate) async fn cached_state(&self, scope: &'static str) -> Option<CachedState> {
        self.state_cache.read().await.get(scope).cloned()
    }

    pub(crate) async fn has_cached_state(&self, scope: &'static str) -> bool {
        self.state_cache.read().await.contains_key(scope)
    }

    pub(crate) async fn put_cached_state(&self, scope: &'static str, state: CachedState) {
        debug!(scope, storage_key = %state.storage_key, "Caching state for turn");
        self.state_cache.write().await.insert(scope, state);
    }

    /// Applies `f` to the cached record of `scope`; returns `None` if nothing is cached.
    pub(crate) async fn with_cached_state<R>(
        &self,
        scope: &'static str,
        f: impl FnOnce(&mut CachedState) -> R,
    ) -> Option<R> {
        let mut cache = self.state_cache.write().await;
        cache.get_mut(scope).map(f)
    }
}

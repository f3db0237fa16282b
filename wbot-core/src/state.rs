//! Per-user state: a flat JSON record per [`ConversationKey`], read once per turn
//! into the turn context and written back by [`UserState::save_changes`].
//!
//! Mutations through a [`StatePropertyAccessor`] only touch the turn cache; storage
//! sees them when the turn commits. Commits carry the e-tag the record was loaded
//! at, so two turns racing on the same key cannot silently overwrite each other.

use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use storage::{Storage, StoreItem};
use tracing::{debug, info, instrument};

use crate::activity::ConversationKey;
use crate::context::{CachedState, TurnContext};
use crate::error::StateStoreError;

const USER_STATE_SCOPE: &str = "UserState";

/// Process-wide user state store. Cheap to clone; all clones share one [`Storage`].
#[derive(Clone)]
pub struct UserState {
    storage: Arc<dyn Storage>,
}

impl UserState {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Typed accessor for one property of the user record.
    pub fn create_property<T>(&self, name: impl Into<String>) -> StatePropertyAccessor<T> {
        StatePropertyAccessor {
            name: name.into(),
            state: self.clone(),
            _marker: PhantomData,
        }
    }

    pub fn storage_key(&self, ctx: &TurnContext) -> Result<String, StateStoreError> {
        ConversationKey::from_activity(ctx.activity())
            .map(|key| key.storage_key())
            .ok_or_else(|| {
                StateStoreError::MissingKey(
                    "activity lacks channel id, conversation id or sender id".to_string(),
                )
            })
    }

    /// Reads the record into the turn cache. A cached record is reused unless `force`.
    #[instrument(skip(self, ctx))]
    pub async fn load(&self, ctx: &TurnContext, force: bool) -> Result<(), StateStoreError> {
        if !force && ctx.has_cached_state(USER_STATE_SCOPE).await {
            return Ok(());
        }

        let storage_key = self.storage_key(ctx)?;
        let mut items = self.storage.read(std::slice::from_ref(&storage_key)).await?;
        let cached = match items.remove(&storage_key) {
            Some(item) => CachedState {
                record: into_record(item.value)?,
                e_tag: item.e_tag,
                storage_key,
            },
            None => CachedState {
                storage_key,
                ..Default::default()
            },
        };

        debug!(
            storage_key = %cached.storage_key,
            properties = cached.record.len(),
            existing = cached.e_tag.is_some(),
            "User state loaded"
        );
        ctx.put_cached_state(USER_STATE_SCOPE, cached).await;
        Ok(())
    }

    /// Writes the cached record for this turn's key. No-op if nothing was loaded.
    ///
    /// The write is unconditional on content: an unchanged record is written again
    /// with the same bytes. On success the new e-tag replaces the cached one, so a
    /// repeated commit in the same turn does not conflict with itself.
    #[instrument(skip(self, ctx))]
    pub async fn save_changes(&self, ctx: &TurnContext) -> Result<(), StateStoreError> {
        let Some(cached) = ctx.cached_state(USER_STATE_SCOPE).await else {
            debug!("No user state loaded this turn, nothing to commit");
            return Ok(());
        };

        let storage_key = cached.storage_key.clone();
        let changes = HashMap::from([(
            storage_key.clone(),
            StoreItem::new(Value::Object(cached.record), cached.e_tag),
        )]);
        let mut e_tags = self.storage.write(changes).await?;

        if let Some(e_tag) = e_tags.remove(&storage_key) {
            ctx.with_cached_state(USER_STATE_SCOPE, |c| c.e_tag = Some(e_tag))
                .await;
        }
        info!(storage_key = %storage_key, "step: user state committed");
        Ok(())
    }

    /// Empties the record in the turn cache; storage changes on the next commit.
    pub async fn clear(&self, ctx: &TurnContext) -> Result<(), StateStoreError> {
        self.load(ctx, false).await?;
        ctx.with_cached_state(USER_STATE_SCOPE, |c| c.record.clear())
            .await;
        Ok(())
    }

    async fn property_value(&self, ctx: &TurnContext, name: &str) -> Option<Value> {
        ctx.with_cached_state(USER_STATE_SCOPE, |c| c.record.get(name).cloned())
            .await
            .flatten()
    }

    async fn set_property_value(&self, ctx: &TurnContext, name: &str, value: Value) {
        ctx.with_cached_state(USER_STATE_SCOPE, |c| {
            c.record.insert(name.to_string(), value);
        })
        .await;
    }

    async fn delete_property_value(&self, ctx: &TurnContext, name: &str) {
        ctx.with_cached_state(USER_STATE_SCOPE, |c| {
            c.record.remove(name);
        })
        .await;
    }
}

fn into_record(value: Value) -> Result<Map<String, Value>, StateStoreError> {
    match value {
        Value::Object(record) => Ok(record),
        Value::Null => Ok(Map::new()),
        other => Err(StateStoreError::Serialization(serde::de::Error::custom(
            format!("user state record must be a JSON object, got {}", other),
        ))),
    }
}

/// Named, typed view over one property of the user record. Stateless and reusable
/// across turns; the value lives in the turn context and in storage.
pub struct StatePropertyAccessor<T> {
    name: String,
    state: UserState,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for StatePropertyAccessor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: self.state.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> StatePropertyAccessor<T>
where
    T: Serialize + DeserializeOwned + Send,
{
    /// Returns the stored value, or stores `default_factory()` in the turn cache and
    /// returns it when the property is absent.
    pub async fn get<F>(&self, ctx: &TurnContext, default_factory: F) -> Result<T, StateStoreError>
    where
        F: FnOnce() -> T + Send,
    {
        self.state.load(ctx, false).await?;

        if let Some(value) = self.state.property_value(ctx, &self.name).await {
            return Ok(serde_json::from_value(value)?);
        }

        let value = default_factory();
        debug!(property = %self.name, "Property absent, storing default");
        self.state
            .set_property_value(ctx, &self.name, serde_json::to_value(&value)?)
            .await;
        Ok(value)
    }

    pub async fn set(&self, ctx: &TurnContext, value: &T) -> Result<(), StateStoreError>
    where
        T: Sync,
    {
        self.state.load(ctx, false).await?;
        self.state
            .set_property_value(ctx, &self.name, serde_json::to_value(value)?)
            .await;
        Ok(())
    }

    pub async fn delete(&self, ctx: &TurnContext) -> Result<(), StateStoreError> {
        self.state.load(ctx, false).await?;
        self.state.delete_property_value(ctx, &self.name).await;
        Ok(())
    }
}

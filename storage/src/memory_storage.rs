//! # In-memory storage
//!
//! Process-local implementation of [`Storage`]. Records are kept serialized so
//! that every read hands out a fresh copy and `raw` can expose the exact bytes
//! a write produced.
//!
//! The whole map sits behind one `tokio::sync::RwLock`; a batch write checks
//! every e-tag and applies every change under a single write guard, so a batch
//! is atomic with respect to concurrent readers and writers.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::models::StoreItem;
use crate::storage::Storage;

#[derive(Debug, Clone)]
struct StoredRecord {
    json: String,
    e_tag: String,
}

#[derive(Debug, Default)]
struct Inner {
    records: HashMap<String, StoredRecord>,
    next_e_tag: u64,
}

/// In-memory state storage for tests, development and the console host.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<RwLock<Inner>>,
}

impl MemoryStorage {
    /// Creates a new empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored records.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Returns true if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Serialized JSON of the record as last written.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.inner
            .read()
            .await
            .records
            .get(key)
            .map(|r| r.json.clone())
    }

    /// Clears all records.
    pub async fn clear(&self) {
        self.inner.write().await.records.clear();
    }
}

fn check_e_tag(key: &str, item: &StoreItem, current: Option<&StoredRecord>) -> Result<(), StorageError> {
    if item.is_wildcard() {
        return Ok(());
    }
    let matches = match (item.e_tag.as_deref(), current) {
        (None, None) => true,
        (Some(expected), Some(record)) => expected == record.e_tag,
        _ => false,
    };
    if matches {
        Ok(())
    } else {
        Err(StorageError::Conflict {
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, StoreItem>, StorageError> {
        let inner = self.inner.read().await;
        let mut items = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(record) = inner.records.get(key) {
                let value = serde_json::from_str(&record.json)?;
                items.insert(key.clone(), StoreItem::new(value, Some(record.e_tag.clone())));
            }
        }
        debug!(requested = keys.len(), found = items.len(), "Memory storage read");
        Ok(items)
    }

    async fn write(
        &self,
        changes: HashMap<String, StoreItem>,
    ) -> Result<HashMap<String, String>, StorageError> {
        let mut serialized = Vec::with_capacity(changes.len());
        for (key, item) in &changes {
            serialized.push((key, item, serde_json::to_string(&item.value)?));
        }

        let mut inner = self.inner.write().await;
        for (key, item, _) in &serialized {
            check_e_tag(key, item, inner.records.get(*key))?;
        }

        let mut e_tags = HashMap::with_capacity(serialized.len());
        for (key, _, json) in serialized {
            inner.next_e_tag += 1;
            let e_tag = inner.next_e_tag.to_string();
            inner.records.insert(
                key.clone(),
                StoredRecord {
                    json,
                    e_tag: e_tag.clone(),
                },
            );
            e_tags.insert(key.clone(), e_tag);
        }

        info!(written = e_tags.len(), "Memory storage write committed");
        Ok(e_tags)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), StorageError> {
        let mut inner = self.inner.write().await;
        for key in keys {
            inner.records.remove(key);
        }
        Ok(())
    }
}

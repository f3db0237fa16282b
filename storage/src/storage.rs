use std::collections::HashMap;

use async_trait::async_trait;

use crate::error::StorageError;
use crate::models::StoreItem;

/// Durable keyed storage of opaque JSON records.
///
/// Writes are batched and applied all-or-nothing: if any item fails its e-tag
/// check the whole batch is rejected with [`StorageError::Conflict`].
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the stored items for the keys that exist; missing keys are absent from the map.
    async fn read(&self, keys: &[String]) -> Result<HashMap<String, StoreItem>, StorageError>;

    /// Writes all changes atomically and returns the new e-tag of every written key.
    async fn write(
        &self,
        changes: HashMap<String, StoreItem>,
    ) -> Result<HashMap<String, String>, StorageError>;

    /// Removes the keys; deleting a missing key is not an error.
    async fn delete(&self, keys: &[String]) -> Result<(), StorageError>;
}

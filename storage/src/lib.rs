//! Storage crate: durable keyed state blobs with optimistic concurrency.
//!
//! ## Modules
//!
//! - [`error`] – Storage error types
//! - [`models`] – StoreItem and e-tag conventions
//! - [`storage`] – Storage trait
//! - [`memory_storage`] – MemoryStorage (process-local)
//! - [`sqlite_storage`] – SqliteStorage (SQLite via sqlx)
//! - [`sqlite_pool`] – SqlitePoolManager

mod error;
mod memory_storage;
mod models;
mod sqlite_pool;
mod sqlite_storage;
mod storage;


pub use error::StorageError;
pub use memory_storage::MemoryStorage;
pub use models::{StoreItem, ANY_E_TAG};
pub use sqlite_pool::SqlitePoolManager;
pub use sqlite_storage::SqliteStorage;
pub use storage::Storage;

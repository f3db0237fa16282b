//! Stored state blob plus its version token.
//!
//! Returned by `Storage::read` and passed to `Storage::write`.

use serde::{Deserialize, Serialize};

/// Wildcard e-tag: the write replaces whatever is stored.
pub const ANY_E_TAG: &str = "*";

/// One record as seen by storage: an opaque JSON value and the e-tag it was read at.
///
/// On write the e-tag is the expectation:
/// - `None`: the key must not exist yet;
/// - `Some("*")`: unconditional overwrite;
/// - `Some(tag)`: the stored e-tag must equal `tag`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreItem {
    pub value: serde_json::Value,
    pub e_tag: Option<String>,
}

impl StoreItem {
    pub fn new(value: serde_json::Value, e_tag: Option<String>) -> Self {
        Self { value, e_tag }
    }

    /// Item written without any concurrency check.
    pub fn overwrite(value: serde_json::Value) -> Self {
        Self {
            value,
            e_tag: Some(ANY_E_TAG.to_string()),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        self.e_tag.as_deref() == Some(ANY_E_TAG)
    }
}

//! Result item models.
//!
//! Items are what a result source hands back for each page. The engine only
//! cares about an item's identity; the payload is passed through untouched
//! to the per-item callback and the step envelope.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A single item returned by a result source.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct Item {
    /// Stable identity of the item within its batch.
    ///
    /// Used as the key for per-item status records and error reports.
    pub id: String,

    /// Opaque payload handed to the per-item callback.
    #[serde(default)]
    #[ts(type = "unknown")]
    pub data: serde_json::Value,
}

impl Item {
    /// Create an item with the given identity and payload.
    pub fn new(id: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }
}

/// Per-item processing status recorded in the item status store.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// The callback completed normally; the item is skipped on re-entry.
    Success,

    /// The callback signaled a failure; the item is retried on re-entry.
    Failed,
}

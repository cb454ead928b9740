//! Store traits and error types.

use async_trait::async_trait;
use bs_protocol::item_models::ItemStatus;
use bs_protocol::run_models::RunStatusRecord;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to access status file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Corrupt status file at {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("Failed to encode status: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Per-item status, keyed by `(process_id, item_id)`.
///
/// Records of different process ids are independent. The engine takes no
/// locks of its own; at most one step per process id is expected in flight.
#[async_trait]
pub trait ItemStatusStore: Send + Sync {
    async fn get_status(
        &self,
        process_id: &str,
        item_id: &str,
    ) -> Result<Option<ItemStatus>, StoreError>;

    async fn set_status(
        &self,
        process_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<(), StoreError>;

    /// Drop every item record of a process.
    async fn clear_all(&self, process_id: &str) -> Result<(), StoreError>;
}

/// One run status record per process id.
#[async_trait]
pub trait RunStatusStore: Send + Sync {
    async fn save_run_status(
        &self,
        process_id: &str,
        record: &RunStatusRecord,
    ) -> Result<(), StoreError>;

    async fn load_run_status(&self, process_id: &str)
        -> Result<Option<RunStatusRecord>, StoreError>;
}

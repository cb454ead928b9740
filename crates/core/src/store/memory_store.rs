//! In-memory status store.

use crate::store::base::{ItemStatusStore, RunStatusStore, StoreError};
use async_trait::async_trait;
use bs_protocol::item_models::ItemStatus;
use bs_protocol::run_models::RunStatusRecord;
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Keeps item and run status in process memory.
#[derive(Default)]
pub struct MemoryStatusStore {
    /// process_id -> item_id -> status
    items: Mutex<HashMap<String, HashMap<String, ItemStatus>>>,
    runs: Mutex<HashMap<String, RunStatusRecord>>,
}

impl MemoryStatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of item records held for a process.
    pub async fn item_count(&self, process_id: &str) -> usize {
        let items = self.items.lock().await;
        items.get(process_id).map_or(0, HashMap::len)
    }
}

#[async_trait]
impl ItemStatusStore for MemoryStatusStore {
    async fn get_status(
        &self,
        process_id: &str,
        item_id: &str,
    ) -> Result<Option<ItemStatus>, StoreError> {
        let items = self.items.lock().await;
        Ok(items
            .get(process_id)
            .and_then(|statuses| statuses.get(item_id))
            .copied())
    }

    async fn set_status(
        &self,
        process_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<(), StoreError> {
        let mut items = self.items.lock().await;
        items
            .entry(process_id.to_string())
            .or_default()
            .insert(item_id.to_string(), status);
        Ok(())
    }

    async fn clear_all(&self, process_id: &str) -> Result<(), StoreError> {
        self.items.lock().await.remove(process_id);
        Ok(())
    }
}

#[async_trait]
impl RunStatusStore for MemoryStatusStore {
    async fn save_run_status(
        &self,
        process_id: &str,
        record: &RunStatusRecord,
    ) -> Result<(), StoreError> {
        self.runs
            .lock()
            .await
            .insert(process_id.to_string(), record.clone());
        Ok(())
    }

    async fn load_run_status(
        &self,
        process_id: &str,
    ) -> Result<Option<RunStatusRecord>, StoreError> {
        Ok(self.runs.lock().await.get(process_id).cloned())
    }
}

//! JSON-file status store.
//!
//! Layout under the store root:
//!
//! ```text
//! <root>/<process_id>/run.json               RunStatusRecord
//! <root>/<process_id>/items/<item_id>.json   "success" | "failed"
//! ```
//!
//! Item ids are escaped into file names: ASCII letters, digits, `-` and `_`
//! are kept, every other byte becomes `%XX`.

use crate::store::base::{ItemStatusStore, RunStatusStore, StoreError};
use async_trait::async_trait;
use bs_protocol::item_models::ItemStatus;
use bs_protocol::run_models::RunStatusRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

const RUN_FILE: &str = "run.json";
const ITEMS_DIR: &str = "items";

/// Persists status records as JSON files, one directory per process id and
/// one file per item, so no operation reads or rewrites more than a single
/// record.
///
/// Writes go through a temporary file and a rename so a crash never leaves a
/// half-written record behind.
pub struct FileStatusStore {
    root: PathBuf,
}

impl FileStatusStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn process_dir(&self, process_id: &str) -> PathBuf {
        self.root.join(process_id)
    }

    fn items_dir(&self, process_id: &str) -> PathBuf {
        self.process_dir(process_id).join(ITEMS_DIR)
    }

    fn item_path(&self, process_id: &str, item_id: &str) -> PathBuf {
        self.items_dir(process_id).join(item_file_name(item_id))
    }

    async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }

        let content = serde_json::to_vec_pretty(value)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)
    }
}

/// File name holding the status of `item_id`.
fn item_file_name(item_id: &str) -> String {
    let mut name = String::with_capacity(item_id.len() + 5);
    for byte in item_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_' {
            name.push(char::from(byte));
        } else {
            name.push_str(&format!("%{byte:02X}"));
        }
    }
    name.push_str(".json");
    name
}

#[async_trait]
impl ItemStatusStore for FileStatusStore {
    async fn get_status(
        &self,
        process_id: &str,
        item_id: &str,
    ) -> Result<Option<ItemStatus>, StoreError> {
        Self::read_json(&self.item_path(process_id, item_id)).await
    }

    async fn set_status(
        &self,
        process_id: &str,
        item_id: &str,
        status: ItemStatus,
    ) -> Result<(), StoreError> {
        Self::write_json(&self.item_path(process_id, item_id), &status).await
    }

    async fn clear_all(&self, process_id: &str) -> Result<(), StoreError> {
        let path = self.items_dir(process_id);
        match tokio::fs::remove_dir_all(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[async_trait]
impl RunStatusStore for FileStatusStore {
    async fn save_run_status(
        &self,
        process_id: &str,
        record: &RunStatusRecord,
    ) -> Result<(), StoreError> {
        let path = self.process_dir(process_id).join(RUN_FILE);
        Self::write_json(&path, record).await
    }

    async fn load_run_status(
        &self,
        process_id: &str,
    ) -> Result<Option<RunStatusRecord>, StoreError> {
        let path = self.process_dir(process_id).join(RUN_FILE);
        Self::read_json(&path).await
    }
}

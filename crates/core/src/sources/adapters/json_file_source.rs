//! Result source reading a JSON array from disk.

use crate::sources::base::{FetchedPage, Pagination, ResultSource, SourceError};
use async_trait::async_trait;
use bs_protocol::batch_models::QueryArgs;
use bs_protocol::item_models::Item;
use std::path::PathBuf;

/// A result source backed by a JSON file holding an array of items.
///
/// The file is re-read on every fetch, so edits made while a batch is running
/// (including edits made by the batch's own callback) show up in the next
/// observed total.
///
/// # Example
///
/// ```json
/// [
///   { "id": "1", "data": { "status": "draft" } },
///   { "id": "2", "data": { "status": "publish" } }
/// ]
/// ```
pub struct JsonFileSource {
    path: PathBuf,
    pagination: Pagination,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pagination: Pagination::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    async fn read_items(&self) -> Result<Vec<Item>, SourceError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            // A missing file is an empty data set
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(SourceError::FileRead {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|e| SourceError::Parse {
            path: self.path.clone(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ResultSource for JsonFileSource {
    async fn fetch(&self, args: &QueryArgs) -> Result<FetchedPage, SourceError> {
        let items = self.read_items().await?;
        Ok(self.pagination.apply(&items, args))
    }
}

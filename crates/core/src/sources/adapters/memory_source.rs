//! In-memory result source.

use crate::sources::base::{FetchedPage, Pagination, ResultSource, SourceError};
use async_trait::async_trait;
use bs_protocol::batch_models::QueryArgs;
use bs_protocol::item_models::Item;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A result source backed by a shared item list.
///
/// Clones share the same list, so a callback (or a test) holding a clone can
/// add and remove items between steps the way a live data set would change
/// under a running batch.
#[derive(Clone)]
pub struct MemorySource {
    items: Arc<Mutex<Vec<Item>>>,
    pagination: Pagination,
}

impl MemorySource {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items: Arc::new(Mutex::new(items)),
            pagination: Pagination::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }

    /// Insert items at the front, as newest-first queries would show them.
    pub async fn prepend(&self, new_items: Vec<Item>) {
        let mut items = self.items.lock().await;
        items.splice(0..0, new_items);
    }

    pub async fn push(&self, item: Item) {
        self.items.lock().await.push(item);
    }

    /// Remove an item by identity. Returns whether it was present.
    pub async fn remove(&self, id: &str) -> bool {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        items.len() != before
    }

    pub async fn len(&self) -> usize {
        self.items.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.lock().await.is_empty()
    }
}

#[async_trait]
impl ResultSource for MemorySource {
    async fn fetch(&self, args: &QueryArgs) -> Result<FetchedPage, SourceError> {
        let items = self.items.lock().await;
        Ok(self.pagination.apply(&items, args))
    }
}

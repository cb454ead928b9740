//! Mock sources and callbacks for deterministic testing.

use async_trait::async_trait;
use bs_core::callbacks::base::{CallbackError, ItemCallback};
use bs_core::sources::adapters::MemorySource;
use bs_core::sources::base::{FetchedPage, ResultSource, SourceError};
use bs_protocol::batch_models::QueryArgs;
use bs_protocol::item_models::Item;
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A source that always reports the same total and page, recording the
/// arguments of every fetch.
#[allow(dead_code)]
pub struct ScriptedSource {
    pub observed_total: u64,
    pub page: Vec<Item>,
    pub calls: Mutex<Vec<QueryArgs>>,
}

impl ScriptedSource {
    #[allow(dead_code)]
    pub fn new(observed_total: u64, page: Vec<Item>) -> Self {
        Self {
            observed_total,
            page,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Offsets passed to each fetch, in call order.
    #[allow(dead_code)]
    pub fn offsets(&self) -> Vec<i64> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|args| args.get_i64("offset").unwrap_or(-1))
            .collect()
    }
}

#[async_trait]
impl ResultSource for ScriptedSource {
    async fn fetch(&self, args: &QueryArgs) -> Result<FetchedPage, SourceError> {
        self.calls.lock().unwrap().push(args.clone());
        Ok(FetchedPage {
            items: self.page.clone(),
            observed_total: self.observed_total,
        })
    }
}

/// A source that always fails, counting attempts.
#[allow(dead_code)]
#[derive(Default)]
pub struct FailingSource {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl ResultSource for FailingSource {
    async fn fetch(&self, _args: &QueryArgs) -> Result<FetchedPage, SourceError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SourceError::Query("connection refused".to_string()))
    }
}

/// A callback that records the ids it was called with and fails on a fixed
/// set of ids.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingCallback {
    pub failing: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl RecordingCallback {
    #[allow(dead_code)]
    pub fn failing_on(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    #[allow(dead_code)]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ItemCallback for RecordingCallback {
    async fn call(&self, item: &Item) -> Result<(), CallbackError> {
        self.calls.lock().unwrap().push(item.id.clone());
        if self.failing.contains(&item.id) {
            Err(CallbackError::new(format!("refused {}", item.id)))
        } else {
            Ok(())
        }
    }
}

/// A destructive callback: processing an item deletes it from the source.
#[allow(dead_code)]
pub struct DeletingCallback {
    pub source: MemorySource,
    pub deleted: AtomicUsize,
}

impl DeletingCallback {
    #[allow(dead_code)]
    pub fn new(source: MemorySource) -> Self {
        Self {
            source,
            deleted: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ItemCallback for DeletingCallback {
    async fn call(&self, item: &Item) -> Result<(), CallbackError> {
        if self.source.remove(&item.id).await {
            self.deleted.fetch_add(1, Ordering::SeqCst);
            Ok(())
        } else {
            Err(CallbackError::new(format!("{} already gone", item.id)))
        }
    }
}

/// A source with its own fixed page size: it honours the offset and
/// ignores every other argument.
#[allow(dead_code)]
pub struct FixedPageSource {
    pub items: Vec<Item>,
    pub page_size: usize,
}

#[async_trait]
impl ResultSource for FixedPageSource {
    async fn fetch(&self, args: &QueryArgs) -> Result<FetchedPage, SourceError> {
        let offset = args
            .get_i64("offset")
            .and_then(|o| usize::try_from(o).ok())
            .unwrap_or(0);
        Ok(FetchedPage {
            items: self
                .items
                .iter()
                .skip(offset)
                .take(self.page_size)
                .cloned()
                .collect(),
            observed_total: self.items.len() as u64,
        })
    }
}

//! Per-item result processing.

use crate::callbacks::base::ItemCallback;
use crate::engine::error::BatchResult;
use crate::store::base::ItemStatusStore;
use bs_protocol::item_models::{Item, ItemStatus};
use bs_protocol::step_models::ResultError;
use tracing::{debug, warn};

/// What happened to a page of items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    /// Items the callback ran on, successfully or not.
    pub processed: usize,

    /// Items skipped because they were already marked as succeeded.
    pub skipped: usize,

    /// Callback failures, in input order.
    pub errors: Vec<ResultError>,
}

/// Apply `callback` to every item of `results`, in order.
///
/// Items already recorded as succeeded are skipped, so re-running a step never
/// repeats side effects on completed items. A callback failure marks the item
/// as failed, is appended to the outcome's errors, and processing continues
/// with the next item.
///
/// # Errors
///
/// Only status store failures are returned as errors.
pub async fn process_results(
    process_id: &str,
    results: &[Item],
    callback: &dyn ItemCallback,
    store: &dyn ItemStatusStore,
) -> BatchResult<ProcessOutcome> {
    let mut outcome = ProcessOutcome::default();

    for item in results {
        if store.get_status(process_id, &item.id).await? == Some(ItemStatus::Success) {
            debug!(process_id, item_id = %item.id, "skipping completed item");
            outcome.skipped += 1;
            continue;
        }

        outcome.processed += 1;
        match callback.call(item).await {
            Ok(()) => {
                store
                    .set_status(process_id, &item.id, ItemStatus::Success)
                    .await?;
            }
            Err(e) => {
                warn!(process_id, item_id = %item.id, error = %e, "item callback failed");
                store
                    .set_status(process_id, &item.id, ItemStatus::Failed)
                    .await?;
                outcome.errors.push(ResultError {
                    item_id: item.id.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::base::{CallbackError, FnCallback};
    use crate::store::memory_store::MemoryStatusStore;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn items(ids: &[&str]) -> Vec<Item> {
        ids.iter().map(|id| Item::new(*id, json!({}))).collect()
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_page() {
        let store = MemoryStatusStore::new();
        let callback = FnCallback::new(|item: &Item| {
            if item.id == "3" {
                Err(CallbackError::new("cannot touch item 3"))
            } else {
                Ok(())
            }
        });

        let outcome = process_results("p", &items(&["1", "2", "3", "4", "5"]), &callback, &store)
            .await
            .unwrap();

        assert_eq!(outcome.processed, 5);
        assert_eq!(
            outcome.errors,
            vec![ResultError {
                item_id: "3".to_string(),
                message: "cannot touch item 3".to_string()
            }]
        );
        for id in ["1", "2", "4", "5"] {
            assert_eq!(store.get_status("p", id).await.unwrap(), Some(ItemStatus::Success));
        }
        assert_eq!(store.get_status("p", "3").await.unwrap(), Some(ItemStatus::Failed));
    }

    #[tokio::test]
    async fn test_completed_items_are_not_reprocessed() {
        let store = MemoryStatusStore::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let callback = FnCallback::new(move |_: &Item| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        let page = items(&["a", "b", "c"]);

        process_results("p", &page, &callback, &store).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        let outcome = process_results("p", &page, &callback, &store).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(outcome.skipped, 3);
        assert_eq!(outcome.processed, 0);
        assert!(outcome.errors.is_empty());
    }

    #[tokio::test]
    async fn test_failed_items_are_retried() {
        let store = MemoryStatusStore::new();
        store.set_status("p", "a", ItemStatus::Failed).await.unwrap();
        let callback = FnCallback::new(|_: &Item| Ok(()));

        let outcome = process_results("p", &items(&["a"]), &callback, &store).await.unwrap();

        assert_eq!(outcome.processed, 1);
        assert_eq!(store.get_status("p", "a").await.unwrap(), Some(ItemStatus::Success));
    }

    #[tokio::test]
    async fn test_status_is_scoped_to_the_process() {
        let store = MemoryStatusStore::new();
        store.set_status("other", "a", ItemStatus::Success).await.unwrap();
        let callback = FnCallback::new(|_: &Item| Ok(()));

        let outcome = process_results("p", &items(&["a"]), &callback, &store).await.unwrap();
        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.skipped, 0);
    }
}

//! Test fixtures for creating sample items, batches and project directories.

use bs_core::callbacks::base::ItemCallback;
use bs_core::registry::definition::BatchDefinition;
use bs_core::registry::BatchRegistry;
use bs_core::sources::base::ResultSource;
use bs_core::state::manager::BatchManager;
use bs_protocol::config_models::GlobalConfig;
use bs_protocol::item_models::Item;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

/// Items with ids `prefix1..=prefixN`.
#[allow(dead_code)]
pub fn numbered_items(prefix: &str, count: u32) -> Vec<Item> {
    (1..=count)
        .map(|i| Item::new(format!("{prefix}{i}"), json!({ "n": i })))
        .collect()
}

/// A definition paging by `per_page` with the given page size.
#[allow(dead_code)]
pub fn paged_definition(
    process_id: &str,
    page_size: i64,
    source: Arc<dyn ResultSource>,
    callback: Arc<dyn ItemCallback>,
) -> BatchDefinition {
    BatchDefinition::builder(process_id)
        .name(format!("Test {process_id}"))
        .default_arg("per_page", page_size)
        .page_size_param("per_page")
        .source(source)
        .callback(callback)
        .build()
        .expect("valid test definition")
}

/// An in-memory manager holding a single batch.
#[allow(dead_code)]
pub fn single_batch_manager(definition: BatchDefinition) -> BatchManager {
    let mut registry = BatchRegistry::new();
    registry
        .register(definition)
        .expect("registration should succeed");
    BatchManager::in_memory(registry, GlobalConfig::default())
}

/// Create a temporary project directory with a `.batch-step/` configuration.
///
/// The project holds:
/// - `.batch-step/config.toml` with a default page size of 4
/// - `.batch-step/batches/purge.yaml` purging drafts from `data/posts.json`
/// - `data/posts.json` with 10 drafts, 2 published posts and a sentinel
/// - `purge.sh`, which deletes the item it is given from `data/posts.json`
///   and refuses item `draft-7`
///
/// Returns a TempDir that must be kept alive for the test duration.
#[allow(dead_code)]
pub fn create_test_project() -> std::io::Result<TempDir> {
    let temp_dir = tempfile::tempdir()?;
    let root = temp_dir.path();

    std::fs::create_dir_all(root.join(".batch-step/batches"))?;
    std::fs::create_dir_all(root.join("data"))?;

    std::fs::write(root.join(".batch-step/config.toml"), "default-page-size = 4\n")?;

    let batch_yaml = r#"process-id: purge-drafts
name: Purge drafts
default-args:
  status: draft
  per_page: 4
page-size-param: per_page
source:
  json-file: data/posts.json
callback:
  command: sh
  args: ["purge.sh"]
"#;
    std::fs::write(root.join(".batch-step/batches/purge.yaml"), batch_yaml)?;

    // One item per line, each after the first led by a comma, so deleting a
    // line with grep keeps the file a valid JSON array
    let mut posts = String::from("[{\"id\":\"sentinel\",\"data\":{\"status\":\"keep\"}}\n");
    for i in 1..=10 {
        posts.push_str(&format!(",{{\"id\":\"draft-{i}\",\"data\":{{\"status\":\"draft\"}}}}\n"));
    }
    for i in 1..=2 {
        posts.push_str(&format!(",{{\"id\":\"post-{i}\",\"data\":{{\"status\":\"publish\"}}}}\n"));
    }
    posts.push_str("]\n");
    std::fs::write(root.join("data/posts.json"), posts)?;

    let script = r#"#!/bin/sh
cat > /dev/null
if [ "$BATCH_STEP_ITEM_ID" = "draft-7" ]; then
  echo "draft-7 is locked" >&2
  exit 1
fi
grep -v "\"id\":\"$BATCH_STEP_ITEM_ID\"" data/posts.json > data/posts.json.tmp
mv data/posts.json.tmp data/posts.json
"#;
    std::fs::write(root.join("purge.sh"), script)?;

    Ok(temp_dir)
}

/// An in-memory manager holding a single batch under the given settings.
#[allow(dead_code)]
pub fn single_batch_manager_with(definition: BatchDefinition, global: GlobalConfig) -> BatchManager {
    let mut registry = BatchRegistry::new();
    registry
        .register(definition)
        .expect("registration should succeed");
    BatchManager::in_memory(registry, global)
}

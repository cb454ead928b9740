//! File-level configuration models.
//!
//! The protocol crate owns the parts a driver can see (`BatchConfig`,
//! `GlobalConfig`); the models here add what only the local process needs:
//! where items come from and what runs for each of them.

use bs_protocol::batch_models::BatchConfig;
use bs_protocol::config_models::GlobalConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where a configured batch reads its items from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum SourceSpec {
    /// A JSON array of items, relative paths resolved against the project root.
    JsonFile(PathBuf),
}

/// What a configured batch runs for every item.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CallbackSpec {
    /// Program to execute.
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

/// A batch definition as written in `.batch-step/batches/*.yaml`.
///
/// # Example
///
/// ```yaml
/// process-id: purge-drafts
/// name: Purge drafts
/// default-args:
///   status: draft
///   per_page: 20
/// page-size-param: per_page
/// source:
///   json-file: data/posts.json
/// callback:
///   command: ./scripts/purge.sh
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BatchSpec {
    #[serde(flatten)]
    pub config: BatchConfig,

    pub source: SourceSpec,

    pub callback: CallbackSpec,
}

/// Everything loaded from a project's `.batch-step/` directory.
///
/// # Example
///
/// ```rust,no_run
/// use bs_core::config::loader::load_config;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new(".")).await?;
/// println!("Loaded {} batches", config.batches.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub global: GlobalConfig,
    pub batches: Vec<BatchSpec>,
}

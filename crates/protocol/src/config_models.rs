//! Global configuration models for `.batch-step/config.toml`.
//!
//! This module defines the structure of the global configuration file that
//! controls project-wide settings for batch-step.

use serde::Deserialize;
use serde::Serialize;
use ts_rs::TS;

/// Page size used when a batch does not key its pagination on a parameter.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Query argument carrying the page size for batches without their own
/// `page-size-param`.
pub const DEFAULT_PAGE_SIZE_PARAM: &str = "per_page";

/// Name of the query argument that carries the page offset.
pub const DEFAULT_OFFSET_PARAM: &str = "offset";

/// Upper bound on the number of steps a driver loop issues for one run.
pub const DEFAULT_MAX_STEPS: u64 = 10_000;

/// Represents global settings from `.batch-step/config.toml`.
///
/// # Example
///
/// ```toml
/// # .batch-step/config.toml
/// default-page-size = 20
/// page-size-param = "per_page"
/// offset-param = "offset"
/// max-steps = 500
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Page size for batches without a `page-size-param`.
    #[serde(default = "default_page_size")]
    pub default_page_size: i64,

    /// Query argument the page size is written to when a batch has no
    /// `page-size-param` of its own.
    #[serde(default = "default_page_size_param")]
    pub page_size_param: String,

    /// Query argument the computed offset is written to.
    #[serde(default = "default_offset_param")]
    pub offset_param: String,

    /// Safety bound for driver loops.
    #[serde(default = "default_max_steps")]
    pub max_steps: u64,
}

fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

fn default_page_size_param() -> String {
    DEFAULT_PAGE_SIZE_PARAM.to_string()
}

fn default_offset_param() -> String {
    DEFAULT_OFFSET_PARAM.to_string()
}

fn default_max_steps() -> u64 {
    DEFAULT_MAX_STEPS
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_param: default_page_size_param(),
            offset_param: default_offset_param(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

//! Base ResultSource trait and supporting types.

use async_trait::async_trait;
use bs_protocol::batch_models::QueryArgs;
use bs_protocol::item_models::Item;
use std::path::PathBuf;
use thiserror::Error;

/// One page of items together with the total the query observed.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    /// Items of the requested page, in query order.
    pub items: Vec<Item>,

    /// Total number of items matching the query, ignoring pagination.
    pub observed_total: u64,
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read source file at {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse source file at {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
    #[error("Query failed: {0}")]
    Query(String),
}

/// A queryable data set a batch pages through.
///
/// Implementations must be idempotent for a given set of arguments: the step
/// runner fetches twice per step, once to learn the total and once for the
/// corrected page.
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch(&self, args: &QueryArgs) -> Result<FetchedPage, SourceError>;
}

/// Pagination settings shared by the bundled sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    /// Argument holding the zero-based offset.
    pub offset_param: String,

    /// Argument holding the page size, if the batch keys on one.
    pub limit_param: Option<String>,

    /// Page size used when `limit_param` is unset or absent from the query.
    pub default_limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            offset_param: bs_protocol::DEFAULT_OFFSET_PARAM.to_string(),
            limit_param: Some("per_page".to_string()),
            default_limit: bs_protocol::DEFAULT_PAGE_SIZE as usize,
        }
    }
}

impl Pagination {
    /// Apply filtering and pagination to an in-memory item list.
    ///
    /// Every argument other than the offset and limit is treated as an
    /// equality filter on the item's `data` object.
    pub fn apply(&self, items: &[Item], args: &QueryArgs) -> FetchedPage {
        let matching: Vec<&Item> = items
            .iter()
            .filter(|item| self.matches(item, args))
            .collect();

        let offset = args
            .get_i64(&self.offset_param)
            .map_or(0, |o| usize::try_from(o).unwrap_or(0));
        let limit = self
            .limit_param
            .as_deref()
            .and_then(|param| args.get_i64(param))
            .and_then(|l| usize::try_from(l).ok())
            .unwrap_or(self.default_limit);

        FetchedPage {
            observed_total: matching.len() as u64,
            items: matching
                .into_iter()
                .skip(offset)
                .take(limit)
                .cloned()
                .collect(),
        }
    }

    fn matches(&self, item: &Item, args: &QueryArgs) -> bool {
        args.iter()
            .filter(|(key, _)| {
                key.as_str() != self.offset_param
                    && Some(key.as_str()) != self.limit_param.as_deref()
            })
            .all(|(key, expected)| item.data.get(key.as_str()) == Some(expected))
    }
}

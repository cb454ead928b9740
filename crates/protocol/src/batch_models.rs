//! Batch configuration models for `.batch-step/batches/*.yaml`.
//!
//! This module defines the serializable part of a batch definition: its
//! identity, display name and the query arguments every step starts from.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

/// Query parameters passed to a result source.
///
/// Seeded from a batch's default arguments, merged with per-run overrides,
/// and given a freshly computed offset on every step.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct QueryArgs(BTreeMap<String, serde_json::Value>);

impl QueryArgs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of these arguments with `overrides` applied on top.
    pub fn merged(&self, overrides: &QueryArgs) -> QueryArgs {
        let mut merged = self.0.clone();
        for (key, value) in &overrides.0 {
            merged.insert(key.clone(), value.clone());
        }
        QueryArgs(merged)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Read an argument as a signed integer.
    ///
    /// Numeric strings are accepted because form-encoded drivers send
    /// everything as text.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.0.get(key)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Builder-style variant of [`QueryArgs::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set(key, value);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, serde_json::Value)> for QueryArgs {
    fn from_iter<T: IntoIterator<Item = (String, serde_json::Value)>>(iter: T) -> Self {
        QueryArgs(iter.into_iter().collect())
    }
}

/// Immutable per-batch-type configuration.
///
/// # Example
///
/// ```yaml
/// # .batch-step/batches/reindex.yaml
/// process-id: reindex-posts
/// name: Reindex posts
/// default-args:
///   post_type: post
///   per_page: 25
/// page-size-param: per_page
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(rename_all = "kebab-case")]
pub struct BatchConfig {
    /// Unique process identifier the driver addresses this batch by.
    pub process_id: String,

    /// Human-readable name shown in status displays.
    pub name: String,

    /// Query arguments every step starts from.
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub default_args: QueryArgs,

    /// Name of the argument in `default_args` that carries the page size.
    ///
    /// When absent, the global default page size is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub page_size_param: Option<String>,

    /// Page size reported for step accounting regardless of the query
    /// arguments. Used by sources that paginate through their own path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub page_size_override: Option<i64>,
}

impl BatchConfig {
    pub fn new(process_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            name: name.into(),
            default_args: QueryArgs::default(),
            page_size_param: None,
            page_size_override: None,
        }
    }
}

//! Batch registration.
//!
//! The `BatchRegistry` maps process ids to batch definitions. Transports look
//! batches up here instead of dispatching through global hooks.

pub mod definition;
pub mod factory;

pub use definition::{BatchDefinition, BatchDefinitionBuilder, PageSizeHook};
pub use factory::BatchFactory;

use crate::engine::error::{BatchError, BatchResult};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Registry of batch definitions, keyed by process id.
#[derive(Default)]
pub struct BatchRegistry {
    batches: BTreeMap<String, Arc<BatchDefinition>>,
}

impl BatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::DuplicateProcess` if the process id is taken.
    pub fn register(&mut self, definition: BatchDefinition) -> BatchResult<()> {
        let process_id = definition.process_id().to_string();
        if self.batches.contains_key(&process_id) {
            return Err(BatchError::DuplicateProcess(process_id));
        }
        tracing::debug!(process_id = %process_id, "registered batch");
        self.batches.insert(process_id, Arc::new(definition));
        Ok(())
    }

    /// Look up a definition by process id.
    ///
    /// # Errors
    ///
    /// Returns `BatchError::UnknownProcess` if nothing is registered under it.
    pub fn get(&self, process_id: &str) -> BatchResult<Arc<BatchDefinition>> {
        self.batches
            .get(process_id)
            .cloned()
            .ok_or_else(|| BatchError::UnknownProcess(process_id.to_string()))
    }

    /// All definitions, ordered by process id.
    pub fn list(&self) -> Vec<Arc<BatchDefinition>> {
        self.batches.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.batches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }
}

//! Error types for batch registration and step execution.

use crate::sources::base::SourceError;
use crate::store::base::StoreError;
use thiserror::Error;

/// Errors that can occur while registering batches or running steps.
///
/// Per-item callback failures are not errors at this level; they are
/// collected into the step envelope instead.
#[derive(Error, Debug)]
pub enum BatchError {
    /// A batch was registered or configured with invalid settings.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The driver supplied a step number below 1.
    #[error("Invalid step {0}: steps are numbered from 1")]
    InvalidStep(u64),

    /// No batch is registered under the process id.
    #[error("Unknown process: {0}")]
    UnknownProcess(String),

    /// A batch with the same process id is already registered.
    #[error("Process already registered: {0}")]
    DuplicateProcess(String),

    /// A driver loop gave up before the batch finished.
    #[error("Process {process_id} did not finish within {max_steps} steps")]
    StepLimitExceeded { process_id: String, max_steps: u64 },

    /// The result source failed. Not retried.
    #[error("Result source failed: {0}")]
    Source(#[from] SourceError),

    /// The item or run status store failed.
    #[error("Status store failed: {0}")]
    Store(#[from] StoreError),
}

/// Type alias for Result with BatchError.
pub type BatchResult<T> = Result<T, BatchError>;

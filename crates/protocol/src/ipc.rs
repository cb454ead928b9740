//! Driver communication protocol.
//!
//! This module defines the message types exchanged between a driver (a
//! browser client, the CLI, or any other transport) and the engine.
//!
//! The protocol follows an Operation/Event pattern:
//! - `Op`: Requests sent from the driver to the engine
//! - `Event`: Responses sent from the engine to the driver
//!
//! Each `Op` is answered by exactly one `Event`. The engine keeps no state
//! between requests, so a driver must echo the values it was handed.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::run_models::RunStatusRecord;
use crate::step_models::StepResult;

/// Requests sent from a driver to the engine.
///
/// Uses tagged enum serialization for TypeScript compatibility:
/// ```json
/// {
///   "type": "runStep",
///   "payload": {
///     "process_id": "reindex-posts",
///     "current_step": 2,
///     "total_from_request": 25
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
#[ts(export)]
pub enum Op {
    /// Run one step of a batch.
    RunStep {
        process_id: String,
        /// 1-based step number.
        current_step: u64,
        /// `total_num_results` from the previous response, or 0 on step 1.
        #[serde(default)]
        total_from_request: u64,
    },

    /// Clear all per-item status for a batch and mark it as reset.
    Reset { process_id: String },

    /// Read the last persisted run status of a batch.
    GetRunStatus { process_id: String },
}

/// Responses sent from the engine to a driver.
///
/// ```json
/// {
///   "type": "error",
///   "payload": {
///     "process_id": "reindex-posts",
///     "error": "result source failed: connection refused"
///   }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
#[ts(export)]
pub enum Event {
    /// Envelope of a completed step or reset.
    StepResult(StepResult),

    /// Last persisted status, or `None` if the batch never ran.
    RunStatus {
        process_id: String,
        record: Option<RunStatusRecord>,
    },

    /// The request could not be served.
    Error { process_id: String, error: String },
}

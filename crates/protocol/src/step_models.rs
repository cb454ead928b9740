//! Step status and the result envelope.
//!
//! Every step or reset invocation answers the driver with a [`StepResult`].
//! The driver is expected to echo `current_step + 1` and `total_num_results`
//! back on its next call, since the engine keeps no state between calls.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::item_models::Item;

/// Outcome classification of a batch run after a step.
///
/// Normal progression: Running -> ... -> Finished
///
/// Special states:
/// - NoResult: the query returned nothing for the requested page
/// - Failed: a step could not be executed (source, store or input error)
/// - Reset: accounting was cleared by an explicit reset
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// More steps remain.
    Running,

    /// The final step has been processed.
    Finished,

    /// The query returned no items for this step.
    #[serde(rename = "noresult")]
    NoResult,

    /// The step invocation itself failed. Per-item callback failures do not
    /// use this status: they set `success = false` and leave the status as is.
    Failed,

    /// Per-item status was cleared and the run starts over.
    Reset,
}

impl StepStatus {
    /// Whether a driver should stop issuing steps.
    pub fn is_terminal(self) -> bool {
        matches!(self, StepStatus::Finished | StepStatus::NoResult)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Running => "running",
            StepStatus::Finished => "finished",
            StepStatus::NoResult => "noresult",
            StepStatus::Failed => "failed",
            StepStatus::Reset => "reset",
        }
    }
}

impl std::fmt::Display for StepStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-item callback failure reported back to the driver.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ResultError {
    /// Identity of the item whose callback failed.
    pub item_id: String,

    /// Failure message signaled by the callback.
    pub message: String,
}

/// Response envelope for a step or reset invocation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct StepResult {
    /// Process the step was run for.
    pub process_id: String,

    /// Step number the driver should treat as completed.
    ///
    /// This may be one less than the requested step when an apparent final
    /// step turned out not to be final.
    pub current_step: u64,

    /// `ceil(total_num_results / page_size)`.
    pub total_steps: u64,

    /// Whole-number percentage in `0..=100`.
    pub progress: u8,

    pub status: StepStatus,

    /// Highest item count observed so far. Echo this back as
    /// `total_from_request` on the next step.
    pub total_num_results: u64,

    /// Signed drift between the driver-reported and the observed total.
    pub difference_in_result_totals: i64,

    /// The page of items processed by this step.
    pub query_results: Vec<Item>,

    /// Per-item failures collected during this step, in processing order.
    pub result_errors: Vec<ResultError>,

    /// False when at least one per-item callback failed.
    pub success: bool,
}

impl StepResult {
    /// Envelope returned by a reset invocation.
    pub fn reset(process_id: impl Into<String>) -> Self {
        Self {
            process_id: process_id.into(),
            current_step: 0,
            total_steps: 0,
            progress: 0,
            status: StepStatus::Reset,
            total_num_results: 0,
            difference_in_result_totals: 0,
            query_results: Vec::new(),
            result_errors: Vec::new(),
            success: true,
        }
    }
}

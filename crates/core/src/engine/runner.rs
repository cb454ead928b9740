//! The step runner: one step of a batch, end to end.
//!
//! A step is stateless from the engine's point of view. Everything that has
//! to survive between steps (the step number and the running total) comes
//! back from the driver with every request.

use crate::engine::error::{BatchError, BatchResult};
use crate::engine::offset::compute_offset;
use crate::engine::processor::process_results;
use crate::engine::reconcile::reconcile;
use crate::registry::definition::BatchDefinition;
use crate::store::base::ItemStatusStore;
use bs_protocol::batch_models::QueryArgs;
use bs_protocol::config_models::GlobalConfig;
use bs_protocol::item_models::Item;
use bs_protocol::step_models::{ResultError, StepResult, StepStatus};
use tracing::{debug, info, warn};

/// Driver-supplied input for one step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepRequest {
    /// 1-based step number.
    pub current_step: u64,

    /// `total_num_results` echoed from the previous step, 0 on the first.
    pub total_from_request: u64,

    /// Per-run query argument overrides applied over the batch defaults.
    pub overrides: QueryArgs,
}

impl StepRequest {
    pub fn new(current_step: u64, total_from_request: u64) -> Self {
        Self {
            current_step,
            total_from_request,
            overrides: QueryArgs::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: QueryArgs) -> Self {
        self.overrides = overrides;
        self
    }
}

/// Mutable bookkeeping of a single step invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct StepState {
    pub current_step: u64,
    pub query_args: QueryArgs,
    pub total_num_results: u64,
    pub difference_in_result_totals: i64,
    pub status: StepStatus,
    pub result_errors: Vec<ResultError>,
}

impl StepState {
    fn into_result(self, process_id: &str, total_steps: u64, query_results: Vec<Item>) -> StepResult {
        let progress = match self.status {
            StepStatus::NoResult => 100,
            _ => compute_progress(self.current_step, total_steps),
        };
        StepResult {
            process_id: process_id.to_string(),
            current_step: self.current_step,
            total_steps,
            progress,
            status: self.status,
            total_num_results: self.total_num_results,
            difference_in_result_totals: self.difference_in_result_totals,
            query_results,
            success: self.result_errors.is_empty(),
            result_errors: self.result_errors,
        }
    }
}

/// `ceil(total_num_results / page_size)`.
pub fn compute_total_steps(total_num_results: u64, page_size: i64) -> u64 {
    let page_size = u64::try_from(page_size).unwrap_or(0).max(1);
    total_num_results.div_ceil(page_size)
}

/// Whole-number percentage of `current_step` over `total_steps`.
///
/// A run with no steps at all counts as complete.
pub fn compute_progress(current_step: u64, total_steps: u64) -> u8 {
    if total_steps == 0 {
        return 100;
    }
    let percent = (current_step as f64 / total_steps as f64 * 100.0).round();
    percent.clamp(0.0, 100.0) as u8
}

/// Decide whether the step that was just processed finished the run.
///
/// Only the step whose number equals `total_steps` can finish a run. It does
/// so when the remaining count (`total_num_results - drift`) fits in one page
/// or when no drift was recorded. Otherwise items appeared after the totals
/// were fixed; the step number is taken back by one so the driver repeats
/// the same index under the corrected accounting.
///
/// Returns the step number to report and the resulting status.
pub fn classify_step(
    current_step: u64,
    total_steps: u64,
    total_num_results: u64,
    drift: i64,
    page_size: i64,
) -> (u64, StepStatus) {
    if current_step != total_steps {
        return (current_step, StepStatus::Running);
    }

    let total = i64::try_from(total_num_results).unwrap_or(i64::MAX);
    let remaining = total.saturating_sub(drift);
    if remaining <= page_size || remaining == total {
        (current_step, StepStatus::Finished)
    } else {
        (current_step.saturating_sub(1), StepStatus::Running)
    }
}

/// Runs one step of one batch.
pub struct StepRunner<'a> {
    definition: &'a BatchDefinition,
    item_store: &'a dyn ItemStatusStore,
    global: &'a GlobalConfig,
}

impl<'a> StepRunner<'a> {
    pub fn new(
        definition: &'a BatchDefinition,
        item_store: &'a dyn ItemStatusStore,
        global: &'a GlobalConfig,
    ) -> Self {
        Self {
            definition,
            item_store,
            global,
        }
    }

    /// Execute one step.
    ///
    /// The source is queried twice: first to learn the current total, then,
    /// after reconciling that total with the driver's and correcting the
    /// offset, for the page that is actually processed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `current_step` is 0
    /// - The page size resolves to a non-positive value
    /// - The result source or the status store fails
    ///
    /// Per-item callback failures are reported in the envelope, not here.
    pub async fn run(&self, request: &StepRequest) -> BatchResult<StepResult> {
        let step = request.current_step;
        if step == 0 {
            return Err(BatchError::InvalidStep(step));
        }
        let process_id = self.definition.process_id();
        let offset_param = self.global.offset_param.as_str();
        let source = self.definition.source();

        let mut query_args = self.definition.default_args().merged(&request.overrides);
        let query_page_size = self.definition.query_page_size(&query_args, self.global)?;
        let base_offset = query_args.get_i64(offset_param).unwrap_or(0);

        // The source pages by what it is told, never by its own fallback
        let page_size_param = self.definition.page_size_param(&self.global.page_size_param);
        query_args.set(page_size_param, query_page_size);

        // Count what the query observes right now
        query_args.set(offset_param, compute_offset(base_offset, step, query_page_size, 0)?);
        let counted = source.fetch(&query_args).await?;

        let reconciliation = reconcile(request.total_from_request, counted.observed_total);
        debug!(
            process_id,
            step,
            total_from_request = request.total_from_request,
            total_from_query = counted.observed_total,
            drift = reconciliation.drift,
            "reconciled totals"
        );

        let offset = compute_offset(base_offset, step, query_page_size, reconciliation.drift)?;
        query_args.set(offset_param, offset);
        let results = source.fetch(&query_args).await?.items;

        let mut state = StepState {
            current_step: step,
            query_args,
            total_num_results: reconciliation.total_num_results,
            difference_in_result_totals: reconciliation.drift,
            status: StepStatus::Running,
            result_errors: Vec::new(),
        };

        if results.is_empty() {
            info!(process_id, step, offset, "no results for step");
            // An empty page is never an error, even if the override hook is
            let accounting_size = match self.definition.effective_page_size(query_page_size) {
                Ok(page_size) => page_size,
                Err(e) => {
                    warn!(process_id, error = %e, "ignoring page size override on empty step");
                    query_page_size
                }
            };
            let total_steps = compute_total_steps(state.total_num_results, accounting_size);
            state.status = StepStatus::NoResult;
            return Ok(state.into_result(process_id, total_steps, results));
        }

        let page_size = self.definition.effective_page_size(query_page_size)?;
        let total_steps = compute_total_steps(state.total_num_results, page_size);

        let outcome = process_results(
            process_id,
            &results,
            self.definition.callback(),
            self.item_store,
        )
        .await?;
        state.result_errors = outcome.errors;

        let (reported_step, status) = classify_step(
            step,
            total_steps,
            state.total_num_results,
            state.difference_in_result_totals,
            page_size,
        );
        if status == StepStatus::Running && step == total_steps {
            warn!(
                process_id,
                step,
                total_steps,
                drift = state.difference_in_result_totals,
                "apparent final step is not final, repeating step index"
            );
        }
        state.current_step = reported_step;
        state.status = status;

        let result = state.into_result(process_id, total_steps, results);
        info!(
            process_id,
            step = result.current_step,
            total_steps,
            progress = result.progress,
            status = %result.status,
            processed = outcome.processed,
            skipped = outcome.skipped,
            errors = result.result_errors.len(),
            "step complete"
        );
        Ok(result)
    }
}

//! In-process driver loop.
//!
//! Issues steps the way a remote client would: starting at step 1 with no
//! known total, then echoing back what each response reports.

use crate::engine::error::{BatchError, BatchResult};
use crate::engine::runner::StepRequest;
use crate::state::manager::BatchManager;
use bs_protocol::batch_models::QueryArgs;
use bs_protocol::step_models::StepResult;
use tracing::debug;

/// Run a batch until it reports `finished` or `noresult`.
///
/// `on_step` is called with every envelope, including the last one.
///
/// # Errors
///
/// Returns the first step error, or `BatchError::StepLimitExceeded` if the
/// batch has not finished after `max_steps` invocations.
pub async fn drive<F>(
    manager: &BatchManager,
    process_id: &str,
    max_steps: u64,
    on_step: F,
) -> BatchResult<StepResult>
where
    F: FnMut(&StepResult),
{
    drive_with(manager, process_id, &QueryArgs::default(), max_steps, on_step).await
}

/// Like [`drive`], with the same query overrides sent on every step.
pub async fn drive_with<F>(
    manager: &BatchManager,
    process_id: &str,
    overrides: &QueryArgs,
    max_steps: u64,
    mut on_step: F,
) -> BatchResult<StepResult>
where
    F: FnMut(&StepResult),
{
    let mut current_step = 1;
    let mut total_from_request = 0;

    for _ in 0..max_steps {
        let request = StepRequest::new(current_step, total_from_request)
            .with_overrides(overrides.clone());
        let result = manager.run_step_with(process_id, request).await?;
        on_step(&result);

        if result.status.is_terminal() {
            return Ok(result);
        }

        total_from_request = result.total_num_results;
        current_step = result.current_step + 1;
        debug!(process_id, current_step, total_from_request, "advancing");
    }

    Err(BatchError::StepLimitExceeded {
        process_id: process_id.to_string(),
        max_steps,
    })
}

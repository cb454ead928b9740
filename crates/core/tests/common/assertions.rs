//! Custom assertion helpers for integration tests.

use bs_protocol::step_models::{StepResult, StepStatus};

/// Assert the accounting fields of an envelope in one go.
#[allow(dead_code)]
pub fn assert_step(
    result: &StepResult,
    current_step: u64,
    total_steps: u64,
    progress: u8,
    status: StepStatus,
) {
    assert_eq!(
        (result.current_step, result.total_steps, result.progress, result.status),
        (current_step, total_steps, progress, status),
        "unexpected accounting in {result:?}"
    );
}

/// Ids of the items in an envelope, in order.
#[allow(dead_code)]
pub fn result_ids(result: &StepResult) -> Vec<String> {
    result.query_results.iter().map(|i| i.id.clone()).collect()
}

/// Assert that `calls` names every item `prefix1..=prefixN` exactly once.
#[allow(dead_code)]
pub fn assert_each_item_once(calls: &[String], prefix: &str, count: u32) {
    let mut seen = calls.to_vec();
    seen.sort();
    let mut expected: Vec<String> = (1..=count).map(|i| format!("{prefix}{i}")).collect();
    expected.sort();
    assert_eq!(seen, expected, "items processed out of line: {calls:?}");
}

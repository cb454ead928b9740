//! Page offset calculation.

use crate::engine::error::{BatchError, BatchResult};

/// Compute the offset of the page for `step`.
///
/// Step 1 always starts at `base_offset`. Later steps start at
/// `(step - 1) * page_size - drift`, where `drift` is the signed difference
/// between the driver-reported and the freshly observed total. Subtracting it
/// keeps pages aligned when items disappear from (positive drift) or appear
/// at the front of (negative drift) the result set between steps.
///
/// Offsets that would fall below zero are clamped to zero.
///
/// # Errors
///
/// - `BatchError::InvalidStep` if `step` is 0
/// - `BatchError::InvalidConfiguration` if `page_size` is not positive
pub fn compute_offset(base_offset: i64, step: u64, page_size: i64, drift: i64) -> BatchResult<u64> {
    if step == 0 {
        return Err(BatchError::InvalidStep(step));
    }
    if page_size <= 0 {
        return Err(BatchError::InvalidConfiguration(format!(
            "page size must be a positive integer, got {page_size}"
        )));
    }

    let offset = if step == 1 {
        base_offset
    } else {
        let prior_steps = i64::try_from(step - 1).unwrap_or(i64::MAX);
        prior_steps.saturating_mul(page_size).saturating_sub(drift)
    };

    if offset < 0 {
        tracing::debug!(offset, step, drift, "clamping negative offset to zero");
    }
    Ok(u64::try_from(offset).unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_step_uses_base_offset_regardless_of_drift() {
        for drift in [-20, -1, 0, 1, 20] {
            assert_eq!(compute_offset(0, 1, 10, drift).unwrap(), 0);
            assert_eq!(compute_offset(5, 1, 10, drift).unwrap(), 5);
        }
    }

    #[test]
    fn test_later_steps_without_drift() {
        for step in 2..=6u64 {
            let expected = (step - 1) * 25;
            assert_eq!(compute_offset(0, step, 25, 0).unwrap(), expected);
            // The base offset only applies to the first step
            assert_eq!(compute_offset(3, step, 25, 0).unwrap(), expected);
        }
    }

    #[test]
    fn test_positive_drift_moves_offset_back() {
        // 10 items were removed since the driver's count
        assert_eq!(compute_offset(0, 2, 10, 10).unwrap(), 0);
        assert_eq!(compute_offset(0, 3, 10, 10).unwrap(), 10);
    }

    #[test]
    fn test_negative_drift_moves_offset_forward() {
        // 5 items appeared at the front since the driver's count
        assert_eq!(compute_offset(0, 2, 10, -5).unwrap(), 15);
    }

    #[test]
    fn test_offset_is_clamped_at_zero() {
        assert_eq!(compute_offset(0, 2, 10, 25).unwrap(), 0);
        assert_eq!(compute_offset(-3, 1, 10, 0).unwrap(), 0);
    }

    #[test]
    fn test_invalid_inputs() {
        assert!(matches!(compute_offset(0, 0, 10, 0), Err(BatchError::InvalidStep(0))));
        assert!(matches!(
            compute_offset(0, 2, 0, 0),
            Err(BatchError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            compute_offset(0, 1, -1, 0),
            Err(BatchError::InvalidConfiguration(_))
        ));
    }
}

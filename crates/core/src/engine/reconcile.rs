//! Total reconciliation between driver-reported and observed counts.

/// Result of reconciling the two totals of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    /// High-water mark of the item count: the larger of the two totals.
    pub total_num_results: u64,

    /// `total_from_request - total_from_query` when the driver supplied a
    /// non-zero total that disagrees with the query, otherwise 0.
    pub drift: i64,
}

/// Merge the total the driver carried forward with the total the query sees
/// now.
///
/// The query total is ground truth for the current data set; the request
/// total is the running tally across the whole run, including whatever the
/// batch itself removed or added. Taking the maximum never under-counts the
/// steps, and the recorded drift lets the offset calculator compensate.
pub fn reconcile(total_from_request: u64, total_from_query: u64) -> Reconciliation {
    let drift = if total_from_request > 0 && total_from_request != total_from_query {
        signed(total_from_request).saturating_sub(signed(total_from_query))
    } else {
        0
    };

    Reconciliation {
        total_num_results: total_from_request.max(total_from_query),
        drift,
    }
}

fn signed(total: u64) -> i64 {
    i64::try_from(total).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_totals_have_no_drift() {
        for total in [0, 1, 25, 10_000] {
            assert_eq!(
                reconcile(total, total),
                Reconciliation {
                    total_num_results: total,
                    drift: 0
                }
            );
        }
    }

    #[test]
    fn test_zero_request_total_never_drifts() {
        for query in [0, 3, 25] {
            assert_eq!(
                reconcile(0, query),
                Reconciliation {
                    total_num_results: query,
                    drift: 0
                }
            );
        }
    }

    #[test]
    fn test_items_removed() {
        let r = reconcile(25, 15);
        assert_eq!(r.total_num_results, 25);
        assert_eq!(r.drift, 10);
    }

    #[test]
    fn test_items_added() {
        let r = reconcile(20, 25);
        assert_eq!(r.total_num_results, 25);
        assert_eq!(r.drift, -5);
    }
}

//! Batch step engine.
//!
//! The engine drives a large result set through discrete steps, one page per
//! step, while tracking drift in the total item count caused by items being
//! added or removed between steps.
//!
//! - [`offset`]: page offset for a step, corrected for drift
//! - [`reconcile`]: merging driver-reported and observed totals
//! - [`processor`]: applying the per-item callback to a page
//! - [`runner`]: the step state machine tying it all together

pub mod error;
pub mod offset;
pub mod processor;
pub mod reconcile;
pub mod runner;

pub use error::{BatchError, BatchResult};
pub use offset::compute_offset;
pub use processor::{process_results, ProcessOutcome};
pub use reconcile::{reconcile, Reconciliation};
pub use runner::{StepRequest, StepRunner, StepState};

//! Persisted run status.
//!
//! One record is kept per process id and overwritten at the end of every
//! step and on reset, so status displays can show where a batch stands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::step_models::StepStatus;

/// Last known status of a batch run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct RunStatusRecord {
    pub status: StepStatus,

    /// When the record was written.
    pub timestamp: DateTime<Utc>,

    /// Human-readable messages, one per per-item failure or step error.
    #[serde(default)]
    pub messages: Vec<String>,
}

impl RunStatusRecord {
    /// Create a record stamped with the current time.
    pub fn now(status: StepStatus, messages: Vec<String>) -> Self {
        Self {
            status,
            timestamp: Utc::now(),
            messages,
        }
    }
}

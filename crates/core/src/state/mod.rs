//! Batch run management.
//!
//! This module provides:
//! - `BatchManager`, the transport-facing entry point for steps and resets
//! - A driver loop that runs a batch to completion in-process

pub mod driver;
pub mod manager;

//! Per-item callbacks.
//!
//! A callback is applied to every item a step fetches. Failures are reported
//! per item and never abort the batch.

pub mod base;
pub mod command_callback;

pub use base::{CallbackError, FnCallback, ItemCallback};
pub use command_callback::CommandCallback;

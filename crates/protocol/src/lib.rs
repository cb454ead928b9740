//! # bs-protocol
//!
//! Core protocol definitions and data models for batch-step.
//!
//! This crate defines all shared data structures used for:
//! - Batch configuration (global TOML settings, per-batch YAML definitions)
//! - The step result envelope returned to drivers
//! - Persisted run and item status records
//! - Request/response messages between a driver and the engine
//!
//! ## Modules
//!
//! - [`batch_models`]: Batch configuration and query arguments
//! - [`config_models`]: Global configuration from config.toml
//! - [`item_models`]: Result items and per-item status
//! - [`run_models`]: Persisted run status records
//! - [`step_models`]: Step status and the result envelope
//! - [`ipc`]: Operations and Events for driver-engine communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, and chrono
//! - TypeScript generation: All wire types derive `TS` for browser drivers;
//!   `Op` and `Event` (with everything they reference) are exported to
//!   `bindings/` when the crate's tests run
//! - Independent compilation: No dependencies on other batch-step crates

pub mod batch_models;
pub mod config_models;
pub mod ipc;
pub mod item_models;
pub mod run_models;
pub mod step_models;

// Re-export all public types for convenience
pub use batch_models::*;
pub use config_models::*;
pub use ipc::*;
pub use item_models::*;
pub use run_models::*;
pub use step_models::*;

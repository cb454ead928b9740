//! # bs-core
//!
//! Core batch-step engine and batch management.
//!
//! This crate provides:
//! - The step engine: offset calculation, total reconciliation, per-item
//!   processing and the step state machine
//! - Collaborator traits for result sources, item callbacks and status stores,
//!   with in-memory and file-backed implementations
//! - A batch registry and the `BatchManager` transports talk to
//! - Configuration loading from `.batch-step/` directory
//!
//! ## Modules
//!
//! - [`callbacks`]: Per-item callback trait and implementations
//! - [`config`]: Configuration loading and management
//! - [`engine`]: Offset, reconciliation, processing and the step runner
//! - [`registry`]: Batch definitions and their registry
//! - [`sources`]: Result source trait and implementations
//! - [`state`]: Batch manager and driver loop
//! - [`store`]: Item and run status stores

pub mod callbacks;
pub mod config;
pub mod engine;
pub mod registry;
pub mod sources;
pub mod state;
pub mod store;

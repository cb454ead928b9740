//! Item and run status persistence.
//!
//! This module provides:
//! - The `ItemStatusStore` and `RunStatusStore` traits
//! - `MemoryStatusStore` for embedding and tests
//! - `FileStatusStore` for JSON files on disk

pub mod base;
pub mod file_store;
pub mod memory_store;

pub use base::{ItemStatusStore, RunStatusStore, StoreError};
pub use file_store::FileStatusStore;
pub use memory_store::MemoryStatusStore;

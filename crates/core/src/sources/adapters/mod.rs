//! Result source implementations.
//!
//! This module contains the sources bundled with batch-step:
//! - `MemorySource`: a shared, mutable in-memory list
//! - `JsonFileSource`: a JSON array re-read from disk on every fetch

pub mod json_file_source;
pub mod memory_source;

pub use json_file_source::JsonFileSource;
pub use memory_source::MemorySource;

//! Result sources.
//!
//! This module provides the `ResultSource` trait (Adapter Pattern) and
//! concrete sources a batch type can page through.

pub mod adapters;
pub mod base;

pub use adapters::{JsonFileSource, MemorySource};
pub use base::{FetchedPage, ResultSource, SourceError};

//! Project configuration: global settings and batch files.

pub mod error;
pub mod loader;
pub mod models;

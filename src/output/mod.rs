//! Output writers for decoded traces.
//!
//! This module handles writing data to disk:
//! - JSON trace documents
//! - JSON dumps of SDF header records

pub mod json;

// Re-export main functions
pub use json::{read_traces, write_header, write_traces, TraceDocument};

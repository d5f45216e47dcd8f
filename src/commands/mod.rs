//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the various library components to perform user tasks.

pub mod decode;

// Re-export main command functions
pub use decode::{execute_decode, summarize, validate_args, DecodeArgs, SourceKind};

//! Unified trace representation and assembly.
//!
//! This module handles:
//! - The metadata/vector shape shared by the SDF and ASCII readers
//! - Validating length invariants
//! - Building immutable `Trace` values

pub mod assembler;
pub mod model;

// Re-export main types
pub use assembler::{assemble, validate};
pub use model::{AmplitudeConversion, ByteOrder, HeaderMetadata, Trace, TraceVectors, XAxis};

//! SDF (Standard Data Format) binary decoding.
//!
//! This module handles:
//! - Bounds-checked record access
//! - Decoding the revision-2 header records
//! - Locating and converting sample payloads

pub mod header;
pub mod payload;
pub mod reader;
pub mod records;

// Re-export main types
pub use header::{correction_factor, decode_header, SdfLayout, TraceLayout};
pub use payload::{read_payload, RawPayloadLocation};
pub use records::{
    ChannelHeader, DataHeader, FileHeader, MeasurementHeader, ScanStruct, SdfHeader, SdfUnit,
    SdfWindow, VectorHeader,
};

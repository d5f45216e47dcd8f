//! DSA Trace
//!
//! Decoders for dynamic signal analyzer measurements stored either as
//! binary SDF (Standard Data Format) files or as DSA ASCII exports.
//! Both front-ends produce the same `Trace` values, so a measurement read
//! from either form compares equal.
//!
//! This crate provides the core implementation for the
//! `dsa-trace` CLI tool.
//!
//! ## Getting Started
//!
//! ```ignore
//! let traces = dsa_trace::read_sdf_file("MEAS.DAT")?;
//! let trace = dsa_trace::read_ascii_files("MEAS")?;
//! ```

pub mod ascii;
pub mod codes;
pub mod commands;
pub mod output;
pub mod sdf;
pub mod trace;
pub mod utils;

pub use trace::Trace;
pub use utils::error::{DecodeError, OutputError};

use log::info;
use std::path::Path;

/// Decode every trace of an SDF file held in memory
///
/// **Public** - main library entry point for binary input
///
/// # Errors
/// The first `DecodeError` met; no partial trace list is returned.
pub fn decode_sdf(buf: &[u8]) -> Result<Vec<Trace>, DecodeError> {
    decode_sdf_with_header(buf).map(|(_, traces)| traces)
}

/// Decode an SDF file, also returning its header records
pub fn decode_sdf_with_header(buf: &[u8]) -> Result<(sdf::SdfHeader, Vec<Trace>), DecodeError> {
    let layout = sdf::decode_header(buf)?;

    let traces = layout
        .traces
        .into_iter()
        .map(|trace_layout| {
            let vectors = sdf::read_payload(buf, &trace_layout)?;
            trace::assemble(trace_layout.metadata, vectors)
        })
        .collect::<Result<Vec<_>, _>>()?;

    info!("Decoded {} traces from SDF input", traces.len());
    Ok((layout.header, traces))
}

/// Read and decode an SDF file from disk
///
/// # Errors
/// * `DecodeError::Io` - the file cannot be read
/// * any error of `decode_sdf`
pub fn read_sdf_file(path: impl AsRef<Path>) -> Result<Vec<Trace>, DecodeError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    decode_sdf(&bytes)
}

/// Read and decode the ASCII export `<base>.HDR` / `.TXT` / `.X` (/ `.Z`)
///
/// **Public** - main library entry point for ASCII input
///
/// # Errors
/// * `DecodeError::Io` - a required file cannot be read
/// * any error of `ascii::decode_ascii` or `trace::assemble`
pub fn read_ascii_files(base: impl AsRef<Path>) -> Result<Trace, DecodeError> {
    let sources = ascii::AsciiSources::read(base.as_ref())?;
    let (metadata, vectors) = ascii::decode_ascii(&sources)?;
    trace::assemble(metadata, vectors)
}

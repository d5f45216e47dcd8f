//! JSON trace output writer.
//!
//! Writes decoded traces (and optionally the raw SDF header) to JSON files
//! with pretty formatting, and reads exported documents back.

use crate::sdf::SdfHeader;
use crate::trace::{validate, Trace};
use crate::utils::config::SCHEMA_VERSION;
use crate::utils::error::OutputError;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Exported set of traces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceDocument {
    /// Output schema version
    pub version: String,
    /// File (or ASCII base name) the traces came from
    pub source: String,
    /// RFC 3339 export timestamp
    pub generated_at: String,
    pub traces: Vec<Trace>,
}

impl TraceDocument {
    /// Wrap traces with the current schema version and timestamp
    pub fn new(source: impl Into<String>, traces: Vec<Trace>) -> Self {
        Self {
            version: SCHEMA_VERSION.to_string(),
            source: source.into(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            traces,
        }
    }
}

/// Write a trace document to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `document` - Traces to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_traces(document: &TraceDocument, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!(
        "Writing {} traces to: {}",
        document.traces.len(),
        output_path.display()
    );
    write_json(document, output_path)
}

/// Write the decoded SDF header records to a JSON file
///
/// **Public** - header dump for inspecting a file's records
pub fn write_header(header: &SdfHeader, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing SDF header to: {}", output_path.display());
    write_json(header, output_path)
}

/// Serialize any value as pretty JSON
///
/// **Private** - shared by the public writers
fn write_json<T: Serialize>(value: &T, output_path: &Path) -> Result<(), OutputError> {
    validate_output_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, value).map_err(OutputError::SerializationFailed)?;

    info!(
        "Written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Validate that output path is writable
///
/// **Private** - internal validation
fn validate_output_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    // Check if we're trying to overwrite a directory
    if path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read a trace document from a JSON file
///
/// **Public** - used by the `validate` command and tests
///
/// Every trace is re-checked against the length invariants, so a hand-edited
/// document cannot smuggle in a mismatched trace.
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
/// * `OutputError::InvalidDocument` - a trace breaks the length invariants
pub fn read_traces(input_path: impl AsRef<Path>) -> Result<TraceDocument, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading traces from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let document: TraceDocument =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    for trace in &document.traces {
        validate(trace)?;
    }

    debug!(
        "Document loaded: version {}, {} traces from {}",
        document.version,
        document.traces.len(),
        document.source
    );

    Ok(document)
}

//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use crate::codes::CodeCategory;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while decoding SDF or DSA ASCII sources
///
/// Every decode path stops at the first error; no partial traces are returned.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Preamble, revision or record structure does not match the known layout
    #[error("Malformed header: {0}")]
    MalformedHeader(String),

    /// A declared offset or length points past the end of the input
    #[error("Truncated input: {what} needs bytes {offset}..{end}, only {available} available")]
    TruncatedInput {
        what: String,
        offset: usize,
        end: usize,
        available: usize,
    },

    /// Enumeration code (or ASCII label) absent from the code tables
    #[error("Unknown {category} code: {value}")]
    UnknownCode {
        category: CodeCategory,
        value: String,
    },

    /// Element width / numeric encoding combination that cannot be decoded
    #[error("Payload decode failed: {0}")]
    PayloadDecode(String),

    /// Non-numeric token in an ASCII data file
    #[error("Malformed data in {file} at line {line}: '{token}' is not a number")]
    MalformedData {
        file: String,
        line: usize,
        token: String,
    },

    /// Vector lengths disagree with each other or with the declared counts
    #[error("Inconsistent length: {0}")]
    InconsistentLength(String),

    /// Reading a source file failed
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DecodeError {
    /// Shorthand used by the byte readers when a field runs off the buffer
    pub(crate) fn truncated(what: impl Into<String>, offset: usize, len: usize, available: usize) -> Self {
        DecodeError::TruncatedInput {
            what: what.into(),
            offset,
            end: offset.saturating_add(len),
            available,
        }
    }
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),

    #[error("Invalid trace document: {0}")]
    InvalidDocument(#[from] DecodeError),
}

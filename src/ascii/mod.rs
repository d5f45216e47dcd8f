//! DSA ASCII export decoding.
//!
//! This module handles:
//! - The `.HDR` key/value header
//! - The `.TXT` (dependent), `.X` (independent) and optional `.Z` (waterfall)
//!   data files
//! - Cross-checking their lengths before anything is returned

pub mod data;
pub mod header;

pub use data::parse_values;
pub use header::{parse_header, AsciiHeader};

use crate::trace::{HeaderMetadata, TraceVectors, XAxis};
use crate::utils::config::{ASCII_HEADER_EXT, ASCII_X_EXT, ASCII_Y_EXT, ASCII_Z_EXT};
use crate::utils::error::DecodeError;
use log::{debug, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Text contents of one ASCII export
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AsciiSources {
    /// Base name used in error messages
    pub name: String,
    pub header: String,
    pub y_values: String,
    pub x_values: String,
    pub z_values: Option<String>,
}

impl AsciiSources {
    /// Read `<base>.HDR`, `<base>.TXT`, `<base>.X` and, if present, `<base>.Z`
    ///
    /// # Errors
    /// * `DecodeError::Io` - a required file cannot be read
    pub fn read(base: &Path) -> Result<Self, DecodeError> {
        let z_path = companion_path(base, ASCII_Z_EXT);
        let z_values = match fs::read_to_string(&z_path) {
            Ok(text) => Some(text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(source) => return Err(DecodeError::Io { path: z_path, source }),
        };

        Ok(Self {
            name: base.display().to_string(),
            header: read_companion(base, ASCII_HEADER_EXT)?,
            y_values: read_companion(base, ASCII_Y_EXT)?,
            x_values: read_companion(base, ASCII_X_EXT)?,
            z_values,
        })
    }

    fn file_name(&self, ext: &str) -> String {
        format!("{}.{}", self.name, ext)
    }
}

/// `<base>.<ext>`, keeping any dots already in the base name
pub fn companion_path(base: &Path, ext: &str) -> PathBuf {
    let mut path = base.as_os_str().to_owned();
    path.push(".");
    path.push(ext);
    PathBuf::from(path)
}

fn read_companion(base: &Path, ext: &str) -> Result<String, DecodeError> {
    let path = companion_path(base, ext);
    fs::read_to_string(&path).map_err(|source| DecodeError::Io { path, source })
}

/// Decode an ASCII export into metadata and physical vectors
///
/// **Public** - main entry point for the ASCII front-end
///
/// Scale and offset from the header are applied to the dependent vector
/// (`.TXT`, or `.Z` for waterfalls).
///
/// # Errors
/// * `DecodeError::MalformedHeader` / `UnknownCode` - header problems
/// * `DecodeError::MalformedData` - non-numeric token in a data file
/// * `DecodeError::InconsistentLength` - file lengths disagree with each
///   other or with the declared counts
pub fn decode_ascii(sources: &AsciiSources) -> Result<(HeaderMetadata, TraceVectors), DecodeError> {
    let header = parse_header(&sources.header)?;

    let y = parse_values(&sources.y_values, &sources.file_name(ASCII_Y_EXT))?;
    let x = parse_values(&sources.x_values, &sources.file_name(ASCII_X_EXT))?;
    let z = sources
        .z_values
        .as_deref()
        .map(|text| parse_values(text, &sources.file_name(ASCII_Z_EXT)))
        .transpose()?;

    let num_points = header.num_points.unwrap_or(x.len());
    check_count(&sources.file_name(ASCII_X_EXT), x.len(), num_points)?;
    check_x_start(&header, &x);

    let scan_count = match &z {
        Some(z) => {
            let num_scans = header.num_scans.unwrap_or(y.len());
            check_count(&sources.file_name(ASCII_Y_EXT), y.len(), num_scans)?;
            check_count(&sources.file_name(ASCII_Z_EXT), z.len(), num_points * num_scans)?;
            num_scans
        }
        None => {
            if let Some(scans) = header.num_scans.filter(|n| *n > 1) {
                return Err(DecodeError::InconsistentLength(format!(
                    "header declares {} scans but {} is missing",
                    scans,
                    sources.file_name(ASCII_Z_EXT)
                )));
            }
            check_count(&sources.file_name(ASCII_Y_EXT), y.len(), num_points)?;
            1
        }
    };

    let mut meta = HeaderMetadata::new(header.domain, header.domain_label);
    meta.title = header.title;
    meta.data_type = header.data_type;
    meta.application = header.application;
    meta.x_unit = header.x_unit;
    meta.y_unit = header.y_unit;
    meta.z_unit = header.z_unit;
    meta.scale = header.scale;
    meta.offset = header.offset;
    meta.x_count = num_points;
    meta.scan_count = scan_count;
    meta.x_axis = XAxis::Explicit;
    meta.byte_order = None;
    meta.channels = header.channels;

    let vectors = match z {
        Some(z) => TraceVectors {
            x,
            y,
            z: Some(z.into_iter().map(|v| meta.to_physical(v)).collect()),
            imag: None,
        },
        None => TraceVectors {
            x,
            y: y.into_iter().map(|v| meta.to_physical(v)).collect(),
            z: None,
            imag: None,
        },
    };

    info!(
        "Decoded ASCII export '{}': {} points, {} scans",
        sources.name, num_points, scan_count
    );
    Ok((meta, vectors))
}

fn check_count(file: &str, found: usize, expected: usize) -> Result<(), DecodeError> {
    if found != expected {
        return Err(DecodeError::InconsistentLength(format!(
            "{} has {} values, expected {}",
            file, found, expected
        )));
    }
    debug!("{}: {} values", file, found);
    Ok(())
}

// xstart/xincrement are informational; disagreement is only reported
fn check_x_start(header: &AsciiHeader, x: &[f64]) {
    if let (Some(start), Some(first)) = (header.x_start, x.first()) {
        let tolerance = header.x_increment.map_or(1e-9, |inc| inc.abs() * 1e-6).max(1e-9);
        if (start - first).abs() > tolerance {
            warn!("Header x start {} differs from first x value {}", start, first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sources(header: &str, y: &str, x: &str, z: Option<&str>) -> AsciiSources {
        AsciiSources {
            name: "meas".to_string(),
            header: header.to_string(),
            y_values: y.to_string(),
            x_values: x.to_string(),
            z_values: z.map(String::from),
        }
    }

    #[test]
    fn test_decode_plain_trace_with_scale() {
        let src = sources(
            "domain: 1\nscale: 0.5\noffset: 1.0\n",
            "0\n1\n2\n3\n",
            "0\n0.1\n0.2\n0.3\n",
            None,
        );
        let (meta, vectors) = decode_ascii(&src).unwrap();
        assert_eq!(meta.x_count, 4);
        assert_eq!(vectors.y, vec![1.0, 1.5, 2.0, 2.5]);
        assert_eq!(vectors.x, vec![0.0, 0.1, 0.2, 0.3]);
    }

    #[test]
    fn test_one_fewer_y_line() {
        let src = sources("domain: 0\n", "1\n2\n", "0\n1\n2\n", None);
        let err = decode_ascii(&src).unwrap_err();
        assert!(matches!(err, DecodeError::InconsistentLength(_)));
    }

    #[test]
    fn test_declared_points_disagree() {
        let src = sources("domain: 0\nnumpoints: 4\n", "1\n2\n3\n", "0\n1\n2\n", None);
        let err = decode_ascii(&src).unwrap_err();
        assert!(matches!(err, DecodeError::InconsistentLength(_)));
    }

    #[test]
    fn test_waterfall() {
        let src = sources(
            "domain: 0\nnumscans: 2\nzunit: V\n",
            "10\n20\n",
            "1\n2\n3\n",
            Some("1 2 3\n4 5 6\n"),
        );
        let (meta, vectors) = decode_ascii(&src).unwrap();
        assert_eq!(meta.scan_count, 2);
        assert_eq!(meta.z_unit.as_deref(), Some("V"));
        assert_eq!(vectors.y, vec![10.0, 20.0]);
        assert_eq!(vectors.z, Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]));
    }

    #[test]
    fn test_waterfall_short_grid() {
        let src = sources("domain: 0\n", "10\n20\n", "1\n2\n3\n", Some("1 2 3\n4 5\n"));
        let err = decode_ascii(&src).unwrap_err();
        assert!(matches!(err, DecodeError::InconsistentLength(_)));
    }

    #[test]
    fn test_scans_without_z_file() {
        let src = sources("domain: 0\nnumscans: 3\n", "1\n", "1\n", None);
        assert!(matches!(
            decode_ascii(&src).unwrap_err(),
            DecodeError::InconsistentLength(_)
        ));
    }

    #[test]
    fn test_malformed_data_names_file() {
        let src = sources("domain: 0\n", "1\nx\n", "1\n2\n", None);
        match decode_ascii(&src).unwrap_err() {
            DecodeError::MalformedData { file, line, .. } => {
                assert_eq!(file, "meas.TXT");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_companion_path_keeps_dots() {
        let path = companion_path(Path::new("dir/run.1"), "HDR");
        assert_eq!(path, PathBuf::from("dir/run.1.HDR"));
    }
}

//! Trace assembly: the single point where both front-ends converge.
//!
//! Validates vector lengths against each other and against the declared
//! counts, then moves everything into an immutable `Trace`.

use super::model::{HeaderMetadata, Trace, TraceVectors};
use crate::utils::error::DecodeError;
use log::debug;

/// Build a trace from metadata and decoded vectors
///
/// **Public** - main entry point for assembly
///
/// # Errors
/// * `DecodeError::InconsistentLength` - vectors disagree with each other or
///   with `x_count` / `scan_count`
pub fn assemble(metadata: HeaderMetadata, vectors: TraceVectors) -> Result<Trace, DecodeError> {
    if vectors.x.len() != metadata.x_count {
        return Err(DecodeError::InconsistentLength(format!(
            "trace '{}' declares {} x values but {} were decoded",
            metadata.title,
            metadata.x_count,
            vectors.x.len()
        )));
    }

    if vectors.z.is_some() && vectors.y.len() != metadata.scan_count {
        return Err(DecodeError::InconsistentLength(format!(
            "waterfall '{}' declares {} scans but has {} y values",
            metadata.title,
            metadata.scan_count,
            vectors.y.len()
        )));
    }

    check_vectors(&vectors.x, &vectors.y, vectors.z.as_deref(), vectors.imag.as_deref())?;

    debug!(
        "Assembled trace '{}': {} x, {} y{}",
        metadata.title,
        vectors.x.len(),
        vectors.y.len(),
        if vectors.z.is_some() { " (waterfall)" } else { "" }
    );

    Ok(Trace {
        title: metadata.title,
        domain: metadata.domain,
        domain_label: metadata.domain_label,
        data_type: metadata.data_type,
        x_unit: metadata.x_unit,
        y_unit: metadata.y_unit,
        z_unit: metadata.z_unit,
        channels: metadata.channels,
        x: vectors.x,
        y: vectors.y,
        z: vectors.z,
        imag: vectors.imag,
    })
}

/// Re-check the length invariants of an existing trace
///
/// Used after deserializing traces from an exported document.
pub fn validate(trace: &Trace) -> Result<(), DecodeError> {
    check_vectors(&trace.x, &trace.y, trace.z.as_deref(), trace.imag.as_deref())
}

fn check_vectors(x: &[f64], y: &[f64], z: Option<&[f64]>, imag: Option<&[f64]>) -> Result<(), DecodeError> {
    let dependent_len = match z {
        Some(z) => {
            let expected = x.len().checked_mul(y.len()).ok_or_else(|| {
                DecodeError::InconsistentLength("waterfall grid size overflows".to_string())
            })?;
            if z.len() != expected {
                return Err(DecodeError::InconsistentLength(format!(
                    "waterfall z has {} values, expected {} x {} = {}",
                    z.len(),
                    x.len(),
                    y.len(),
                    expected
                )));
            }
            z.len()
        }
        None => {
            if x.len() != y.len() {
                return Err(DecodeError::InconsistentLength(format!(
                    "x has {} values but y has {}",
                    x.len(),
                    y.len()
                )));
            }
            y.len()
        }
    };

    if let Some(imag) = imag {
        if imag.len() != dependent_len {
            return Err(DecodeError::InconsistentLength(format!(
                "imaginary part has {} values, expected {}",
                imag.len(),
                dependent_len
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codes::Domain;

    fn metadata(x_count: usize, scan_count: usize) -> HeaderMetadata {
        let mut meta = HeaderMetadata::new(Domain::Frequency, "Frequency domain");
        meta.title = "test".to_string();
        meta.x_unit = "Hz".to_string();
        meta.y_unit = "V".to_string();
        meta.x_count = x_count;
        meta.scan_count = scan_count;
        meta
    }

    #[test]
    fn test_assemble_plain_trace() {
        let vectors = TraceVectors {
            x: vec![0.0, 1.0, 2.0],
            y: vec![5.0, 6.0, 7.0],
            ..Default::default()
        };

        let trace = assemble(metadata(3, 1), vectors).unwrap();
        assert_eq!(trace.x(), &[0.0, 1.0, 2.0]);
        assert_eq!(trace.y(), &[5.0, 6.0, 7.0]);
        assert_eq!(trace.x_unit(), "Hz");
        assert_eq!(trace.domain(), Domain::Frequency);
        assert!(!trace.is_waterfall());
    }

    #[test]
    fn test_assemble_rejects_mismatched_y() {
        let vectors = TraceVectors {
            x: vec![0.0, 1.0, 2.0],
            y: vec![5.0, 6.0],
            ..Default::default()
        };

        let err = assemble(metadata(3, 1), vectors).unwrap_err();
        assert!(matches!(err, DecodeError::InconsistentLength(_)));
    }

    #[test]
    fn test_assemble_rejects_undeclared_x_count() {
        let vectors = TraceVectors {
            x: vec![0.0, 1.0],
            y: vec![5.0, 6.0],
            ..Default::default()
        };

        assert!(assemble(metadata(3, 1), vectors).is_err());
    }

    #[test]
    fn test_assemble_waterfall() {
        let vectors = TraceVectors {
            x: vec![10.0, 20.0, 30.0],
            y: vec![0.0, 1.0],
            z: Some(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
            imag: None,
        };

        let trace = assemble(metadata(3, 2), vectors).unwrap();
        assert!(trace.is_waterfall());
        assert_eq!(trace.z_row(1).unwrap(), &[4.0, 5.0, 6.0]);
        assert!(trace.z_row(2).is_none());
    }

    #[test]
    fn test_z_row_out_of_range_index() {
        let vectors = TraceVectors {
            x: vec![10.0],
            y: vec![0.0, 1.0],
            z: Some(vec![1.0, 2.0]),
            imag: None,
        };

        let trace = assemble(metadata(1, 2), vectors).unwrap();
        assert_eq!(trace.z_row(1).unwrap(), &[2.0]);
        assert!(trace.z_row(usize::MAX).is_none());
    }

    #[test]
    fn test_assemble_waterfall_wrong_grid() {
        let vectors = TraceVectors {
            x: vec![10.0, 20.0, 30.0],
            y: vec![0.0, 1.0],
            z: Some(vec![1.0, 2.0, 3.0, 4.0, 5.0]),
            imag: None,
        };

        let err = assemble(metadata(3, 2), vectors).unwrap_err();
        assert!(matches!(err, DecodeError::InconsistentLength(_)));
    }

    #[test]
    fn test_assemble_rejects_short_imaginary_part() {
        let vectors = TraceVectors {
            x: vec![0.0, 1.0],
            y: vec![1.0, 2.0],
            z: None,
            imag: Some(vec![0.5]),
        };

        assert!(assemble(metadata(2, 1), vectors).is_err());
    }
}

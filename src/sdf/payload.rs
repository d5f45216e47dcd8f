//! Binary payload reader.
//!
//! Turns the raw sample blocks described by a `RawPayloadLocation` into
//! physical vectors: element decode, complex split, `raw * scale + offset`,
//! index windowing and x-axis synthesis.

use super::header::TraceLayout;
use crate::codes::NumericEncoding;
use crate::trace::{ByteOrder, TraceVectors};
use crate::utils::error::DecodeError;
use log::debug;

/// Where one trace's samples sit in the file
///
/// A trace is stored as `blocks` runs of `elements` values each (one run per
/// scan), `stride` bytes apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPayloadLocation {
    pub offset: usize,
    pub element_width: usize,
    pub encoding: NumericEncoding,
    pub byte_order: ByteOrder,
    pub elements: usize,
    pub blocks: usize,
    pub stride: usize,
}

impl RawPayloadLocation {
    /// Bytes in one block
    pub fn block_len(&self) -> usize {
        self.elements * self.element_width
    }
}

/// Read and convert the samples of one trace
///
/// **Public** - main entry point for payload extraction
///
/// # Errors
/// * `DecodeError::TruncatedInput` - a block extends past the buffer
/// * `DecodeError::PayloadDecode` - unsupported width/encoding combination
pub fn read_payload(buf: &[u8], layout: &TraceLayout) -> Result<TraceVectors, DecodeError> {
    let meta = &layout.metadata;
    let blocks = read_blocks(buf, &layout.y_location)?;

    let mut dependent = Vec::with_capacity(meta.x_count * blocks.len());
    let mut imag = meta.is_complex.then(|| Vec::with_capacity(meta.x_count * blocks.len()));
    let mut stored_points = 0;

    for block in blocks {
        let (re, im) = if meta.is_complex {
            split_complex(&block)
        } else {
            (block, Vec::new())
        };
        stored_points = re.len();

        let re = apply_window(re, meta.index_window);
        dependent.extend(re.into_iter().map(|v| meta.to_physical(v)));

        if let Some(imag) = imag.as_mut() {
            let im = apply_window(im, meta.index_window);
            imag.extend(im.into_iter().map(|v| v * meta.scale));
        }
    }

    let x = match meta.x_axis.synthesize(stored_points) {
        Some(x) => x,
        None => {
            let location = layout.x_location.as_ref().ok_or_else(|| {
                DecodeError::MalformedHeader(format!(
                    "trace '{}' has explicit x values but no X-data location",
                    meta.title
                ))
            })?;
            read_blocks(buf, location)?.into_iter().next().unwrap_or_default()
        }
    };
    let x = apply_window(x, meta.index_window);

    debug!(
        "Read payload for '{}': {} x values, {} dependent values",
        meta.title,
        x.len(),
        dependent.len()
    );

    Ok(match &layout.y_axis {
        Some(scan_values) => TraceVectors {
            x,
            y: scan_values.clone(),
            z: Some(dependent),
            imag,
        },
        None => TraceVectors {
            x,
            y: dependent,
            z: None,
            imag,
        },
    })
}

/// Decode every block of a location into raw (unscaled) values
pub fn read_blocks(buf: &[u8], location: &RawPayloadLocation) -> Result<Vec<Vec<f64>>, DecodeError> {
    (0..location.blocks)
        .map(|block| {
            let start = block
                .checked_mul(location.stride)
                .and_then(|skip| location.offset.checked_add(skip))
                .ok_or_else(|| DecodeError::PayloadDecode("payload offset overflows".to_string()))?;
            let len = location.block_len();
            let bytes = start
                .checked_add(len)
                .and_then(|end| buf.get(start..end))
                .ok_or_else(|| DecodeError::truncated("sample payload", start, len, buf.len()))?;
            decode_elements(bytes, location.element_width, location.encoding, location.byte_order)
        })
        .collect()
}

/// Decode a run of fixed-width numbers
///
/// # Errors
/// * `DecodeError::PayloadDecode` - width/encoding pair not produced by SDF
pub fn decode_elements(
    bytes: &[u8],
    width: usize,
    encoding: NumericEncoding,
    order: ByteOrder,
) -> Result<Vec<f64>, DecodeError> {
    let convert: fn(&[u8], ByteOrder) -> f64 = match (width, encoding) {
        (2, NumericEncoding::SignedInt) => |c, o| f64::from(i16_from(c, o)),
        (4, NumericEncoding::SignedInt) => |c, o| f64::from(i32_from(c, o)),
        (4, NumericEncoding::Float) => |c, o| f64::from(f32_from(c, o)),
        (8, NumericEncoding::Float) => f64_from,
        (width, encoding) => {
            return Err(DecodeError::PayloadDecode(format!(
                "unsupported element: {} bytes as {:?}",
                width, encoding
            )))
        }
    };

    if bytes.len() % width != 0 {
        return Err(DecodeError::PayloadDecode(format!(
            "{} bytes is not a whole number of {}-byte elements",
            bytes.len(),
            width
        )));
    }

    Ok(bytes.chunks_exact(width).map(|chunk| convert(chunk, order)).collect())
}

fn fixed<const N: usize>(chunk: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&chunk[..N]);
    out
}

fn i16_from(chunk: &[u8], order: ByteOrder) -> i16 {
    match order {
        ByteOrder::BigEndian => i16::from_be_bytes(fixed(chunk)),
    }
}

fn i32_from(chunk: &[u8], order: ByteOrder) -> i32 {
    match order {
        ByteOrder::BigEndian => i32::from_be_bytes(fixed(chunk)),
    }
}

fn f32_from(chunk: &[u8], order: ByteOrder) -> f32 {
    match order {
        ByteOrder::BigEndian => f32::from_be_bytes(fixed(chunk)),
    }
}

fn f64_from(chunk: &[u8], order: ByteOrder) -> f64 {
    match order {
        ByteOrder::BigEndian => f64::from_be_bytes(fixed(chunk)),
    }
}

// Complex samples are stored as interleaved (re, im) pairs
fn split_complex(values: &[f64]) -> (Vec<f64>, Vec<f64>) {
    values.chunks_exact(2).map(|pair| (pair[0], pair[1])).unzip()
}

fn apply_window(values: Vec<f64>, window: Option<(usize, usize)>) -> Vec<f64> {
    match window {
        Some((start, stop)) if stop < values.len() => values[start..=stop].to_vec(),
        _ => values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(offset: usize, width: usize, encoding: NumericEncoding, elements: usize) -> RawPayloadLocation {
        RawPayloadLocation {
            offset,
            element_width: width,
            encoding,
            byte_order: ByteOrder::BigEndian,
            elements,
            blocks: 1,
            stride: 0,
        }
    }

    #[test]
    fn test_decode_big_endian_shorts() {
        let bytes = [0x00, 0x01, 0xFF, 0xFE];
        let values = decode_elements(&bytes, 2, NumericEncoding::SignedInt, ByteOrder::BigEndian).unwrap();
        assert_eq!(values, vec![1.0, -2.0]);
    }

    #[test]
    fn test_decode_big_endian_longs() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&70000i32.to_be_bytes());
        bytes.extend_from_slice(&(-3i32).to_be_bytes());
        let values = decode_elements(&bytes, 4, NumericEncoding::SignedInt, ByteOrder::BigEndian).unwrap();
        assert_eq!(values, vec![70000.0, -3.0]);
    }

    #[test]
    fn test_decode_floats_and_doubles() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0.25f32.to_be_bytes());
        let values = decode_elements(&bytes, 4, NumericEncoding::Float, ByteOrder::BigEndian).unwrap();
        assert_eq!(values, vec![0.25]);

        let bytes = 1e-9f64.to_be_bytes();
        let values = decode_elements(&bytes, 8, NumericEncoding::Float, ByteOrder::BigEndian).unwrap();
        assert_eq!(values, vec![1e-9]);
    }

    #[test]
    fn test_unsupported_combination() {
        let err = decode_elements(&[0; 8], 8, NumericEncoding::SignedInt, ByteOrder::BigEndian).unwrap_err();
        assert!(matches!(err, DecodeError::PayloadDecode(_)));

        let err = decode_elements(&[0; 4], 2, NumericEncoding::Float, ByteOrder::BigEndian).unwrap_err();
        assert!(matches!(err, DecodeError::PayloadDecode(_)));
    }

    #[test]
    fn test_read_blocks_with_stride() {
        let buf: Vec<u8> = [1i16, 2, 99, 3, 4, 99].iter().flat_map(|v| v.to_be_bytes()).collect();
        let loc = RawPayloadLocation {
            blocks: 2,
            stride: 6,
            ..location(0, 2, NumericEncoding::SignedInt, 2)
        };
        let blocks = read_blocks(&buf, &loc).unwrap();
        assert_eq!(blocks, vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_read_blocks_truncated() {
        let buf = [0u8; 7];
        let loc = location(0, 4, NumericEncoding::Float, 2);
        let err = read_blocks(&buf, &loc).unwrap_err();
        assert!(matches!(err, DecodeError::TruncatedInput { .. }));
    }

    #[test]
    fn test_split_complex_and_window() {
        let (re, im) = split_complex(&[1.0, -1.0, 2.0, -2.0, 3.0, -3.0]);
        assert_eq!(re, vec![1.0, 2.0, 3.0]);
        assert_eq!(im, vec![-1.0, -2.0, -3.0]);

        assert_eq!(apply_window(re.clone(), Some((1, 2))), vec![2.0, 3.0]);
        assert_eq!(apply_window(re, None), vec![1.0, 2.0, 3.0]);
    }
}

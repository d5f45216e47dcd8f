//! Binary header decoder.
//!
//! This module handles:
//! - Validating the file identifier and walking the header records
//! - Computing the per-trace correction factor
//! - Locating every trace's samples in the Y-data (and X-data) records

use super::payload::{decode_elements, RawPayloadLocation};
use super::reader::{peek_record_type, RecordReader};
use super::records::{
    ChannelHeader, DataHeader, FileHeader, MeasurementHeader, ScanStruct, SdfHeader, VectorHeader,
};
use crate::codes::{Domain, ScanOrder, XResolution};
use crate::trace::{AmplitudeConversion, ByteOrder, HeaderMetadata, XAxis};
use crate::utils::config::{
    CHANNEL_HDR_MIN_SIZE, CHANNEL_HDR_RECORD_TYPE, CHANNEL_POWER_DIVISOR, DATA_HDR_MIN_SIZE,
    DATA_HDR_RECORD_TYPE, FILE_HDR_MIN_SIZE, FILE_HDR_RECORD_TYPE, MEAS_HDR_MIN_SIZE,
    MEAS_HDR_RECORD_TYPE, PEAK_POWER_APPLICATION, RECORD_PREAMBLE_SIZE, SCAN_STRUCT_MIN_SIZE,
    SCAN_STRUCT_RECORD_TYPE, SCAN_VAR_RECORD_TYPE, SDF_FILE_IDENTIFIER, VECTOR_HDR_MIN_SIZE,
    VECTOR_HDR_RECORD_TYPE, XDATA_RECORD_TYPE, YDATA_RECORD_TYPE,
};
use crate::utils::error::DecodeError;
use log::{debug, info, warn};

/// Everything needed to read one trace's payload
#[derive(Debug, Clone, PartialEq)]
pub struct TraceLayout {
    pub metadata: HeaderMetadata,
    pub y_location: RawPayloadLocation,
    /// X-data block, only for arbitrary x resolution
    pub x_location: Option<RawPayloadLocation>,
    /// Scan variable values; `Some` makes the trace a waterfall
    pub y_axis: Option<Vec<f64>>,
}

/// Decoded header records plus the trace layouts derived from them
#[derive(Debug, Clone)]
pub struct SdfLayout {
    pub header: SdfHeader,
    pub traces: Vec<TraceLayout>,
}

// Byte span of a data record's sample area
#[derive(Debug, Clone, Copy)]
struct DataArea {
    base: usize,
    len: usize,
}

impl DataArea {
    fn open(buf: &[u8], offset: usize, record_type: i16, name: &'static str) -> Result<Self, DecodeError> {
        let r = RecordReader::open(buf, offset, record_type, RECORD_PREAMBLE_SIZE, name)?;
        Ok(Self {
            base: r.offset() + RECORD_PREAMBLE_SIZE,
            len: r.size() - RECORD_PREAMBLE_SIZE,
        })
    }

    fn end(&self) -> usize {
        self.base + self.len
    }
}

/// Decode all header records of an SDF file
///
/// **Public** - main entry point for header decoding
///
/// # Arguments
/// * `buf` - Complete file contents
///
/// # Returns
/// The decoded records and one `TraceLayout` per (data header, vector) pair.
/// A file without a Y-data record yields no layouts.
///
/// # Errors
/// * `DecodeError::MalformedHeader` - bad identifier, revision or record structure
/// * `DecodeError::TruncatedInput` - a record or payload runs past the buffer
/// * `DecodeError::UnknownCode` - an enumerated field holds an unknown code
pub fn decode_header(buf: &[u8]) -> Result<SdfLayout, DecodeError> {
    let identifier = buf
        .get(..SDF_FILE_IDENTIFIER.len())
        .ok_or_else(|| DecodeError::truncated("file identifier", 0, SDF_FILE_IDENTIFIER.len(), buf.len()))?;
    if identifier != SDF_FILE_IDENTIFIER {
        return Err(DecodeError::MalformedHeader(format!(
            "invalid file identifier {:02X?}",
            identifier
        )));
    }

    let file_reader = RecordReader::open(
        buf,
        SDF_FILE_IDENTIFIER.len(),
        FILE_HDR_RECORD_TYPE,
        FILE_HDR_MIN_SIZE,
        "file header",
    )?;
    let file = FileHeader::decode(&file_reader)?;

    let meas_reader = RecordReader::open(
        buf,
        file_reader.end(),
        MEAS_HDR_RECORD_TYPE,
        MEAS_HDR_MIN_SIZE,
        "measurement header",
    )?;
    let measurement = MeasurementHeader::decode(&meas_reader)?;

    let data = read_records(
        buf,
        file.num_data_hdr_records,
        file.offset_data_hdr_record,
        DATA_HDR_RECORD_TYPE,
        DATA_HDR_MIN_SIZE,
        "data header",
        DataHeader::decode,
    )?;
    let vectors = read_records(
        buf,
        file.num_vector_hdr_records,
        file.offset_vector_record,
        VECTOR_HDR_RECORD_TYPE,
        VECTOR_HDR_MIN_SIZE,
        "vector header",
        VectorHeader::decode,
    )?;
    let channels = read_records(
        buf,
        file.num_channel_hdr_records,
        file.offset_channel_record,
        CHANNEL_HDR_RECORD_TYPE,
        CHANNEL_HDR_MIN_SIZE,
        "channel header",
        ChannelHeader::decode,
    )?;

    let (scan, scan_values) = read_scan_structure(buf, &file)?;

    info!(
        "Decoded SDF header: {} data, {} vector, {} channel records ({})",
        data.len(),
        vectors.len(),
        channels.len(),
        file.application
    );

    let header = SdfHeader {
        file,
        measurement,
        data,
        vectors,
        channels,
        scan,
        scan_values,
    };

    let traces = layout_traces(buf, &header)?;
    Ok(SdfLayout { header, traces })
}

// Records of one type are stored back to back starting at `offset`
fn read_records<T>(
    buf: &[u8],
    count: i16,
    offset: i32,
    record_type: i16,
    min_size: usize,
    name: &'static str,
    decode: impl Fn(&RecordReader<'_>) -> Result<T, DecodeError>,
) -> Result<Vec<T>, DecodeError> {
    let count = usize::try_from(count).unwrap_or(0);
    if count == 0 {
        return Ok(Vec::new());
    }

    let mut cursor = usize::try_from(offset).map_err(|_| {
        DecodeError::MalformedHeader(format!(
            "{} {} records declared but offset is {}",
            count, name, offset
        ))
    })?;

    let mut records = Vec::with_capacity(count);
    for _ in 0..count {
        let reader = RecordReader::open(buf, cursor, record_type, min_size, name)?;
        records.push(decode(&reader)?);
        cursor = reader.end();
    }
    Ok(records)
}

fn read_scan_structure(
    buf: &[u8],
    file: &FileHeader,
) -> Result<(Option<ScanStruct>, Option<Vec<f64>>), DecodeError> {
    if file.num_scan_struct_records <= 0 {
        return Ok((None, None));
    }

    let offset = usize::try_from(file.offset_scan_struct_record).map_err(|_| {
        DecodeError::MalformedHeader(format!(
            "scan structure declared but offset is {}",
            file.offset_scan_struct_record
        ))
    })?;

    let reader = RecordReader::open(
        buf,
        offset,
        SCAN_STRUCT_RECORD_TYPE,
        SCAN_STRUCT_MIN_SIZE,
        "scan structure",
    )?;
    let scan = ScanStruct::decode(&reader)?;

    if peek_record_type(buf, reader.end()) != Some(SCAN_VAR_RECORD_TYPE) {
        return Ok((Some(scan), None));
    }

    let var_reader = RecordReader::open(
        buf,
        reader.end(),
        SCAN_VAR_RECORD_TYPE,
        RECORD_PREAMBLE_SIZE,
        "scan variable",
    )?;
    let width = scan.scan_var_type.width();
    let count = scan.scan_count()?;
    let bytes = var_reader.bytes(RECORD_PREAMBLE_SIZE, count * width)?;
    let values = decode_elements(bytes, width, scan.scan_var_type.encoding(), ByteOrder::BigEndian)?;

    debug!("Read {} scan variable values", values.len());
    Ok((Some(scan), Some(values)))
}

/// Combined engineering-unit and window correction of one vector
///
/// Product over the response and reference channels of
/// `(window_corr / int_to_eng)^(power / 48)`; a channel index of -1 is skipped.
/// `window_corr` is the channel's narrow-band correction for spectral domains
/// and 1 otherwise.
///
/// # Errors
/// * `DecodeError::MalformedHeader` - channel index out of range or a zero
///   engineering-unit factor
pub fn correction_factor(
    data: &DataHeader,
    vector: &VectorHeader,
    channels: &[ChannelHeader],
) -> Result<f64, DecodeError> {
    let mut factor = 1.0;

    for (&index, &power) in vector.channel_records.iter().zip(&vector.channel_powers) {
        if index == -1 {
            continue;
        }
        let channel = usize::try_from(index)
            .ok()
            .and_then(|i| channels.get(i))
            .ok_or_else(|| {
                DecodeError::MalformedHeader(format!(
                    "vector references channel {} but only {} channel records exist",
                    index,
                    channels.len()
                ))
            })?;

        let int_to_eng = f64::from(channel.int_to_eng_unit);
        if int_to_eng == 0.0 {
            return Err(DecodeError::MalformedHeader(format!(
                "channel '{}' has a zero engineering-unit factor",
                channel.label
            )));
        }

        // A zero narrow-band correction means no window was applied
        let window_corr = match f64::from(channel.window.narrow_band_correction) {
            corr if data.domain.is_spectral() && corr != 0.0 => corr,
            _ => 1.0,
        };

        factor *= (window_corr / int_to_eng).powf(f64::from(power) / CHANNEL_POWER_DIVISOR);
    }

    Ok(factor)
}

// Per data header quantities shared by all its traces
struct DataShape {
    points: usize,
    vectors: usize,
    elements: usize,
    block_bytes: usize,
    x_block_bytes: usize,
}

impl DataShape {
    fn of(data: &DataHeader, vector_records: usize) -> Result<Self, DecodeError> {
        if !matches!(data.y_per_point, 0 | 1) {
            return Err(DecodeError::PayloadDecode(format!(
                "data header '{}' stores {} y values per point",
                data.title, data.y_per_point
            )));
        }

        // Every referenced vector record must exist before anything is sized from the counts
        let vectors = data.vector_count()?;
        let in_range = usize::try_from(data.first_vector_record)
            .ok()
            .and_then(|first| first.checked_add(vectors))
            .is_some_and(|end| end <= vector_records);
        if !in_range {
            return Err(DecodeError::MalformedHeader(format!(
                "data header '{}' references {} vectors from record {} but only {} vector records exist",
                data.title, vectors, data.first_vector_record, vector_records
            )));
        }

        let points = data.point_count()?;
        let elements = if data.y_is_complex { points * 2 } else { points };
        Ok(Self {
            points,
            vectors,
            elements,
            block_bytes: elements * data.y_data_type.width(),
            x_block_bytes: points * data.x_data_type.width(),
        })
    }
}

fn layout_traces(buf: &[u8], header: &SdfHeader) -> Result<Vec<TraceLayout>, DecodeError> {
    let file = &header.file;
    let Ok(y_offset) = usize::try_from(file.offset_ydata_record) else {
        warn!("SDF file has no Y-data record, no traces decoded");
        return Ok(Vec::new());
    };
    let y_area = DataArea::open(buf, y_offset, YDATA_RECORD_TYPE, "Y-data")?;

    let shapes = header
        .data
        .iter()
        .map(|data| DataShape::of(data, header.vectors.len()))
        .collect::<Result<Vec<_>, _>>()?;

    let num_scans = match &header.scan {
        Some(scan) => scan.scan_count()?,
        None => 1,
    };
    let scan_order = header.scan.as_ref().map_or(ScanOrder::Scan, |s| s.scan_order);
    let scanned = |data: &DataHeader| num_scans > 1 && data.scan_data;

    // Bytes of one scan across every scanned trace, then the single-block traces
    let (scan_bytes, single_bytes) = header.data.iter().zip(&shapes).fold(
        (0usize, 0usize),
        |(scan, single), (data, shape)| {
            let bytes = shape.vectors * shape.block_bytes;
            if scanned(data) {
                (scan + bytes, single)
            } else {
                (scan, single + bytes)
            }
        },
    );
    let scanned_bytes = num_scans
        .checked_mul(scan_bytes)
        .ok_or_else(|| DecodeError::PayloadDecode("Y-data size overflows".to_string()))?;
    let needed = scanned_bytes
        .checked_add(single_bytes)
        .ok_or_else(|| DecodeError::PayloadDecode("Y-data size overflows".to_string()))?;
    if needed > y_area.len {
        return Err(DecodeError::truncated("Y-data", y_area.base, needed, y_area.end()));
    }

    if num_scans > 1 && !header.data.iter().any(|d| d.scan_data) {
        warn!(
            "Scan structure declares {} scans but no data header is scan data",
            num_scans
        );
    }

    let x_area = if header.data.iter().any(|d| d.x_resolution.is_explicit()) {
        match usize::try_from(file.offset_xdata_record) {
            Ok(offset) => Some(DataArea::open(buf, offset, XDATA_RECORD_TYPE, "X-data")?),
            Err(_) => None,
        }
    } else {
        None
    };

    let y_axis = if header.data.iter().any(|d| scanned(d)) {
        waterfall_axis(header, num_scans)
    } else {
        None
    };
    let trace_count: usize = shapes.iter().map(|s| s.vectors).sum();

    let mut traces = Vec::new();
    let mut scan_prefix = 0;
    let mut single_prefix = 0;
    let mut x_data_prefix = 0;
    let mut x_trace_prefix = 0;

    for (data, shape) in header.data.iter().zip(&shapes) {
        let is_scan = scanned(data);
        let blocks = if is_scan { num_scans } else { 1 };

        for v in 0..shape.vectors {
            let vector = vector_for(header, data, v)?;

            let (offset, stride) = match (is_scan, scan_order) {
                (false, _) => (y_area.base + scanned_bytes + single_prefix, 0),
                (true, ScanOrder::Scan) => (y_area.base + scan_prefix, scan_bytes),
                (true, ScanOrder::Depth) => (y_area.base + num_scans * scan_prefix, shape.block_bytes),
            };
            let y_location = RawPayloadLocation {
                offset,
                element_width: data.y_data_type.width(),
                encoding: data.y_data_type.encoding(),
                byte_order: ByteOrder::BigEndian,
                elements: shape.elements,
                blocks,
                stride,
            };

            let x_location = match data.x_resolution {
                XResolution::Linear | XResolution::Logarithmic => None,
                mode => {
                    let area = x_area.ok_or_else(|| {
                        DecodeError::MalformedHeader(format!(
                            "data header '{}' declares explicit x values but the file has no X-data record",
                            data.title
                        ))
                    })?;
                    let relative = match mode {
                        XResolution::ArbitraryPerFile => 0,
                        XResolution::ArbitraryPerDataType => x_data_prefix,
                        _ => x_trace_prefix,
                    };
                    if relative + shape.x_block_bytes > area.len {
                        return Err(DecodeError::truncated(
                            "X-data",
                            area.base + relative,
                            shape.x_block_bytes,
                            area.end(),
                        ));
                    }
                    Some(RawPayloadLocation {
                        offset: area.base + relative,
                        element_width: data.x_data_type.width(),
                        encoding: data.x_data_type.encoding(),
                        byte_order: ByteOrder::BigEndian,
                        elements: shape.points,
                        blocks: 1,
                        stride: 0,
                    })
                }
            };

            let metadata = trace_metadata(header, data, vector, shape, trace_count, blocks)?;
            traces.push(TraceLayout {
                metadata,
                y_location,
                x_location,
                y_axis: if is_scan { y_axis.clone() } else { None },
            });

            if is_scan {
                scan_prefix += shape.block_bytes;
            } else {
                single_prefix += shape.block_bytes;
            }
            x_trace_prefix += shape.x_block_bytes;
        }
        x_data_prefix += shape.x_block_bytes;
    }

    debug!("Laid out {} traces over {} scans", traces.len(), num_scans);
    Ok(traces)
}

fn vector_for<'h>(header: &'h SdfHeader, data: &DataHeader, v: usize) -> Result<&'h VectorHeader, DecodeError> {
    usize::try_from(data.first_vector_record)
        .ok()
        .and_then(|first| header.vectors.get(first + v))
        .ok_or_else(|| {
            DecodeError::MalformedHeader(format!(
                "data header '{}' references vector {} + {} but only {} vector records exist",
                data.title,
                data.first_vector_record,
                v,
                header.vectors.len()
            ))
        })
}

fn waterfall_axis(header: &SdfHeader, num_scans: usize) -> Option<Vec<f64>> {
    if num_scans <= 1 {
        return None;
    }

    match &header.scan_values {
        Some(values) if values.len() == num_scans => Some(values.clone()),
        _ => {
            warn!(
                "No scan variable values for {} scans, using scan indices",
                num_scans
            );
            Some((0..num_scans).map(|i| i as f64).collect())
        }
    }
}

fn trace_metadata(
    header: &SdfHeader,
    data: &DataHeader,
    vector: &VectorHeader,
    shape: &DataShape,
    trace_count: usize,
    scans: usize,
) -> Result<HeaderMetadata, DecodeError> {
    let file = &header.file;
    let mut meta = HeaderMetadata::new(data.domain, data.domain_label.clone());

    meta.title = if data.title.is_empty() {
        header.measurement.title.clone()
    } else {
        data.title.clone()
    };
    meta.data_type = Some(data.data_type.clone());
    meta.application = Some(file.application.clone());
    meta.measured_at = file.measured_at;

    meta.x_unit = data.x_unit.label.clone();
    if scans > 1 {
        meta.y_unit = header
            .scan
            .as_ref()
            .map(|s| s.scan_unit.label.clone())
            .unwrap_or_default();
        meta.z_unit = Some(data.y_unit.label.clone());
    } else {
        meta.y_unit = data.y_unit.label.clone();
    }

    meta.scale = correction_factor(data, vector, &header.channels)?;
    meta.offset = 0.0;
    if file.application == PEAK_POWER_APPLICATION && data.y_is_power_data && !data.y_is_complex {
        meta.amplitude = AmplitudeConversion::PeakPowerToRms;
    }

    meta.index_window = match data.domain {
        Domain::Frequency => header.measurement.frequency_window(shape.points),
        _ => None,
    };
    meta.x_count = meta
        .index_window
        .map_or(shape.points, |(start, stop)| stop - start + 1);
    meta.scan_count = scans;
    meta.trace_count = trace_count;

    meta.x_axis = match data.x_resolution {
        XResolution::Linear => XAxis::Linear {
            start: data.first_x,
            increment: data.delta_x,
        },
        XResolution::Logarithmic => XAxis::Logarithmic {
            start: data.first_x,
            ratio: data.delta_x,
        },
        _ => XAxis::Explicit,
    };
    meta.is_complex = data.y_is_complex;
    meta.byte_order = Some(ByteOrder::BigEndian);

    meta.channels = vector
        .channel_records
        .iter()
        .filter_map(|&index| usize::try_from(index).ok())
        .filter_map(|index| header.channels.get(index))
        .map(|channel| channel.label.clone())
        .collect();

    Ok(meta)
}

//! SDF revision-2 header records.
//!
//! One struct per record type, each decoded from a `RecordReader` at the
//! fixed field offsets of the SDF documentation. Enumerated fields are
//! resolved through the code tables here, so an unknown code fails the
//! whole header.

use super::reader::RecordReader;
use crate::codes::{lookup, CodeCategory, Domain, NumericType, ScanOrder, XResolution};
use crate::utils::config::{SUPPORTED_SDF_REVISION, UNIT_BLOCK_SIZE};
use crate::utils::error::DecodeError;
use chrono::{NaiveDate, NaiveDateTime};
use log::warn;
use serde::Serialize;

/// Physical unit block embedded in data, channel and scan records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdfUnit {
    pub label: String,
    /// Factor to SI units
    pub factor: f32,
    pub mass: i8,
    pub length: i8,
    pub time: i8,
    pub current: i8,
    pub temperature: i8,
    pub luminal_intensity: i8,
    pub mole: i8,
    pub plane_angle: i8,
}

impl SdfUnit {
    fn decode(r: &RecordReader<'_>, rel: usize) -> Result<Self, DecodeError> {
        // Touch the whole block first so a short record fails as one unit
        r.bytes(rel, UNIT_BLOCK_SIZE)?;
        Ok(Self {
            label: r.string(rel, 10)?,
            factor: r.f32(rel + 10)?,
            mass: r.i8(rel + 14)?,
            length: r.i8(rel + 15)?,
            time: r.i8(rel + 16)?,
            current: r.i8(rel + 17)?,
            temperature: r.i8(rel + 18)?,
            luminal_intensity: r.i8(rel + 19)?,
            mole: r.i8(rel + 20)?,
            plane_angle: r.i8(rel + 21)?,
        })
    }
}

/// Window description of a channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdfWindow {
    pub window_type: String,
    pub correction_mode: String,
    pub bandwidth: f32,
    pub time_constant: f32,
    pub truncation: f32,
    pub wide_band_correction: f32,
    pub narrow_band_correction: f32,
}

impl SdfWindow {
    fn decode(r: &RecordReader<'_>, rel: usize) -> Result<Self, DecodeError> {
        Ok(Self {
            window_type: lookup(CodeCategory::WindowType, r.i16(rel)?)?.to_string(),
            correction_mode: lookup(CodeCategory::CorrectionMode, r.i16(rel + 2)?)?.to_string(),
            bandwidth: r.f32(rel + 4)?,
            time_constant: r.f32(rel + 8)?,
            truncation: r.f32(rel + 12)?,
            wide_band_correction: r.f32(rel + 16)?,
            narrow_band_correction: r.f32(rel + 20)?,
        })
    }
}

/// FILE_HDR record (type 10)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileHeader {
    pub record_size: usize,
    pub revision: i16,
    pub application: String,
    pub measured_at: Option<NaiveDateTime>,
    pub application_version: String,
    pub num_data_hdr_records: i16,
    pub num_vector_hdr_records: i16,
    pub num_channel_hdr_records: i16,
    pub num_unique_records: i16,
    pub num_scan_struct_records: i16,
    pub num_xdata_records: i16,
    pub offset_data_hdr_record: i32,
    pub offset_vector_record: i32,
    pub offset_channel_record: i32,
    pub offset_unique_record: i32,
    pub offset_scan_struct_record: i32,
    pub offset_xdata_record: i32,
    pub offset_ydata_record: i32,
}

impl FileHeader {
    /// Decode the file header, rejecting any revision other than 2
    pub fn decode(r: &RecordReader<'_>) -> Result<Self, DecodeError> {
        let revision = r.i16(6)?;
        if revision != SUPPORTED_SDF_REVISION {
            return Err(DecodeError::MalformedHeader(format!(
                "unsupported SDF revision {} (only revision {} is decoded)",
                revision, SUPPORTED_SDF_REVISION
            )));
        }

        let application = lookup(CodeCategory::Application, r.i16(8)?)?.to_string();
        let measured_at = decode_timestamp(r.i16(10)?, r.i16(12)?, r.i16(14)?);

        Ok(Self {
            record_size: r.size(),
            revision,
            application,
            measured_at,
            application_version: r.string(16, 8)?,
            num_data_hdr_records: r.i16(24)?,
            num_vector_hdr_records: r.i16(26)?,
            num_channel_hdr_records: r.i16(28)?,
            num_unique_records: r.i16(30)?,
            num_scan_struct_records: r.i16(32)?,
            num_xdata_records: r.i16(34)?,
            offset_data_hdr_record: r.i32(36)?,
            offset_vector_record: r.i32(40)?,
            offset_channel_record: r.i32(44)?,
            offset_unique_record: r.i32(48)?,
            offset_scan_struct_record: r.i32(52)?,
            offset_xdata_record: r.i32(56)?,
            offset_ydata_record: r.i32(60)?,
        })
    }
}

// Dates are packed as year, month*100+day and hour*100+minute
fn decode_timestamp(year: i16, month_day: i16, hour_minute: i16) -> Option<NaiveDateTime> {
    fn combine(year: i16, month_day: i16, hour_minute: i16) -> Option<NaiveDateTime> {
        let month = u32::try_from(month_day / 100).ok()?;
        let day = u32::try_from(month_day % 100).ok()?;
        let hour = u32::try_from(hour_minute / 100).ok()?;
        let minute = u32::try_from(hour_minute % 100).ok()?;
        NaiveDate::from_ymd_opt(year.into(), month, day)?.and_hms_opt(hour, minute, 0)
    }

    let timestamp = combine(year, month_day, hour_minute);
    if timestamp.is_none() {
        warn!(
            "Ignoring invalid measurement timestamp {}/{}/{}",
            year, month_day, hour_minute
        );
    }
    timestamp
}

/// MEAS_HDR record (type 11)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementHeader {
    pub record_size: usize,
    pub offset_unique_record: i32,
    pub block_size: i32,
    pub zoom_mode_on: bool,
    pub start_freq_index: i16,
    pub stop_freq_index: i16,
    pub average_type: String,
    pub average_num: i32,
    pub pct_overlap: f32,
    pub title: String,
    pub video_bw: f32,
    pub center_freq: f64,
    pub span_freq: f64,
    pub sweep_freq: f64,
    pub measurement_type: String,
    pub real_time: String,
    pub detection: String,
    pub sweep_time: f64,
}

impl MeasurementHeader {
    pub fn decode(r: &RecordReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            record_size: r.size(),
            offset_unique_record: r.i32(6)?,
            block_size: r.i32(18)?,
            zoom_mode_on: r.flag(22)?,
            start_freq_index: r.i16(24)?,
            stop_freq_index: r.i16(26)?,
            average_type: lookup(CodeCategory::AverageType, r.i16(28)?)?.to_string(),
            average_num: r.i32(30)?,
            pct_overlap: r.f32(34)?,
            title: r.string(38, 60)?,
            video_bw: r.f32(98)?,
            center_freq: r.f64(102)?,
            span_freq: r.f64(110)?,
            sweep_freq: r.f64(118)?,
            measurement_type: lookup(CodeCategory::MeasurementType, r.i16(126)?)?.to_string(),
            real_time: lookup(CodeCategory::RealTime, r.i16(128)?)?.to_string(),
            detection: lookup(CodeCategory::Detection, r.i16(130)?)?.to_string(),
            sweep_time: r.f64(132)?,
        })
    }

    /// Inclusive frequency index range, when it fits inside `num_points`
    pub fn frequency_window(&self, num_points: usize) -> Option<(usize, usize)> {
        let start = usize::try_from(self.start_freq_index).ok()?;
        let stop = usize::try_from(self.stop_freq_index).ok()?;
        (start <= stop && stop < num_points).then_some((start, stop))
    }
}

/// DATA_HDR record (type 12)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataHeader {
    pub record_size: usize,
    pub offset_unique_record: i32,
    pub title: String,
    pub domain: Domain,
    pub domain_label: String,
    pub data_type: String,
    pub num_points: i16,
    pub last_valid_index: i16,
    pub x_resolution: XResolution,
    pub x_data_type: NumericType,
    pub x_per_point: i16,
    pub y_data_type: NumericType,
    pub y_per_point: i16,
    pub y_is_complex: bool,
    pub y_is_normalized: bool,
    pub y_is_power_data: bool,
    pub y_is_valid: bool,
    pub first_vector_record: i32,
    pub total_rows: i16,
    pub total_cols: i16,
    pub x_unit: SdfUnit,
    pub y_unit_valid: bool,
    pub y_unit: SdfUnit,
    pub first_x: f64,
    pub delta_x: f64,
    pub scan_data: bool,
    pub window_applied: bool,
}

impl DataHeader {
    pub fn decode(r: &RecordReader<'_>) -> Result<Self, DecodeError> {
        let domain_code = r.i16(26)?;

        Ok(Self {
            record_size: r.size(),
            offset_unique_record: r.i32(6)?,
            title: r.string(10, 16)?,
            domain: Domain::from_code(domain_code)?,
            domain_label: lookup(CodeCategory::Domain, domain_code)?.to_string(),
            data_type: lookup(CodeCategory::DataType, r.i16(28)?)?.to_string(),
            num_points: r.i16(30)?,
            last_valid_index: r.i16(32)?,
            x_resolution: XResolution::from_code(r.i16(42)?)?,
            x_data_type: NumericType::from_code(r.i16(44)?)?,
            x_per_point: r.i16(46)?,
            y_data_type: NumericType::from_code(r.i16(48)?)?,
            y_per_point: r.i16(50)?,
            y_is_complex: r.flag(52)?,
            y_is_normalized: r.flag(54)?,
            y_is_power_data: r.flag(56)?,
            y_is_valid: r.flag(58)?,
            first_vector_record: r.i32(60)?,
            total_rows: r.i16(64)?,
            total_cols: r.i16(66)?,
            x_unit: SdfUnit::decode(r, 68)?,
            y_unit_valid: r.flag(90)?,
            y_unit: SdfUnit::decode(r, 92)?,
            first_x: r.f64(114)?,
            delta_x: r.f64(122)?,
            scan_data: r.flag(130)?,
            window_applied: r.flag(132)?,
        })
    }

    /// Number of vectors (traces) described by this data header
    pub fn vector_count(&self) -> Result<usize, DecodeError> {
        let rows = usize::try_from(self.total_rows).ok().filter(|n| *n > 0);
        let cols = usize::try_from(self.total_cols).ok().filter(|n| *n > 0);
        match (rows, cols) {
            (Some(rows), Some(cols)) => Ok(rows * cols),
            _ => Err(DecodeError::MalformedHeader(format!(
                "data header '{}' declares {} rows x {} cols",
                self.title, self.total_rows, self.total_cols
            ))),
        }
    }

    pub fn point_count(&self) -> Result<usize, DecodeError> {
        usize::try_from(self.num_points).map_err(|_| {
            DecodeError::MalformedHeader(format!(
                "data header '{}' declares {} points",
                self.title, self.num_points
            ))
        })
    }
}

/// VECTOR_HDR record (type 13)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorHeader {
    pub record_size: usize,
    pub offset_unique_record: i32,
    /// Response and reference channel indices (-1 = none)
    pub channel_records: [i16; 2],
    /// Power of each channel, times 48
    pub channel_powers: [i16; 2],
}

impl VectorHeader {
    pub fn decode(r: &RecordReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            record_size: r.size(),
            offset_unique_record: r.i32(6)?,
            channel_records: [r.i16(10)?, r.i16(12)?],
            channel_powers: [r.i16(14)?, r.i16(16)?],
        })
    }
}

/// CHANNEL_HDR record (type 14)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelHeader {
    pub record_size: usize,
    pub offset_unique_record: i32,
    pub label: String,
    pub module_id: String,
    pub serial_number: String,
    pub window: SdfWindow,
    pub weighting: String,
    pub delay: f32,
    pub range: f32,
    pub direction: String,
    pub point_num: i16,
    pub coupling: String,
    pub overloaded: bool,
    pub internal_unit_label: String,
    pub engineering_unit: SdfUnit,
    pub int_to_eng_unit: f32,
    pub input_impedance: f32,
    pub channel_attribute: String,
    pub alias_protected: bool,
    pub digital_channel: bool,
    pub channel_scale: f64,
    pub channel_offset: f64,
    pub gate_begin: f64,
    pub gate_end: f64,
    pub user_delay: f64,
}

impl ChannelHeader {
    pub fn decode(r: &RecordReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            record_size: r.size(),
            offset_unique_record: r.i32(6)?,
            label: r.string(10, 30)?,
            module_id: r.string(40, 12)?,
            serial_number: r.string(52, 12)?,
            window: SdfWindow::decode(r, 64)?,
            weighting: lookup(CodeCategory::Weighting, r.i16(88)?)?.to_string(),
            delay: r.f32(90)?,
            range: r.f32(94)?,
            direction: lookup(CodeCategory::Direction, r.i16(98)?)?.to_string(),
            point_num: r.i16(100)?,
            coupling: lookup(CodeCategory::Coupling, r.i16(102)?)?.to_string(),
            overloaded: r.flag(104)?,
            internal_unit_label: r.string(106, 10)?,
            engineering_unit: SdfUnit::decode(r, 116)?,
            int_to_eng_unit: r.f32(138)?,
            input_impedance: r.f32(142)?,
            channel_attribute: lookup(CodeCategory::ChannelAttribute, r.i16(146)?)?.to_string(),
            alias_protected: r.flag(148)?,
            digital_channel: r.flag(150)?,
            channel_scale: r.f64(152)?,
            channel_offset: r.f64(160)?,
            gate_begin: r.f64(168)?,
            gate_end: r.f64(176)?,
            user_delay: r.f64(184)?,
        })
    }
}

/// SCAN_STRUCT record (type 15)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanStruct {
    pub record_size: usize,
    pub num_scans: i16,
    pub last_scan_index: i16,
    pub scan_order: ScanOrder,
    pub scan_type: String,
    pub scan_var_type: NumericType,
    pub scan_unit: SdfUnit,
}

impl ScanStruct {
    pub fn decode(r: &RecordReader<'_>) -> Result<Self, DecodeError> {
        let scan_type_code = r.i16(10)?;

        Ok(Self {
            record_size: r.size(),
            num_scans: r.i16(6)?,
            last_scan_index: r.i16(8)?,
            scan_order: ScanOrder::from_code(scan_type_code)?,
            scan_type: lookup(CodeCategory::ScanType, scan_type_code)?.to_string(),
            scan_var_type: NumericType::from_scan_code(r.i16(12)?)?,
            scan_unit: SdfUnit::decode(r, 14)?,
        })
    }

    pub fn scan_count(&self) -> Result<usize, DecodeError> {
        usize::try_from(self.num_scans)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                DecodeError::MalformedHeader(format!(
                    "scan structure declares {} scans",
                    self.num_scans
                ))
            })
    }
}

/// Every header record of one SDF file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SdfHeader {
    pub file: FileHeader,
    pub measurement: MeasurementHeader,
    pub data: Vec<DataHeader>,
    pub vectors: Vec<VectorHeader>,
    pub channels: Vec<ChannelHeader>,
    pub scan: Option<ScanStruct>,
    /// Scan variable values from the SCAN_VAR record, when present
    pub scan_values: Option<Vec<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_timestamp() {
        let ts = decode_timestamp(2013, 213, 908).unwrap();
        assert_eq!(ts.to_string(), "2013-02-13 09:08:00");
    }

    #[test]
    fn test_decode_invalid_timestamp() {
        assert!(decode_timestamp(0, 0, 0).is_none());
        assert!(decode_timestamp(2013, 1399, 2561).is_none());
    }
}

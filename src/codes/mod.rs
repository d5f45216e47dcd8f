//! Unit and code tables shared by the SDF and ASCII front-ends.
//!
//! This module handles:
//! - Mapping header enumeration codes to documented labels
//! - Resolving ASCII header text back through the same tables
//! - Typed views (domain, numeric type, x resolution, scan order) of the
//!   codes that drive decoding
//!
//! Unknown codes are always an error, never a default: an unrecognised code
//! means a corrupted file or an unsupported revision.

mod tables;

use crate::utils::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Family of enumeration codes, one per table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeCategory {
    Application,
    Domain,
    DataType,
    AverageType,
    MeasurementType,
    RealTime,
    Detection,
    XResolution,
    NumericType,
    WindowType,
    CorrectionMode,
    Weighting,
    Direction,
    Coupling,
    ChannelAttribute,
    ScanType,
    ScanVariableType,
}

impl CodeCategory {
    fn table(self) -> &'static [(i16, &'static str)] {
        match self {
            Self::Application => tables::APPLICATION,
            Self::Domain => tables::DOMAIN,
            Self::DataType => tables::DATA_TYPE,
            Self::AverageType => tables::AVERAGE_TYPE,
            Self::MeasurementType => tables::MEASUREMENT_TYPE,
            Self::RealTime => tables::REAL_TIME,
            Self::Detection => tables::DETECTION,
            Self::XResolution => tables::X_RESOLUTION,
            Self::NumericType => tables::NUMERIC_TYPE,
            Self::WindowType => tables::WINDOW_TYPE,
            Self::CorrectionMode => tables::CORRECTION_MODE,
            Self::Weighting => tables::WEIGHTING,
            Self::Direction => tables::DIRECTION,
            Self::Coupling => tables::COUPLING,
            Self::ChannelAttribute => tables::CHANNEL_ATTRIBUTE,
            Self::ScanType => tables::SCAN_TYPE,
            Self::ScanVariableType => tables::SCAN_VARIABLE_TYPE,
        }
    }
}

impl fmt::Display for CodeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Application => "application",
            Self::Domain => "domain",
            Self::DataType => "data type",
            Self::AverageType => "average type",
            Self::MeasurementType => "measurement type",
            Self::RealTime => "real-time",
            Self::Detection => "detection",
            Self::XResolution => "x resolution",
            Self::NumericType => "numeric type",
            Self::WindowType => "window type",
            Self::CorrectionMode => "correction mode",
            Self::Weighting => "weighting",
            Self::Direction => "direction",
            Self::Coupling => "coupling",
            Self::ChannelAttribute => "channel attribute",
            Self::ScanType => "scan type",
            Self::ScanVariableType => "scan variable type",
        };
        f.write_str(name)
    }
}

/// Look up the label for a header code
///
/// **Public** - main entry point for code resolution
///
/// # Errors
/// * `DecodeError::UnknownCode` - code not in the table for `category`
pub fn lookup(category: CodeCategory, code: i16) -> Result<&'static str, DecodeError> {
    category
        .table()
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, label)| *label)
        .ok_or_else(|| DecodeError::UnknownCode {
            category,
            value: code.to_string(),
        })
}

/// Resolve ASCII header text to a table entry
///
/// Accepts either the integer code or the label itself (case-insensitive).
/// Returns the code together with its canonical label.
pub fn resolve_label(category: CodeCategory, text: &str) -> Result<(i16, &'static str), DecodeError> {
    let text = text.trim();

    if let Ok(code) = text.parse::<i16>() {
        return lookup(category, code).map(|label| (code, label));
    }

    category
        .table()
        .iter()
        .find(|(_, label)| label.eq_ignore_ascii_case(text))
        .copied()
        .ok_or_else(|| DecodeError::UnknownCode {
            category,
            value: text.to_string(),
        })
}

/// Physical axis type of a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Time,
    Frequency,
    Order,
    Other,
}

impl Domain {
    /// Classify a domain code; fails for codes outside the table
    pub fn from_code(code: i16) -> Result<Self, DecodeError> {
        lookup(CodeCategory::Domain, code)?;
        Ok(match code {
            0 => Self::Frequency,
            1 => Self::Time,
            4 => Self::Order,
            _ => Self::Other,
        })
    }

    /// Window corrections only apply to spectral data
    pub fn is_spectral(self) -> bool {
        matches!(self, Self::Frequency | Self::Order)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Time => write!(f, "time"),
            Self::Frequency => write!(f, "frequency"),
            Self::Order => write!(f, "order"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Storage type of an SDF sample or scan variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericType {
    Short,
    Long,
    Float,
    Double,
}

impl NumericType {
    pub fn from_code(code: i16) -> Result<Self, DecodeError> {
        lookup(CodeCategory::NumericType, code)?;
        Ok(match code {
            1 => Self::Short,
            2 => Self::Long,
            3 => Self::Float,
            _ => Self::Double,
        })
    }

    /// Same encoding, separate table (scan variables use capitalised labels)
    pub fn from_scan_code(code: i16) -> Result<Self, DecodeError> {
        lookup(CodeCategory::ScanVariableType, code)?;
        Self::from_code(code)
    }

    /// Width of one element in bytes
    pub fn width(self) -> usize {
        match self {
            Self::Short => 2,
            Self::Long | Self::Float => 4,
            Self::Double => 8,
        }
    }

    pub fn encoding(self) -> NumericEncoding {
        match self {
            Self::Short | Self::Long => NumericEncoding::SignedInt,
            Self::Float | Self::Double => NumericEncoding::Float,
        }
    }
}

/// How raw payload bytes are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericEncoding {
    SignedInt,
    Float,
}

/// Layout of the x axis as declared by the data header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XResolution {
    Linear,
    Logarithmic,
    ArbitraryPerFile,
    ArbitraryPerDataType,
    ArbitraryPerTrace,
}

impl XResolution {
    pub fn from_code(code: i16) -> Result<Self, DecodeError> {
        lookup(CodeCategory::XResolution, code)?;
        Ok(match code {
            0 => Self::Linear,
            1 => Self::Logarithmic,
            2 => Self::ArbitraryPerFile,
            3 => Self::ArbitraryPerDataType,
            _ => Self::ArbitraryPerTrace,
        })
    }

    /// Whether x values live in the X-data record
    pub fn is_explicit(self) -> bool {
        !matches!(self, Self::Linear | Self::Logarithmic)
    }
}

/// Ordering of multi-scan payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    /// All scans of one trace are stored together
    Depth,
    /// All traces of one scan are stored together
    Scan,
}

impl ScanOrder {
    pub fn from_code(code: i16) -> Result<Self, DecodeError> {
        lookup(CodeCategory::ScanType, code)?;
        Ok(if code == 0 { Self::Depth } else { Self::Scan })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_codes() {
        assert_eq!(lookup(CodeCategory::Application, 10).unwrap(), "HP 35670A");
        assert_eq!(lookup(CodeCategory::Domain, 0).unwrap(), "Frequency domain");
        assert_eq!(lookup(CodeCategory::DataType, 2).unwrap(), "Auto-power spectrum");
        assert_eq!(lookup(CodeCategory::AverageType, 0).unwrap(), "None");
        assert_eq!(lookup(CodeCategory::Direction, -1).unwrap(), "-X");
    }

    #[test]
    fn test_lookup_unknown_code_fails() {
        let err = lookup(CodeCategory::Domain, 42).unwrap_err();
        match err {
            DecodeError::UnknownCode { category, value } => {
                assert_eq!(category, CodeCategory::Domain);
                assert_eq!(value, "42");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_data_type_gap_is_unknown() {
        // 67 is not assigned in the documentation
        assert!(lookup(CodeCategory::DataType, 67).is_err());
    }

    #[test]
    fn test_resolve_label_by_code_and_text() {
        assert_eq!(resolve_label(CodeCategory::Domain, "1").unwrap(), (1, "Time domain"));
        assert_eq!(
            resolve_label(CodeCategory::Domain, "frequency DOMAIN").unwrap(),
            (0, "Frequency domain")
        );
        assert!(resolve_label(CodeCategory::Domain, "Wavelet").is_err());
    }

    #[test]
    fn test_domain_classification() {
        assert_eq!(Domain::from_code(0).unwrap(), Domain::Frequency);
        assert_eq!(Domain::from_code(1).unwrap(), Domain::Time);
        assert_eq!(Domain::from_code(4).unwrap(), Domain::Order);
        assert_eq!(Domain::from_code(6).unwrap(), Domain::Other);
        assert!(Domain::from_code(7).is_err());
    }

    #[test]
    fn test_numeric_type_widths() {
        assert_eq!(NumericType::from_code(1).unwrap().width(), 2);
        assert_eq!(NumericType::from_code(2).unwrap().width(), 4);
        assert_eq!(NumericType::from_code(3).unwrap().encoding(), NumericEncoding::Float);
        assert_eq!(NumericType::from_code(4).unwrap().width(), 8);
        assert!(NumericType::from_code(5).is_err());
    }

    #[test]
    fn test_x_resolution_explicit() {
        assert!(!XResolution::from_code(0).unwrap().is_explicit());
        assert!(!XResolution::from_code(1).unwrap().is_explicit());
        assert!(XResolution::from_code(2).unwrap().is_explicit());
        assert!(XResolution::from_code(4).unwrap().is_explicit());
    }
}

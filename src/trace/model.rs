//! Shared data model for both front-ends.
//!
//! `HeaderMetadata` and `TraceVectors` are the intermediate shape produced by
//! the SDF and ASCII readers; `Trace` is the immutable output built from them
//! by the assembler.

use crate::codes::Domain;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Byte order of a binary payload
///
/// SDF fixes big-endian storage, so it is the only order decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    BigEndian,
}

/// How x values are obtained for a trace
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum XAxis {
    /// `x[i] = start + i * increment`
    Linear { start: f64, increment: f64 },
    /// `x[i] = start * ratio^i`
    Logarithmic { start: f64, ratio: f64 },
    /// Stored sample by sample
    Explicit,
}

impl XAxis {
    /// Generate `count` x values, `None` when values are stored explicitly
    pub fn synthesize(&self, count: usize) -> Option<Vec<f64>> {
        match *self {
            XAxis::Linear { start, increment } => {
                Some((0..count).map(|i| start + i as f64 * increment).collect())
            }
            XAxis::Logarithmic { start, ratio } => {
                Some((0..count).map(|i| start * ratio.powi(i as i32)).collect())
            }
            XAxis::Explicit => None,
        }
    }
}

/// Display conversion applied after the linear scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmplitudeConversion {
    #[default]
    Native,
    /// Peak power (Vpk^2) to RMS amplitude: `sqrt(v) / sqrt(2)`
    PeakPowerToRms,
}

impl AmplitudeConversion {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            AmplitudeConversion::Native => value,
            AmplitudeConversion::PeakPowerToRms => value.sqrt() / std::f64::consts::SQRT_2,
        }
    }
}

/// Per-trace metadata produced by a front-end
///
/// Lives only until the trace is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderMetadata {
    pub title: String,
    pub domain: Domain,
    /// Table label of the domain code (e.g. "Frequency domain")
    pub domain_label: String,
    pub data_type: Option<String>,
    pub application: Option<String>,
    pub measured_at: Option<NaiveDateTime>,

    pub x_unit: String,
    pub y_unit: String,
    pub z_unit: Option<String>,

    /// Dependent values are `raw * scale + offset`
    pub scale: f64,
    pub offset: f64,
    pub amplitude: AmplitudeConversion,

    /// Points along x after any index window
    pub x_count: usize,
    /// Rows of a waterfall; 1 for plain traces
    pub scan_count: usize,
    /// Traces in the source this one was taken from
    pub trace_count: usize,
    /// Inclusive sample range kept from each stored block
    pub index_window: Option<(usize, usize)>,

    pub x_axis: XAxis,
    pub is_complex: bool,
    pub byte_order: Option<ByteOrder>,
    pub channels: Vec<String>,
}

impl HeaderMetadata {
    /// Metadata with identity scaling and empty units
    pub fn new(domain: Domain, domain_label: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            domain,
            domain_label: domain_label.into(),
            data_type: None,
            application: None,
            measured_at: None,
            x_unit: String::new(),
            y_unit: String::new(),
            z_unit: None,
            scale: 1.0,
            offset: 0.0,
            amplitude: AmplitudeConversion::Native,
            x_count: 0,
            scan_count: 1,
            trace_count: 1,
            index_window: None,
            x_axis: XAxis::Explicit,
            is_complex: false,
            byte_order: None,
            channels: Vec::new(),
        }
    }

    /// Apply the linear transform and display conversion to one raw value
    pub fn to_physical(&self, raw: f64) -> f64 {
        self.amplitude.apply(raw * self.scale + self.offset)
    }
}

/// Numeric vectors in physical units, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TraceVectors {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Row-major waterfall grid, one row of `x.len()` values per y value
    pub z: Option<Vec<f64>>,
    /// Imaginary part of the dependent vector (y, or z for waterfalls)
    pub imag: Option<Vec<f64>>,
}

/// One decoded measurement
///
/// Built only by the assembler; fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub(crate) title: String,
    pub(crate) domain: Domain,
    pub(crate) domain_label: String,
    pub(crate) data_type: Option<String>,
    pub(crate) x_unit: String,
    pub(crate) y_unit: String,
    pub(crate) z_unit: Option<String>,
    pub(crate) channels: Vec<String>,
    pub(crate) x: Vec<f64>,
    pub(crate) y: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) z: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) imag: Option<Vec<f64>>,
}

impl Trace {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    pub fn domain_label(&self) -> &str {
        &self.domain_label
    }

    pub fn data_type(&self) -> Option<&str> {
        self.data_type.as_deref()
    }

    pub fn x_unit(&self) -> &str {
        &self.x_unit
    }

    pub fn y_unit(&self) -> &str {
        &self.y_unit
    }

    pub fn z_unit(&self) -> Option<&str> {
        self.z_unit.as_deref()
    }

    pub fn channels(&self) -> &[String] {
        &self.channels
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn z(&self) -> Option<&[f64]> {
        self.z.as_deref()
    }

    pub fn imag(&self) -> Option<&[f64]> {
        self.imag.as_deref()
    }

    pub fn is_waterfall(&self) -> bool {
        self.z.is_some()
    }

    /// One waterfall row (all x values at the `index`-th y value)
    pub fn z_row(&self, index: usize) -> Option<&[f64]> {
        let z = self.z.as_deref()?;
        let width = self.x.len();
        let start = index.checked_mul(width)?;
        let end = start.checked_add(width)?;
        z.get(start..end)
    }
}

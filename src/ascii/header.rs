//! `.HDR` file grammar.
//!
//! One `key: value` or `key = value` pair per line. Keys are matched
//! case-insensitively with spaces, underscores and dashes ignored, so
//! `Num Points`, `num_points` and `NUMPOINTS` are the same key.

use crate::codes::{resolve_label, CodeCategory, Domain};
use crate::utils::error::DecodeError;
use log::debug;

/// Parsed contents of a `.HDR` file
#[derive(Debug, Clone, PartialEq)]
pub struct AsciiHeader {
    pub title: String,
    pub application: Option<String>,
    pub domain: Domain,
    pub domain_label: String,
    pub data_type: Option<String>,
    pub x_unit: String,
    pub y_unit: String,
    pub z_unit: Option<String>,
    pub num_points: Option<usize>,
    pub num_scans: Option<usize>,
    pub x_start: Option<f64>,
    pub x_increment: Option<f64>,
    pub scale: f64,
    pub offset: f64,
    pub channels: Vec<String>,
    pub average_type: Option<String>,
    pub window: Option<String>,
}

// Fields collected before the required domain is known
#[derive(Default)]
struct Fields {
    title: Option<String>,
    application: Option<String>,
    domain: Option<(Domain, String)>,
    data_type: Option<String>,
    x_unit: Option<String>,
    y_unit: Option<String>,
    z_unit: Option<String>,
    num_points: Option<usize>,
    num_scans: Option<usize>,
    x_start: Option<f64>,
    x_increment: Option<f64>,
    scale: Option<f64>,
    offset: Option<f64>,
    channels: Vec<String>,
    average_type: Option<String>,
    window: Option<String>,
}

/// Parse a `.HDR` file
///
/// **Public** - used by `decode_ascii`
///
/// # Errors
/// * `DecodeError::MalformedHeader` - line without a separator, bad number,
///   or missing `domain`
/// * `DecodeError::UnknownCode` - a code-valued key names an unknown entry
pub fn parse_header(text: &str) -> Result<AsciiHeader, DecodeError> {
    let mut fields = Fields::default();

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let (key, value) = split_line(line).ok_or_else(|| {
            DecodeError::MalformedHeader(format!(
                "header line {}: expected 'key: value' or 'key = value', found '{}'",
                line_no, line
            ))
        })?;

        apply_field(&mut fields, &normalize_key(key), value, line_no)?;
    }

    let (domain, domain_label) = fields
        .domain
        .ok_or_else(|| DecodeError::MalformedHeader("header has no 'domain' entry".to_string()))?;

    Ok(AsciiHeader {
        title: fields.title.unwrap_or_default(),
        application: fields.application,
        domain,
        domain_label,
        data_type: fields.data_type,
        x_unit: fields.x_unit.unwrap_or_default(),
        y_unit: fields.y_unit.unwrap_or_default(),
        z_unit: fields.z_unit,
        num_points: fields.num_points,
        num_scans: fields.num_scans,
        x_start: fields.x_start,
        x_increment: fields.x_increment,
        scale: fields.scale.unwrap_or(1.0),
        offset: fields.offset.unwrap_or(0.0),
        channels: fields.channels,
        average_type: fields.average_type,
        window: fields.window,
    })
}

// The first ':' or '=' separates key from value
fn split_line(line: &str) -> Option<(&str, &str)> {
    let pos = line.find([':', '='])?;
    Some((line[..pos].trim(), line[pos + 1..].trim()))
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn apply_field(fields: &mut Fields, key: &str, value: &str, line_no: usize) -> Result<(), DecodeError> {
    match key {
        "title" => fields.title = Some(value.to_string()),
        "application" => {
            fields.application = Some(resolve_label(CodeCategory::Application, value)?.1.to_string())
        }
        "domain" => {
            let (code, label) = resolve_label(CodeCategory::Domain, value)?;
            fields.domain = Some((Domain::from_code(code)?, label.to_string()));
        }
        "datatype" => {
            fields.data_type = Some(resolve_label(CodeCategory::DataType, value)?.1.to_string())
        }
        "xunit" => fields.x_unit = Some(value.to_string()),
        "yunit" => fields.y_unit = Some(value.to_string()),
        "zunit" => fields.z_unit = Some(value.to_string()),
        "numpoints" => fields.num_points = Some(parse_number(key, value, line_no)?),
        "numscans" => fields.num_scans = Some(parse_number(key, value, line_no)?),
        "xstart" => fields.x_start = Some(parse_number(key, value, line_no)?),
        "xincrement" => fields.x_increment = Some(parse_number(key, value, line_no)?),
        "scale" => fields.scale = Some(parse_number(key, value, line_no)?),
        "offset" => fields.offset = Some(parse_number(key, value, line_no)?),
        "channels" => {
            fields.channels = value
                .split(',')
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from)
                .collect()
        }
        "averagetype" => {
            fields.average_type = Some(resolve_label(CodeCategory::AverageType, value)?.1.to_string())
        }
        "window" => {
            fields.window = Some(resolve_label(CodeCategory::WindowType, value)?.1.to_string())
        }
        _ => debug!("Ignoring unknown header key '{}' on line {}", key, line_no),
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str, line_no: usize) -> Result<T, DecodeError> {
    value.parse().map_err(|_| {
        DecodeError::MalformedHeader(format!(
            "header line {}: '{}' is not a valid value for {}",
            line_no, value, key
        ))
    })
}

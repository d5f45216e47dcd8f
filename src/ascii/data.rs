//! Numeric data files (`.TXT`, `.X`, `.Z`).

use crate::utils::error::DecodeError;

/// Parse whitespace- or line-delimited numbers
///
/// Blank lines and lines starting with `#` are skipped.
///
/// # Errors
/// * `DecodeError::MalformedData` - first token that is not a number, with
///   its 1-based line
pub fn parse_values(text: &str, file: &str) -> Result<Vec<f64>, DecodeError> {
    let mut values = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for token in line.split_whitespace() {
            let value = token.parse::<f64>().map_err(|_| DecodeError::MalformedData {
                file: file.to_string(),
                line: index + 1,
                token: token.to_string(),
            })?;
            values.push(value);
        }
    }

    Ok(values)
}

//! Big-endian field access within one SDF record.
//!
//! Offsets passed to the field readers are relative to the start of the
//! record (the record type field), matching the SDF documentation tables.

use crate::utils::config::RECORD_PREAMBLE_SIZE;
use crate::utils::error::DecodeError;
use log::debug;

/// A bounds-checked view of one record inside the file buffer
#[derive(Debug, Clone, Copy)]
pub struct RecordReader<'a> {
    buf: &'a [u8],
    base: usize,
    size: usize,
    name: &'static str,
}

impl<'a> RecordReader<'a> {
    /// Open the record starting at `offset`
    ///
    /// Checks the record type, that the declared size is at least
    /// `min_size`, and that the whole record lies inside the buffer.
    ///
    /// # Errors
    /// * `DecodeError::TruncatedInput` - record preamble or body past the end
    /// * `DecodeError::MalformedHeader` - wrong record type or undersized record
    pub fn open(
        buf: &'a [u8],
        offset: usize,
        expected_type: i16,
        min_size: usize,
        name: &'static str,
    ) -> Result<Self, DecodeError> {
        let (record_type, record_size) = read_preamble(buf, offset, name)?;

        if record_type != expected_type {
            return Err(DecodeError::MalformedHeader(format!(
                "expected {} record (type {}) at offset {}, found type {}",
                name, expected_type, offset, record_type
            )));
        }

        let size = usize::try_from(record_size)
            .ok()
            .filter(|size| *size >= min_size.max(RECORD_PREAMBLE_SIZE))
            .ok_or_else(|| {
                DecodeError::MalformedHeader(format!(
                    "{} record at offset {} declares size {}, minimum is {}",
                    name, offset, record_size, min_size
                ))
            })?;

        let end = offset
            .checked_add(size)
            .filter(|end| *end <= buf.len())
            .ok_or_else(|| DecodeError::truncated(name, offset, size, buf.len()))?;

        debug!("Opened {} record at {}..{}", name, offset, end);

        Ok(Self {
            buf,
            base: offset,
            size,
            name,
        })
    }

    /// Absolute offset of the record in the file
    pub fn offset(&self) -> usize {
        self.base
    }

    /// Declared record size, preamble included
    pub fn size(&self) -> usize {
        self.size
    }

    /// Absolute offset of the first byte after the record
    pub fn end(&self) -> usize {
        self.base + self.size
    }

    /// Raw bytes of a field
    pub fn bytes(&self, rel: usize, len: usize) -> Result<&'a [u8], DecodeError> {
        let in_record = rel.checked_add(len).is_some_and(|end| end <= self.size);
        if !in_record {
            return Err(DecodeError::truncated(self.name, self.base + rel, len, self.end()));
        }
        let start = self.base + rel;
        Ok(&self.buf[start..start + len])
    }

    fn array<const N: usize>(&self, rel: usize) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(rel, N)?);
        Ok(out)
    }

    pub fn i8(&self, rel: usize) -> Result<i8, DecodeError> {
        Ok(i8::from_be_bytes(self.array(rel)?))
    }

    pub fn i16(&self, rel: usize) -> Result<i16, DecodeError> {
        Ok(i16::from_be_bytes(self.array(rel)?))
    }

    pub fn i32(&self, rel: usize) -> Result<i32, DecodeError> {
        Ok(i32::from_be_bytes(self.array(rel)?))
    }

    pub fn f32(&self, rel: usize) -> Result<f32, DecodeError> {
        Ok(f32::from_be_bytes(self.array(rel)?))
    }

    pub fn f64(&self, rel: usize) -> Result<f64, DecodeError> {
        Ok(f64::from_be_bytes(self.array(rel)?))
    }

    /// 16-bit boolean flag (non-zero is true)
    pub fn flag(&self, rel: usize) -> Result<bool, DecodeError> {
        Ok(self.i16(rel)? != 0)
    }

    /// Fixed-width text field, cut at the first NUL
    pub fn string(&self, rel: usize, len: usize) -> Result<String, DecodeError> {
        let raw = self.bytes(rel, len)?;
        let text = raw.split(|b| *b == 0).next().unwrap_or_default();
        Ok(String::from_utf8_lossy(text).trim_end().to_string())
    }
}

/// Read the type and size fields of the record at `offset`
pub fn read_preamble(buf: &[u8], offset: usize, name: &str) -> Result<(i16, i32), DecodeError> {
    let preamble = offset
        .checked_add(RECORD_PREAMBLE_SIZE)
        .and_then(|end| buf.get(offset..end))
        .ok_or_else(|| DecodeError::truncated(name, offset, RECORD_PREAMBLE_SIZE, buf.len()))?;

    let record_type = i16::from_be_bytes([preamble[0], preamble[1]]);
    let record_size = i32::from_be_bytes([preamble[2], preamble[3], preamble[4], preamble[5]]);
    Ok((record_type, record_size))
}

/// Record type at `offset`, if a full preamble is present
pub fn peek_record_type(buf: &[u8], offset: usize) -> Option<i16> {
    read_preamble(buf, offset, "record").ok().map(|(t, _)| t)
}

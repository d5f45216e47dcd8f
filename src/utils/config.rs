//! Format constants and output configuration.

/// Current output schema version for exported trace documents
pub const SCHEMA_VERSION: &str = "1.0.0";

// SDF files open with an ASCII 'B' followed by a NUL byte
pub const SDF_FILE_IDENTIFIER: &[u8; 2] = b"B\0";

/// The only SDF revision whose record layout is decoded
pub const SUPPORTED_SDF_REVISION: i16 = 2;

// Record type codes found in the first two bytes of every SDF record
pub const FILE_HDR_RECORD_TYPE: i16 = 10;
pub const MEAS_HDR_RECORD_TYPE: i16 = 11;
pub const DATA_HDR_RECORD_TYPE: i16 = 12;
pub const VECTOR_HDR_RECORD_TYPE: i16 = 13;
pub const CHANNEL_HDR_RECORD_TYPE: i16 = 14;
pub const SCAN_STRUCT_RECORD_TYPE: i16 = 15;
pub const XDATA_RECORD_TYPE: i16 = 16;
pub const YDATA_RECORD_TYPE: i16 = 17;
pub const SCAN_VAR_RECORD_TYPE: i16 = 19;

/// Every record starts with a type (i16) and a size (i32)
pub const RECORD_PREAMBLE_SIZE: usize = 6;

// Minimum record sizes for revision 2 (records may be longer, never shorter)
pub const FILE_HDR_MIN_SIZE: usize = 64;
pub const MEAS_HDR_MIN_SIZE: usize = 140;
pub const DATA_HDR_MIN_SIZE: usize = 134;
pub const VECTOR_HDR_MIN_SIZE: usize = 18;
pub const CHANNEL_HDR_MIN_SIZE: usize = 192;
pub const SCAN_STRUCT_MIN_SIZE: usize = 36;

/// Encoded size of an SDF unit block (label, factor, eight exponents)
pub const UNIT_BLOCK_SIZE: usize = 22;

/// Channel power exponents are stored multiplied by this factor
pub const CHANNEL_POWER_DIVISOR: f64 = 48.0;

/// Application whose power spectra are converted from peak power to RMS
pub const PEAK_POWER_APPLICATION: &str = "HP 35670A";

// Companion file extensions of a DSA ASCII export
pub const ASCII_HEADER_EXT: &str = "HDR";
pub const ASCII_Y_EXT: &str = "TXT";
pub const ASCII_X_EXT: &str = "X";
pub const ASCII_Z_EXT: &str = "Z";

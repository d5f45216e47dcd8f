//! Synthetic SDF file builder shared by the integration tests.
//!
//! Lays out the records back to back in the order a DSA writes them:
//! identifier, file header, measurement header, data headers, vector
//! headers, channel headers, scan structure (+ scan variable), X data, Y data.

#![allow(dead_code)]

pub const FILE_HDR_SIZE: usize = 64;
pub const MEAS_HDR_SIZE: usize = 140;
pub const DATA_HDR_SIZE: usize = 134;
pub const VECTOR_HDR_SIZE: usize = 18;
pub const CHANNEL_HDR_SIZE: usize = 192;
pub const SCAN_STRUCT_SIZE: usize = 36;

#[derive(Debug, Clone)]
pub struct DataSpec {
    pub title: String,
    pub domain: i16,
    pub data_type: i16,
    pub num_points: i16,
    pub x_resolution: i16,
    pub x_data_type: i16,
    pub y_data_type: i16,
    pub y_per_point: i16,
    pub complex: bool,
    pub power: bool,
    pub first_vector: i32,
    pub rows: i16,
    pub cols: i16,
    pub x_unit: String,
    pub y_unit: String,
    pub first_x: f64,
    pub delta_x: f64,
    /// Scan membership flag; `None` follows whether the file has a scan structure
    pub scan_data: Option<bool>,
}

impl Default for DataSpec {
    fn default() -> Self {
        Self {
            title: "Spectrum".to_string(),
            domain: 0,
            data_type: 1,
            num_points: 4,
            x_resolution: 0,
            x_data_type: 3,
            y_data_type: 3,
            y_per_point: 1,
            complex: false,
            power: false,
            first_vector: 0,
            rows: 1,
            cols: 1,
            x_unit: "Hz".to_string(),
            y_unit: "V".to_string(),
            first_x: 0.0,
            delta_x: 12.5,
            scan_data: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VectorSpec {
    pub channels: [i16; 2],
    pub powers: [i16; 2],
}

impl Default for VectorSpec {
    fn default() -> Self {
        Self {
            channels: [0, -1],
            powers: [48, 0],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChannelSpec {
    pub label: String,
    pub int_to_eng: f32,
    pub narrow_band: f32,
}

impl Default for ChannelSpec {
    fn default() -> Self {
        Self {
            label: "Chan 1".to_string(),
            int_to_eng: 1.0,
            narrow_band: 1.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanSpec {
    pub num_scans: i16,
    /// 0 = Depth, 1 = Scan
    pub scan_type: i16,
    pub var_type: i16,
    pub unit: String,
    pub values: Option<Vec<f64>>,
}

#[derive(Debug, Clone)]
pub struct SdfBuilder {
    pub application: i16,
    pub revision: i16,
    pub timestamp: (i16, i16, i16),
    pub meas_title: String,
    pub freq_window: (i16, i16),
    pub data: Vec<DataSpec>,
    pub vectors: Vec<VectorSpec>,
    pub channels: Vec<ChannelSpec>,
    pub scan: Option<ScanSpec>,
    pub xdata: Option<Vec<u8>>,
    pub ydata: Option<Vec<u8>>,
}

impl Default for SdfBuilder {
    fn default() -> Self {
        Self {
            application: 2,
            revision: 2,
            timestamp: (2013, 213, 908),
            meas_title: "Measurement".to_string(),
            freq_window: (0, -1),
            data: vec![DataSpec::default()],
            vectors: vec![VectorSpec::default()],
            channels: vec![ChannelSpec::default()],
            scan: None,
            xdata: None,
            ydata: Some(f32_block(&[0.5, 1.0, 1.5, 2.0])),
        }
    }
}

/// Offsets of each record group inside a built file
#[derive(Debug, Clone, Copy)]
pub struct Offsets {
    pub file: usize,
    pub meas: usize,
    pub data: usize,
    pub vectors: usize,
    pub channels: usize,
    pub scan: usize,
    pub xdata: usize,
    pub ydata: usize,
}

impl SdfBuilder {
    pub fn offsets(&self) -> Offsets {
        let file = 2;
        let meas = file + FILE_HDR_SIZE;
        let data = meas + MEAS_HDR_SIZE;
        let vectors = data + DATA_HDR_SIZE * self.data.len();
        let channels = vectors + VECTOR_HDR_SIZE * self.vectors.len();
        let scan = channels + CHANNEL_HDR_SIZE * self.channels.len();
        let scan_len = self.scan.as_ref().map_or(0, |s| {
            SCAN_STRUCT_SIZE
                + s.values
                    .as_ref()
                    .map_or(0, |v| 6 + v.len() * var_width(s.var_type))
        });
        let xdata = scan + scan_len;
        let ydata = xdata + self.xdata.as_ref().map_or(0, |x| 6 + x.len());
        Offsets {
            file,
            meas,
            data,
            vectors,
            channels,
            scan,
            xdata,
            ydata,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let off = self.offsets();
        let mut out = b"B\0".to_vec();

        out.extend(self.file_header(&off));
        out.extend(self.meas_header());
        for data in &self.data {
            out.extend(data_header(data, data.scan_data.unwrap_or(self.scan.is_some())));
        }
        for vector in &self.vectors {
            out.extend(vector_header(vector));
        }
        for channel in &self.channels {
            out.extend(channel_header(channel));
        }
        if let Some(scan) = &self.scan {
            out.extend(scan_struct(scan));
            if let Some(values) = &scan.values {
                let mut rec = record(19, 6 + values.len() * var_width(scan.var_type));
                for (i, v) in values.iter().enumerate() {
                    put_scan_value(&mut rec, 6 + i * var_width(scan.var_type), scan.var_type, *v);
                }
                out.extend(rec);
            }
        }
        if let Some(x) = &self.xdata {
            out.extend(data_record(16, x));
        }
        if let Some(y) = &self.ydata {
            out.extend(data_record(17, y));
        }
        out
    }

    fn file_header(&self, off: &Offsets) -> Vec<u8> {
        let mut r = record(10, FILE_HDR_SIZE);
        put_i16(&mut r, 6, self.revision);
        put_i16(&mut r, 8, self.application);
        put_i16(&mut r, 10, self.timestamp.0);
        put_i16(&mut r, 12, self.timestamp.1);
        put_i16(&mut r, 14, self.timestamp.2);
        put_str(&mut r, 16, 8, "A.01.00");
        put_i16(&mut r, 24, self.data.len() as i16);
        put_i16(&mut r, 26, self.vectors.len() as i16);
        put_i16(&mut r, 28, self.channels.len() as i16);
        put_i16(&mut r, 30, 0);
        put_i16(&mut r, 32, i16::from(self.scan.is_some()));
        put_i16(&mut r, 34, i16::from(self.xdata.is_some()));
        put_i32(&mut r, 36, off.data as i32);
        put_i32(&mut r, 40, off.vectors as i32);
        put_i32(&mut r, 44, off.channels as i32);
        put_i32(&mut r, 48, -1);
        put_i32(&mut r, 52, if self.scan.is_some() { off.scan as i32 } else { -1 });
        put_i32(&mut r, 56, if self.xdata.is_some() { off.xdata as i32 } else { -1 });
        put_i32(&mut r, 60, if self.ydata.is_some() { off.ydata as i32 } else { -1 });
        r
    }

    fn meas_header(&self) -> Vec<u8> {
        let mut r = record(11, MEAS_HDR_SIZE);
        put_i32(&mut r, 6, -1);
        put_i32(&mut r, 18, 1024);
        put_i16(&mut r, 24, self.freq_window.0);
        put_i16(&mut r, 26, self.freq_window.1);
        put_i32(&mut r, 30, 1);
        put_str(&mut r, 38, 60, &self.meas_title);
        put_f64(&mut r, 102, 1600.0);
        put_f64(&mut r, 110, 3200.0);
        r
    }
}

fn data_header(d: &DataSpec, scan_data: bool) -> Vec<u8> {
    let mut r = record(12, DATA_HDR_SIZE);
    put_i32(&mut r, 6, -1);
    put_str(&mut r, 10, 16, &d.title);
    put_i16(&mut r, 26, d.domain);
    put_i16(&mut r, 28, d.data_type);
    put_i16(&mut r, 30, d.num_points);
    put_i16(&mut r, 32, d.num_points - 1);
    put_i16(&mut r, 42, d.x_resolution);
    put_i16(&mut r, 44, d.x_data_type);
    put_i16(&mut r, 46, 1);
    put_i16(&mut r, 48, d.y_data_type);
    put_i16(&mut r, 50, d.y_per_point);
    put_i16(&mut r, 52, i16::from(d.complex));
    put_i16(&mut r, 56, i16::from(d.power));
    put_i16(&mut r, 58, 1);
    put_i32(&mut r, 60, d.first_vector);
    put_i16(&mut r, 64, d.rows);
    put_i16(&mut r, 66, d.cols);
    put_unit(&mut r, 68, &d.x_unit);
    put_i16(&mut r, 90, 1);
    put_unit(&mut r, 92, &d.y_unit);
    put_f64(&mut r, 114, d.first_x);
    put_f64(&mut r, 122, d.delta_x);
    put_i16(&mut r, 130, i16::from(scan_data));
    r
}

fn vector_header(v: &VectorSpec) -> Vec<u8> {
    let mut r = record(13, VECTOR_HDR_SIZE);
    put_i32(&mut r, 6, -1);
    put_i16(&mut r, 10, v.channels[0]);
    put_i16(&mut r, 12, v.channels[1]);
    put_i16(&mut r, 14, v.powers[0]);
    put_i16(&mut r, 16, v.powers[1]);
    r
}

fn channel_header(c: &ChannelSpec) -> Vec<u8> {
    let mut r = record(14, CHANNEL_HDR_SIZE);
    put_i32(&mut r, 6, -1);
    put_str(&mut r, 10, 30, &c.label);
    put_i16(&mut r, 64, 1);
    put_i16(&mut r, 66, 1);
    put_f32(&mut r, 84, c.narrow_band);
    put_i16(&mut r, 98, 1);
    put_str(&mut r, 106, 10, "V");
    put_unit(&mut r, 116, "V");
    put_f32(&mut r, 138, c.int_to_eng);
    put_f32(&mut r, 142, 1.0e6);
    put_f64(&mut r, 152, 1.0);
    r
}

fn scan_struct(s: &ScanSpec) -> Vec<u8> {
    let mut r = record(15, SCAN_STRUCT_SIZE);
    put_i16(&mut r, 6, s.num_scans);
    put_i16(&mut r, 8, s.num_scans - 1);
    put_i16(&mut r, 10, s.scan_type);
    put_i16(&mut r, 12, s.var_type);
    put_unit(&mut r, 14, &s.unit);
    r
}

fn data_record(record_type: i16, payload: &[u8]) -> Vec<u8> {
    let mut r = record(record_type, 6 + payload.len());
    r[6..].copy_from_slice(payload);
    r
}

fn record(record_type: i16, size: usize) -> Vec<u8> {
    let mut r = vec![0u8; size];
    put_i16(&mut r, 0, record_type);
    put_i32(&mut r, 2, size as i32);
    r
}

fn var_width(var_type: i16) -> usize {
    match var_type {
        1 => 2,
        2 | 3 => 4,
        _ => 8,
    }
}

fn put_scan_value(r: &mut [u8], at: usize, var_type: i16, v: f64) {
    match var_type {
        1 => put_i16(r, at, v as i16),
        2 => put_i32(r, at, v as i32),
        3 => put_f32(r, at, v as f32),
        _ => put_f64(r, at, v),
    }
}

pub fn put_i16(r: &mut [u8], at: usize, v: i16) {
    r[at..at + 2].copy_from_slice(&v.to_be_bytes());
}

pub fn put_i32(r: &mut [u8], at: usize, v: i32) {
    r[at..at + 4].copy_from_slice(&v.to_be_bytes());
}

pub fn put_f32(r: &mut [u8], at: usize, v: f32) {
    r[at..at + 4].copy_from_slice(&v.to_be_bytes());
}

pub fn put_f64(r: &mut [u8], at: usize, v: f64) {
    r[at..at + 8].copy_from_slice(&v.to_be_bytes());
}

fn put_str(r: &mut [u8], at: usize, len: usize, s: &str) {
    let bytes = s.as_bytes();
    let n = bytes.len().min(len);
    r[at..at + n].copy_from_slice(&bytes[..n]);
}

fn put_unit(r: &mut [u8], at: usize, label: &str) {
    put_str(r, at, 10, label);
    put_f32(r, at + 10, 1.0);
}

pub fn f32_block(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

pub fn f64_block(values: &[f64]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

pub fn i16_block(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_be_bytes()).collect()
}

//! Static code tables from the SDF documentation (Appendix B).
//!
//! Each table maps the signed 16-bit code stored in a header field to its
//! documented label. Labels are matched verbatim by the ASCII reader.

pub(crate) const APPLICATION: &[(i16, &str)] = &[
    (-1, "HP VISTA"),
    (-2, "HP SINE"),
    (-3, "HP 35660A"),
    (-4, "HP 3562A, HP 3563A"),
    (-5, "HP 3588A"),
    (-6, "HP 3589A"),
    (-99, "Unknown"),
    (1, "HP 3566A, HP 3567A"),
    (2, "HP 35665A"),
    (3, "HP 3560A"),
    (4, "HP 89410A, HP 89440A"),
    (7, "HP 35635R"),
    (8, "HP 35654A-S1A"),
    (9, "HP 3569A"),
    (10, "HP 35670A"),
    (11, "HP 3587S"),
];

pub(crate) const DOMAIN: &[(i16, &str)] = &[
    (-99, "Unknown"),
    (0, "Frequency domain"),
    (1, "Time domain"),
    (2, "Amplitude domain"),
    (3, "RPM"),
    (4, "Order"),
    (5, "Channel"),
    (6, "Octave"),
];

pub(crate) const DATA_TYPE: &[(i16, &str)] = &[
    (-99, "Unknown"),
    (0, "Time"),
    (1, "Linear spectrum"),
    (2, "Auto-power spectrum"),
    (3, "Cross-power spectrum"),
    (4, "Frequency response"),
    (5, "Auto-correlation"),
    (6, "Cross-correlation"),
    (7, "Impulse response"),
    (8, "Ordinary coherence"),
    (9, "Partial coherence"),
    (10, "Multiple coherence"),
    (11, "Full octave"),
    (12, "Third octave"),
    (13, "Convolution"),
    (14, "Histogram"),
    (15, "Probability density function"),
    (16, "Cumulative density function"),
    (17, "Power spectrum order tracking"),
    (18, "Composite power tracking"),
    (19, "Phase order tracking"),
    (20, "RPM spectral"),
    (21, "Order ratio"),
    (22, "Orbit"),
    (23, "HP 35650 series calibration"),
    (24, "Sine rms pwr data"),
    (25, "Sine variance data"),
    (26, "Sine range data"),
    (27, "Sine settle time data"),
    (28, "Sine integ time data"),
    (29, "Sine source data"),
    (30, "Sine overload data"),
    (31, "Sine linear data"),
    (32, "Synthesis"),
    (33, "Curve fit weighting function"),
    (34, "Frequency corrections (for capture)"),
    (35, "All pass time data"),
    (36, "Norm reference data"),
    (37, "Tachometer data"),
    (38, "Limit line data"),
    (39, "Twelfth octave data"),
    (40, "S11 data"),
    (41, "S21 data"),
    (42, "S12 data"),
    (43, "S22 data"),
    (44, "PSD data"),
    (45, "Decimated time data"),
    (46, "Overload data"),
    (47, "Compressed time data"),
    (48, "External trigger data"),
    (49, "Pressure data"),
    (50, "Intensity data"),
    (51, "PI index data"),
    (52, "Velocity data"),
    (53, "PV index data"),
    (54, "Sound power data"),
    (55, "Field indicator data"),
    (56, "Partial power data"),
    (57, "Ln 1 data"),
    (58, "Ln 10 data"),
    (59, "Ln 50 data"),
    (60, "Ln 90 data"),
    (61, "Ln 99 data"),
    (62, "Ln user data"),
    (63, "T20 data"),
    (64, "T30 data"),
    (65, "RT60 data"),
    (66, "Average count data"),
    (68, "IQ measured time"),
    (69, "IQ measured spectrum"),
    (70, "IQ reference time"),
    (71, "IQ reference spectrum"),
    (72, "IQ error magnitude"),
    (73, "IQ error phase"),
    (74, "IQ error vector time"),
    (75, "IQ error vector spectrum"),
    (76, "Symbol table data"),
];

pub(crate) const AVERAGE_TYPE: &[(i16, &str)] = &[
    (0, "None"),
    (1, "RMS"),
    (2, "RMS Exponential"),
    (3, "Vector"),
    (4, "Vector Exponential"),
    (5, "Continuous Peak Hold"),
    (6, "Peak"),
];

pub(crate) const MEASUREMENT_TYPE: &[(i16, &str)] = &[
    (-99, "Unknown measurement"),
    (0, "Spectrum measurement"),
    (1, "Network measurement"),
    (2, "Swept measurement"),
    (3, "FFT measurement"),
    (4, "Orders measurement"),
    (5, "Octave measurement"),
    (6, "Capture measurement"),
    (7, "Correlation measurement"),
    (8, "Histogram measurement"),
    (9, "Swept network measurement"),
    (10, "FFT network measurement"),
];

pub(crate) const REAL_TIME: &[(i16, &str)] = &[(0, "Not continuous"), (1, "Continuous")];

pub(crate) const DETECTION: &[(i16, &str)] = &[
    (-99, "Unknown detection type"),
    (0, "Sample detection"),
    (1, "Positive peak detection"),
    (2, "Negative peak detection"),
    (3, "Rose-and-fell detection"),
];

pub(crate) const X_RESOLUTION: &[(i16, &str)] = &[
    (0, "Linear"),
    (1, "Logarithmic"),
    (2, "Arbitrary, one per file"),
    (3, "Arbitrary, one per data type"),
    (4, "Arbitrary, one per trace"),
];

pub(crate) const NUMERIC_TYPE: &[(i16, &str)] = &[
    (1, "short"),
    (2, "long"),
    (3, "float"),
    (4, "double"),
];

pub(crate) const WINDOW_TYPE: &[(i16, &str)] = &[
    (0, "Window not applied"),
    (1, "Hanning"),
    (2, "Flat Top"),
    (3, "Uniform"),
    (4, "Force"),
    (5, "Response"),
    (6, "user-defined"),
    (7, "Hamming"),
    (8, "P301"),
    (9, "P310"),
    (10, "Kaiser-Bessel"),
    (11, "Harris"),
    (12, "Blackman"),
    (13, "Resolution filter"),
    (14, "Correlation Lead Lag"),
    (15, "Correlation Lag"),
    (16, "Gated"),
    (17, "P400"),
];

pub(crate) const CORRECTION_MODE: &[(i16, &str)] = &[
    (0, "Correction not applied"),
    (1, "Narrow band correction applied"),
    (2, "Wide band correction applied"),
];

pub(crate) const WEIGHTING: &[(i16, &str)] = &[
    (0, "No weighting"),
    (1, "A-weighting"),
    (2, "B-weighting"),
    (3, "C-weighting"),
];

pub(crate) const DIRECTION: &[(i16, &str)] = &[
    (-9, "-TZ"),
    (-8, "-TY"),
    (-7, "-TX"),
    (-3, "-Z"),
    (-2, "-Y"),
    (-1, "-X"),
    (0, "No direction specified"),
    (1, "X"),
    (2, "Y"),
    (3, "Z"),
    (4, "Radial"),
    (5, "Tangential, theta angle"),
    (6, "Tangential, phi angle"),
    (7, "TX"),
    (8, "TY"),
    (9, "TZ"),
];

pub(crate) const COUPLING: &[(i16, &str)] = &[(0, "DC"), (1, "AC")];

pub(crate) const CHANNEL_ATTRIBUTE: &[(i16, &str)] = &[
    (-99, "Unknown attribute"),
    (0, "No attribute"),
    (1, "Tach attribute"),
    (2, "Reference attribute"),
    (3, "Tach and reference attribute"),
    (4, "Clockwise attribute"),
];

// The 35670A has been seen writing 1 for depth-ordered files; the
// documented assignment is used.
pub(crate) const SCAN_TYPE: &[(i16, &str)] = &[(0, "Depth"), (1, "Scan")];

pub(crate) const SCAN_VARIABLE_TYPE: &[(i16, &str)] = &[
    (1, "Short"),
    (2, "Long"),
    (3, "Float"),
    (4, "Double"),
];

//! Decode command implementation.
//!
//! The `sdf` and `ascii` commands:
//! 1. Read the source file(s)
//! 2. Decode and assemble the traces
//! 3. Write the JSON outputs (and optional summary)

use crate::output::{write_header, write_traces, TraceDocument};
use crate::trace::Trace;
use crate::utils::config::ASCII_HEADER_EXT;
use crate::{ascii, decode_sdf_with_header, read_ascii_files};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Which front-end reads the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// Single binary SDF file
    Sdf,
    /// `<base>.HDR` / `.TXT` / `.X` (/ `.Z`) set
    Ascii,
}

/// Arguments for the decode commands
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct DecodeArgs {
    pub source: SourceKind,

    /// SDF file, or ASCII base name without extension
    pub input: PathBuf,

    /// Output path for the JSON trace document
    pub output_json: PathBuf,

    /// Output path for the JSON header dump (SDF only)
    pub output_header: Option<PathBuf>,

    /// Print text summary to stdout
    pub print_summary: bool,
}

impl Default for DecodeArgs {
    fn default() -> Self {
        Self {
            source: SourceKind::Sdf,
            input: PathBuf::new(),
            output_json: PathBuf::from("traces.json"),
            output_header: None,
            print_summary: false,
        }
    }
}

/// Execute a decode command
///
/// **Public** - main entry point called from main.rs
///
/// # Arguments
/// * `args` - Decode command arguments
///
/// # Returns
/// Number of traces written
///
/// # Errors
/// * Source read failures
/// * Any `DecodeError` from the front-end
/// * File write errors
pub fn execute_decode(args: DecodeArgs) -> Result<usize> {
    let start_time = Instant::now();

    info!("Decoding {:?} source: {}", args.source, args.input.display());

    let traces = match args.source {
        SourceKind::Sdf => {
            info!("Step 1/3: Reading SDF file...");
            let bytes = std::fs::read(&args.input)
                .with_context(|| format!("Failed to read {}", args.input.display()))?;
            debug!("Read {} bytes", bytes.len());

            info!("Step 2/3: Decoding header and payload...");
            let (header, traces) = decode_sdf_with_header(&bytes)
                .with_context(|| format!("Failed to decode SDF file {}", args.input.display()))?;

            if let Some(header_path) = &args.output_header {
                write_header(&header, header_path).context("Failed to write header JSON")?;
                info!("✓ Header written to: {}", header_path.display());
            }
            traces
        }
        SourceKind::Ascii => {
            info!("Step 1/3: Reading ASCII export...");
            info!("Step 2/3: Decoding header and data files...");
            let trace = read_ascii_files(&args.input).with_context(|| {
                format!("Failed to decode ASCII export {}", args.input.display())
            })?;
            vec![trace]
        }
    };

    info!("Step 3/3: Writing output files...");
    let count = traces.len();
    let document = TraceDocument::new(args.input.display().to_string(), traces);

    write_traces(&document, &args.output_json).context("Failed to write trace JSON")?;
    info!("✓ {} traces written to: {}", count, args.output_json.display());

    if args.print_summary {
        println!("\n{}", "=".repeat(80));
        println!("TRACE SUMMARY");
        println!("{}", "=".repeat(80));
        println!("Source: {}", document.source);
        println!("Traces: {}", count);
        for (i, trace) in document.traces.iter().enumerate() {
            println!("{}", summarize(i, trace));
        }
        println!("{}", "=".repeat(80));
    }

    let elapsed = start_time.elapsed();
    info!("Decode completed in {:.2}s", elapsed.as_secs_f64());

    Ok(count)
}

/// One summary line per trace
///
/// **Public** - also used by the validate command
pub fn summarize(index: usize, trace: &Trace) -> String {
    let shape = match trace.z() {
        Some(_) => format!("{} x {} waterfall", trace.x().len(), trace.y().len()),
        None => format!("{} points", trace.x().len()),
    };
    let x_range = match (trace.x().first(), trace.x().last()) {
        (Some(first), Some(last)) => format!("{} .. {} {}", first, last, trace.x_unit()),
        _ => "empty".to_string(),
    };
    format!(
        "  {}. {} [{}] {}, x: {}",
        index + 1,
        trace.title(),
        trace.domain_label(),
        shape,
        x_range
    )
}

/// Validate decode arguments
///
/// **Public** - can be called before execute_decode for early validation
///
/// # Arguments
/// * `args` - Arguments to validate
///
/// # Returns
/// Ok if arguments are valid, Err with message if not
pub fn validate_args(args: &DecodeArgs) -> Result<()> {
    if args.input.as_os_str().is_empty() {
        anyhow::bail!("Input path cannot be empty");
    }

    match args.source {
        SourceKind::Sdf => {
            if !args.input.is_file() {
                anyhow::bail!("SDF file not found: {}", args.input.display());
            }
        }
        SourceKind::Ascii => {
            let header = ascii::companion_path(&args.input, ASCII_HEADER_EXT);
            if !header.is_file() {
                anyhow::bail!("ASCII header not found: {}", header.display());
            }
            if args.output_header.is_some() {
                anyhow::bail!("Header dump is only available for SDF input");
            }
        }
    }

    if args.output_json.as_os_str().is_empty() {
        anyhow::bail!("Output path cannot be empty");
    }

    if args.output_json == args.input {
        anyhow::bail!("Output path would overwrite the input file");
    }

    if args.output_header.as_ref() == Some(&args.output_json) {
        anyhow::bail!("Header and trace outputs must be different files");
    }

    Ok(())
}

//! DSA Trace CLI
//!
//! Decodes dynamic signal analyzer measurements (binary SDF files or DSA
//! ASCII exports) into JSON trace documents.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use dsa_trace::commands::{execute_decode, summarize, validate_args, DecodeArgs, SourceKind};
use dsa_trace::utils::config::SCHEMA_VERSION;

/// DSA Trace - decode SDF and DSA ASCII measurements
#[derive(Parser, Debug)]
#[command(name = "dsa-trace")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a binary SDF file
    Sdf {
        /// Path to the SDF file
        #[arg(short, long)]
        file: PathBuf,

        /// Output path for JSON traces
        #[arg(short, long, default_value = "traces.json")]
        output: PathBuf,

        /// Output path for a JSON dump of the header records (optional)
        #[arg(long)]
        header: Option<PathBuf>,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Decode a DSA ASCII export (<base>.HDR, .TXT, .X and optional .Z)
    Ascii {
        /// Base name of the export, without extension
        #[arg(short, long)]
        base: PathBuf,

        /// Output path for JSON traces
        #[arg(short, long, default_value = "traces.json")]
        output: PathBuf,

        /// Print text summary to stdout
        #[arg(long)]
        summary: bool,
    },

    /// Validate a trace JSON file
    Validate {
        /// Path to trace JSON file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    match cli.command {
        Commands::Sdf {
            file,
            output,
            header,
            summary,
        } => {
            let args = DecodeArgs {
                source: SourceKind::Sdf,
                input: file,
                output_json: output,
                output_header: header,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_decode(args)?;
        }

        Commands::Ascii {
            base,
            output,
            summary,
        } => {
            let args = DecodeArgs {
                source: SourceKind::Ascii,
                input: base,
                output_json: output,
                output_header: None,
                print_summary: summary,
            };

            validate_args(&args)?;
            execute_decode(args)?;
        }

        Commands::Validate { file } => {
            validate_trace_file(file)?;
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}

/// Validate a trace JSON file
///
/// **Private** - internal command implementation
fn validate_trace_file(file_path: PathBuf) -> Result<()> {
    use dsa_trace::output::read_traces;

    println!("Validating traces: {}", file_path.display());

    let document = read_traces(&file_path)
        .with_context(|| format!("Invalid trace document {}", file_path.display()))?;

    println!("✓ Valid trace JSON");
    println!("  Version: {}", document.version);
    println!("  Source: {}", document.source);
    println!("  Generated: {}", document.generated_at);
    println!("  Traces: {}", document.traces.len());
    for (i, trace) in document.traces.iter().enumerate() {
        println!("{}", summarize(i, trace));
    }

    Ok(())
}

/// Display version information
///
/// **Private** - internal command implementation
fn display_version() {
    println!("DSA Trace v{}", env!("CARGO_PKG_VERSION"));
    println!("Trace Schema: v{}", SCHEMA_VERSION);
    println!();
    println!("Decoder for SDF binary files and DSA ASCII exports.");
}

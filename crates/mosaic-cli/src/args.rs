//! Command-line argument definitions for the Mosaic CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, output formatting and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Mosaic document compiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input JSON document
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output JSON file; standard output when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Pretty-print the compiled document
    #[arg(long)]
    pub pretty: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

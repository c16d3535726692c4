//! Mosaic CLI library
//!
//! This module contains the core CLI logic for the Mosaic document compiler.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write},
};

use log::info;

use mosaic::{Compiler, MosaicError};

/// Run the Mosaic CLI application
///
/// This function compiles the input document and writes the resulting JSON
/// to the output file, or to standard output when no output path is given.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `MosaicError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed JSON input
/// - Validation and structural errors
pub fn run(args: &Args) -> Result<(), MosaicError> {
    info!(
        input_path = args.input,
        output_path:? = args.output;
        "Compiling document"
    );

    let app_config = config::load_config(args.config.as_ref())?;

    let source = fs::read_to_string(&args.input)?;

    let compiler = Compiler::new(app_config);
    let container = compiler.compile_str(&source)?;
    let json = compiler.render_json(&container, args.pretty)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json)?;
            info!(output_file = path.as_str(); "Document written");
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}

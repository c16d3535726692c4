//! Error types for Mosaic operations.
//!
//! This module provides the main error type [`MosaicError`] which wraps
//! the error conditions that can occur while compiling a document.

use std::io;

use thiserror::Error;

use mosaic_compiler::error::Diagnostic;

/// The main error type for Mosaic operations.
///
/// # Diagnostic Variants
///
/// The `Compile` variant carries a [`Diagnostic`] with an error code and the
/// JSON pointer of the offending source node, which the CLI renders with
/// `miette`.
#[derive(Debug, Error)]
pub enum MosaicError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Compile(#[from] Diagnostic),
}

impl MosaicError {
    /// Returns the compile diagnostic, if this is a compile error.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            Self::Compile(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }
}

//! Error and diagnostic system for the Mosaic compiler.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Error kinds grouping codes by the stage that raises them
//! - Labels pointing at the offending source node
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single compile failure with an error code, an optional source location
//! and help text. The compiler stops at the first failure, so every stage
//! returns [`Result`].
//!
//! # Example
//!
//! ```
//! # use mosaic_compiler::error::{Diagnostic, ErrorCode, ErrorKind};
//!
//! let diag = Diagnostic::error("missing required prop `id`")
//!     .with_code(ErrorCode::E101)
//!     .with_label("/children/0", "note declared here")
//!     .with_help("every note needs a unique `id`");
//!
//! assert_eq!(diag.kind(), ErrorKind::Validation);
//! ```

mod diagnostic;
mod error_code;
mod label;

pub use diagnostic::Diagnostic;
pub use error_code::{ErrorCode, ErrorKind};
pub use label::Label;

/// A type alias for `Result<T, Diagnostic>`.
pub type Result<T> = std::result::Result<T, Diagnostic>;

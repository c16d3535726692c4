//! The core diagnostic type for the Mosaic error system.
//!
//! A [`Diagnostic`] represents a single compile failure with an optional
//! error code, a labeled source location, and help text.

use std::fmt;

use crate::error::{
    error_code::{ErrorCode, ErrorKind},
    label::Label,
};

/// A rich diagnostic message with source location information.
///
/// Diagnostics provide detailed information about compile failures,
/// including:
/// - An optional error code for documentation and searchability
/// - A primary message describing the issue
/// - An optional labeled location in the source document
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// error[E300]: mind-map `ideas` contains a cycle through `b`
///   --> mind-map `ideas`
///    = help: acyclic hierarchy required; remove one of the `from` links
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    label: Option<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use mosaic_compiler::error::{Diagnostic, ErrorCode};
    ///
    /// let diag = Diagnostic::error("unknown node kind `hexagon`")
    ///     .with_code(ErrorCode::E100)
    ///     .with_label("/children/3", "declared here")
    ///     .with_help("use one of the supported kinds");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            label: None,
            help: None,
        }
    }

    /// Create an internal-invariant diagnostic.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::error(message).with_code(ErrorCode::E900)
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the error kind. Diagnostics without a code count as internal.
    pub fn kind(&self) -> ErrorKind {
        self.code.map_or(ErrorKind::Internal, |code| code.kind())
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the location label, if any.
    pub fn label(&self) -> Option<&Label> {
        self.label.as_ref()
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach a label at the given JSON pointer (or other location description).
    pub fn with_label(mut self, pointer: impl Into<String>, message: impl Into<String>) -> Self {
        self.label = Some(Label::new(pointer, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E101]: message (at /children/0)" or "error: message"
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(label) = &self.label {
            write!(f, " (at {})", label.pointer())?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_error() {
        let diag = Diagnostic::error("test error");

        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.label().is_none());
        assert!(diag.help().is_none());
        assert_eq!(diag.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::error("cycle").with_code(ErrorCode::E300);

        assert_eq!(diag.code(), Some(ErrorCode::E300));
        assert_eq!(diag.kind(), ErrorKind::Structural);
    }

    #[test]
    fn test_diagnostic_with_label() {
        let diag = Diagnostic::error("test error").with_label("/children/2", "error here");

        let label = diag.label().unwrap();
        assert_eq!(label.pointer(), "/children/2");
        assert_eq!(label.message(), "error here");
    }

    #[test]
    fn test_diagnostic_with_help() {
        let diag = Diagnostic::error("test error").with_help("try this instead");

        assert_eq!(diag.help(), Some("try this instead"));
    }

    #[test]
    fn test_diagnostic_display() {
        let plain = Diagnostic::error("something went wrong");
        assert_eq!(plain.to_string(), "error: something went wrong");

        let full = Diagnostic::error("missing required prop `id`")
            .with_code(ErrorCode::E101)
            .with_label("/children/0", "declared here");
        assert_eq!(
            full.to_string(),
            "error[E101]: missing required prop `id` (at /children/0)"
        );
    }

    #[test]
    fn test_internal_diagnostic() {
        let diag = Diagnostic::internal("embed wrapper without scope payload");
        assert_eq!(diag.code(), Some(ErrorCode::E900));
        assert_eq!(diag.kind(), ErrorKind::Internal);
    }
}

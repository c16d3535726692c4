//! Labeled source locations for diagnostic messages.
//!
//! Source documents are JSON trees, so a location is a JSON pointer
//! (RFC 6901) into the document rather than a byte span.

use std::fmt;

/// A labeled location in the source document.
///
/// # Example
///
/// ```text
/// error[E103]: ambiguous positioning on `note`
///   --> /children/0/children/2
///    = both `x`/`y` and `anchor` given
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pointer: String,
    message: String,
}

impl Label {
    /// Create a new label at the given JSON pointer.
    pub fn new(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    /// Get the JSON pointer of the labeled location.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pointer, self.message)
    }
}

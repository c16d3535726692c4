//! Error codes for the Mosaic diagnostic system.
//!
//! Error codes are organized by kind:
//! - `E1xx` - Validation errors (tree builder)
//! - `E2xx` - Resolution errors
//! - `E3xx` - Structural errors (layout engine)
//! - `E9xx` - Internal errors

use std::fmt;

/// Broad category of a compile failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The source document is malformed.
    Validation,
    /// A reference could not be resolved.
    Resolution,
    /// The hierarchy cannot be laid out.
    Structural,
    /// A compiler invariant was broken.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Validation => write!(f, "validation"),
            ErrorKind::Resolution => write!(f, "resolution"),
            ErrorKind::Structural => write!(f, "structural"),
            ErrorKind::Internal => write!(f, "internal"),
        }
    }
}

/// Error codes for categorizing diagnostic errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Validation Errors (E1xx)
    // =========================================================================
    /// Unknown node kind.
    ///
    /// The `kind` of a source node is not part of the vocabulary.
    E100,

    /// Missing required prop.
    ///
    /// A prop the node kind requires (`id`, `src`, `to`, `scope`, ...) is absent.
    E101,

    /// Invalid prop value.
    ///
    /// A prop has the wrong JSON type or is not one of the accepted values.
    E102,

    /// Ambiguous positioning.
    ///
    /// Both absolute (`x`/`y`) and relative (`anchor`) positioning are present.
    E103,

    /// Missing positioning.
    ///
    /// A kind that must be positioned has neither `x`/`y` nor `anchor`.
    E104,

    /// Misplaced node.
    ///
    /// A node appears where its kind is not allowed, such as a mind-map node
    /// outside of any mind-map region.
    E105,

    /// Missing connector source.
    ///
    /// A connector or message has no `from` and no enclosing node to inherit it from.
    E106,

    /// Invalid scope name.
    ///
    /// An embed scope name is empty or contains the `.` separator.
    E107,

    /// Malformed endpoint.
    ///
    /// An endpoint is not of the form `node` or `node:port`.
    E108,

    // =========================================================================
    // Resolution Errors (E2xx)
    // =========================================================================
    /// Unresolved reference.
    ///
    /// Reserved: anchor resolution currently falls back to the literal target.
    E200,

    // =========================================================================
    // Structural Errors (E3xx)
    // =========================================================================
    /// Cyclic hierarchy.
    ///
    /// The `from` links of a mind-map region form a cycle.
    E300,

    /// Duplicate region node.
    ///
    /// Two nodes of the same mind-map region share an id.
    E301,

    /// Cyclic region anchors.
    ///
    /// Mind-map regions anchor each other in a cycle.
    E302,

    // =========================================================================
    // Internal Errors (E9xx)
    // =========================================================================
    /// Internal invariant violated.
    E900,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E101").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Validation errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            ErrorCode::E106 => "E106",
            ErrorCode::E107 => "E107",
            ErrorCode::E108 => "E108",
            // Resolution errors
            ErrorCode::E200 => "E200",
            // Structural errors
            ErrorCode::E300 => "E300",
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            // Internal errors
            ErrorCode::E900 => "E900",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E100 => "unknown node kind",
            ErrorCode::E101 => "missing required prop",
            ErrorCode::E102 => "invalid prop value",
            ErrorCode::E103 => "ambiguous positioning",
            ErrorCode::E104 => "missing positioning",
            ErrorCode::E105 => "misplaced node",
            ErrorCode::E106 => "missing connector source",
            ErrorCode::E107 => "invalid scope name",
            ErrorCode::E108 => "malformed endpoint",
            ErrorCode::E200 => "unresolved reference",
            ErrorCode::E300 => "cyclic hierarchy",
            ErrorCode::E301 => "duplicate region node",
            ErrorCode::E302 => "cyclic region anchors",
            ErrorCode::E900 => "internal invariant violated",
        }
    }

    /// Returns the kind of failure this code belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::E100
            | ErrorCode::E101
            | ErrorCode::E102
            | ErrorCode::E103
            | ErrorCode::E104
            | ErrorCode::E105
            | ErrorCode::E106
            | ErrorCode::E107
            | ErrorCode::E108 => ErrorKind::Validation,
            ErrorCode::E200 => ErrorKind::Resolution,
            ErrorCode::E300 | ErrorCode::E301 | ErrorCode::E302 => ErrorKind::Structural,
            ErrorCode::E900 => ErrorKind::Internal,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

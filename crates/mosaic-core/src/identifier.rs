//! Identifier management using string interning for efficient string storage and comparison
//!
//! This module provides the [`Id`] type, an interned node identifier, and the
//! [`Scope`] type, the stack of embed-scope names an identifier is resolved in.
//!
//! Identifiers are dot-segmented once they are qualified by enclosing scopes
//! (`auth.jwt`). An identifier that already contains a dot is treated as fully
//! qualified and is never prefixed again.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Separator between the segments of a qualified identifier.
pub const SEPARATOR: char = '.';

/// Global string interner for efficient identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner. The
/// interner only ever grows, so concurrent compiles never observe each other.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<R>(f: impl FnOnce(&mut DefaultStringInterner) -> R) -> R {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Efficient identifier type using string interning
///
/// # Examples
///
/// ```
/// use mosaic_core::identifier::{Id, Scope};
///
/// let jwt = Id::new("jwt");
/// assert!(!jwt.is_qualified());
///
/// let mut scope = Scope::new();
/// scope.push(Id::new("auth"));
///
/// let qualified = jwt.qualify(&scope);
/// assert_eq!(qualified, "auth.jwt");
/// assert_eq!(qualified.qualify(&scope), qualified);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Returns `true` when the identifier already carries a scope prefix.
    ///
    /// Qualified identifiers are explicit cross-scope references and are left
    /// untouched by scope resolution.
    pub fn is_qualified(&self) -> bool {
        self.with_str(|name| name.contains(SEPARATOR))
    }

    /// Qualifies this identifier with the given scope.
    ///
    /// Returns `self` unchanged when the identifier is already qualified or
    /// when the scope is empty, which makes the operation idempotent.
    pub fn qualify(&self, scope: &Scope) -> Self {
        if scope.is_empty() || self.is_qualified() {
            return *self;
        }
        Id::new(&format!("{scope}{SEPARATOR}{self}"))
    }

    /// Creates a nested ID by combining this ID and a child segment with the '.' separator.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_core::identifier::Id;
    ///
    /// let nested = Id::new("auth").create_nested(Id::new("jwt"));
    /// assert_eq!(nested, "auth.jwt");
    /// ```
    pub fn create_nested(&self, child_id: Id) -> Self {
        Id::new(&format!("{self}{SEPARATOR}{child_id}"))
    }

    /// Returns the scope part of a qualified identifier, i.e. everything
    /// before the last segment. `None` for unqualified identifiers.
    ///
    /// # Examples
    ///
    /// ```
    /// use mosaic_core::identifier::Id;
    ///
    /// assert_eq!(Id::new("outer.inner.node").scope_prefix().unwrap(), "outer.inner");
    /// assert!(Id::new("node").scope_prefix().is_none());
    /// ```
    pub fn scope_prefix(&self) -> Option<Self> {
        let prefix = self.with_str(|name| {
            name.rsplit_once(SEPARATOR)
                .map(|(prefix, _)| prefix.to_string())
        })?;
        Some(Id::new(&prefix))
    }

    fn with_str<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        with_interner(|interner| {
            let name = interner
                .resolve(self.0)
                .expect("Symbol should exist in interner");
            f(name)
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.with_str(|name| name.to_string());
        f.write_str(&name)
    }
}

impl From<&str> for Id {
    /// Creates an `Id` from a string slice
    ///
    /// This is a convenience implementation that calls `Id::new`.
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        self.with_str(|name| name == other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Ok(Id::new(&name))
    }
}

/// The ordered stack of embed-scope names enclosing a node.
///
/// A scope is never materialized as a node; it only exists as resolution
/// context while walking the host tree. Nested scopes chain: pushing `outer`
/// then `inner` yields the prefix `outer.inner`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    segments: Vec<Id>,
}

impl Scope {
    /// Creates the empty (document root) scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enters a nested scope.
    pub fn push(&mut self, name: Id) {
        self.segments.push(name);
    }

    /// Leaves the innermost scope, returning its name.
    pub fn pop(&mut self) -> Option<Id> {
        self.segments.pop()
    }

    /// Returns `true` at the document root.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of enclosing scopes.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

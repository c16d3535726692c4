//! Typed extraction of source props.
//!
//! The tree builder pulls every prop a stage inspects out of the source map
//! through a [`PropReader`]. Whatever is left over once a node is built is
//! kept verbatim as pass-through props.

use std::str::FromStr;

use log::warn;
use mosaic_core::{element::InvalidChoice, identifier::Id, kind::Kind, tree::Props};
use serde_json::Value;

use crate::{
    error::{Diagnostic, ErrorCode, Result},
    source::NodePath,
};

/// Consumes the props of one source node.
pub(crate) struct PropReader<'a> {
    kind: Kind,
    path: &'a NodePath,
    props: Props,
}

impl<'a> PropReader<'a> {
    pub(crate) fn new(kind: Kind, path: &'a NodePath, props: Props) -> Self {
        Self { kind, path, props }
    }

    pub(crate) fn kind(&self) -> Kind {
        self.kind
    }

    pub(crate) fn path(&self) -> &NodePath {
        self.path
    }

    /// Returns `true` if the prop is still present.
    pub(crate) fn has(&self, key: &str) -> bool {
        self.props.contains_key(key)
    }

    /// Removes a prop, keeping the order of the remaining ones.
    pub(crate) fn take(&mut self, key: &str) -> Option<Value> {
        self.props.shift_remove(key)
    }

    /// Takes a string prop.
    pub(crate) fn take_str(&mut self, key: &str) -> Result<Option<String>> {
        match self.take(key) {
            None => Ok(None),
            Some(Value::String(value)) => Ok(Some(value)),
            Some(other) => Err(self.invalid(key, &other, "expected a string")),
        }
    }

    /// Takes a name-like prop: a non-empty string, or an integer used verbatim.
    pub(crate) fn take_name(&mut self, key: &str) -> Result<Option<String>> {
        let name = match self.take(key) {
            None => return Ok(None),
            Some(Value::String(name)) => name,
            Some(Value::Number(number)) if number.is_i64() || number.is_u64() => {
                number.to_string()
            }
            Some(other) => return Err(self.invalid(key, &other, "expected an identifier")),
        };
        if name.is_empty() {
            return Err(self.invalid(key, &Value::String(name), "identifiers cannot be empty"));
        }
        Ok(Some(name))
    }

    /// Takes a name-like prop that the node kind requires.
    pub(crate) fn require_name(&mut self, key: &str) -> Result<String> {
        self.take_name(key)?.ok_or_else(|| self.missing(key))
    }

    /// Takes an identifier prop.
    pub(crate) fn take_id(&mut self, key: &str) -> Result<Option<Id>> {
        Ok(self.take_name(key)?.map(|name| Id::new(&name)))
    }

    /// Takes an identifier prop that the node kind requires.
    pub(crate) fn require_id(&mut self, key: &str) -> Result<Id> {
        self.take_id(key)?.ok_or_else(|| self.missing(key))
    }

    /// Takes a string prop that the node kind requires.
    pub(crate) fn require_str(&mut self, key: &str) -> Result<String> {
        self.take_str(key)?.ok_or_else(|| self.missing(key))
    }

    /// Takes a finite number prop.
    pub(crate) fn take_number(&mut self, key: &str) -> Result<Option<f64>> {
        match self.take(key) {
            None => Ok(None),
            Some(value) => match value.as_f64() {
                Some(number) if number.is_finite() => Ok(Some(number)),
                _ => Err(self.invalid(key, &value, "expected a number")),
            },
        }
    }

    /// Takes a number prop that must not be negative.
    pub(crate) fn take_non_negative(&mut self, key: &str) -> Result<Option<f64>> {
        match self.take_number(key)? {
            Some(number) if number < 0.0 => Err(self.invalid(
                key,
                &Value::from(number),
                "expected a non-negative number",
            )),
            number => Ok(number),
        }
    }

    /// Takes a prop restricted to a closed set of string choices.
    pub(crate) fn take_choice<T>(&mut self, key: &str) -> Result<Option<T>>
    where
        T: FromStr<Err = InvalidChoice>,
    {
        match self.take_str(key)? {
            None => Ok(None),
            Some(text) => text.parse().map(Some).map_err(|err: InvalidChoice| {
                Diagnostic::error(err.to_string())
                    .with_code(ErrorCode::E102)
                    .with_label(self.path.prop_pointer(key), "invalid value")
            }),
        }
    }

    /// Removes a prop that the node kind does not honor, logging it.
    pub(crate) fn ignore(&mut self, key: &str, reason: &str) {
        if self.take(key).is_some() {
            warn!(
                kind = self.kind.as_str(),
                prop = key,
                location = self.path.to_string();
                "Ignoring prop: {reason}"
            );
        }
    }

    /// The props no stage consumed, in source order.
    pub(crate) fn into_rest(self) -> Props {
        self.props
    }

    /// Builds a missing-prop diagnostic.
    pub(crate) fn missing(&self, key: &str) -> Diagnostic {
        Diagnostic::error(format!(
            "missing required prop `{key}` on `{}`",
            self.kind
        ))
        .with_code(ErrorCode::E101)
        .with_label(self.path.to_string(), format!("`{}` declared here", self.kind))
    }

    /// Builds an invalid-prop diagnostic.
    pub(crate) fn invalid(&self, key: &str, value: &Value, reason: &str) -> Diagnostic {
        Diagnostic::error(format!(
            "invalid value `{value}` for prop `{key}` on `{}`",
            self.kind
        ))
        .with_code(ErrorCode::E102)
        .with_label(self.path.prop_pointer(key), reason)
    }
}

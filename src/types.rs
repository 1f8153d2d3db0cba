//! Type references and strict coercion
//!
//! A field's `type` is anything implementing [`TypeRef`]: it has a display
//! name (lower-cased into the field's type tag), a strict coercion from an
//! arbitrary JSON value, and a runtime instance check used when casting is
//! disabled. The built-in [`Kind`] covers the JSON value shapes.

use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};
use thiserror::Error;

/// Shared handle to a type reference
pub type TypeHandle = Arc<dyn TypeRef>;

/// Raised when a value cannot be faithfully converted to a type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot cast '{value}' to {expected}")]
pub struct CastError {
    /// Type tag of the target type
    pub expected: String,
    /// Rendered input value
    pub value: String,
}

impl CastError {
    pub fn new(expected: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            value: value.into(),
        }
    }

    fn rejecting(expected: &str, value: &Value) -> Self {
        Self::new(expected, render_value(value))
    }
}

/// A type usable in a blueprint
pub trait TypeRef: fmt::Debug + Send + Sync {
    /// Human-readable type name, e.g. `"Number"`
    fn name(&self) -> &str;

    /// Strictly convert `value` into this type
    fn coerce(&self, value: &Value) -> Result<Value, CastError>;

    /// Lower-cased name used for runtime type comparison
    fn tag(&self) -> String {
        self.name().to_lowercase()
    }

    /// Whether `value` already is of this type
    fn is_instance(&self, value: &Value) -> bool {
        value_tag(value) == self.tag()
    }
}

/// Built-in types matching the JSON value shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

impl Kind {
    pub fn name(&self) -> &'static str {
        match self {
            Kind::String => "String",
            Kind::Number => "Number",
            Kind::Boolean => "Boolean",
            Kind::Array => "Array",
            Kind::Object => "Object",
        }
    }

    fn tag_str(&self) -> &'static str {
        match self {
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Boolean => "boolean",
            Kind::Array => "array",
            Kind::Object => "object",
        }
    }
}

impl TypeRef for Kind {
    fn name(&self) -> &str {
        Kind::name(self)
    }

    fn coerce(&self, value: &Value) -> Result<Value, CastError> {
        let tag = self.tag_str();
        match (self, value) {
            (Kind::String, Value::String(_)) => Ok(value.clone()),
            (Kind::String, Value::Number(n)) => Ok(Value::String(n.to_string())),
            (Kind::String, Value::Bool(b)) => Ok(Value::String(b.to_string())),

            (Kind::Number, Value::Number(_)) => Ok(value.clone()),
            (Kind::Number, Value::String(s)) => parse_number(s)
                .map(Value::Number)
                .ok_or_else(|| CastError::rejecting(tag, value)),

            (Kind::Boolean, Value::Bool(_)) => Ok(value.clone()),
            (Kind::Boolean, Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Ok(Value::Bool(true)),
                "false" => Ok(Value::Bool(false)),
                _ => Err(CastError::rejecting(tag, value)),
            },
            (Kind::Boolean, Value::Number(n)) => match n.as_f64() {
                Some(f) if f == 1.0 => Ok(Value::Bool(true)),
                Some(f) if f == 0.0 => Ok(Value::Bool(false)),
                _ => Err(CastError::rejecting(tag, value)),
            },

            (Kind::Array, Value::Array(_)) | (Kind::Object, Value::Object(_)) => Ok(value.clone()),

            _ => Err(CastError::rejecting(tag, value)),
        }
    }

    fn tag(&self) -> String {
        self.tag_str().to_string()
    }
}

impl From<Kind> for TypeHandle {
    fn from(kind: Kind) -> Self {
        Arc::new(kind)
    }
}

/// Parse a numeric string, keeping integers as integers
fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Some(Number::from(i));
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(Number::from(u));
    }
    // f64 parsing accepts "inf" and "NaN"; from_f64 rejects non-finite values
    let f = s.parse::<f64>().ok()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Some(Number::from(f as i64));
    }
    Number::from_f64(f)
}

/// Runtime type tag of a JSON value
pub fn value_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Render a value the way it appears inside error messages
pub fn render_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_value).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

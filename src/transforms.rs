//! Common string transforms
//!
//! Non-string values pass through unchanged so the transforms are safe to use
//! on optional fields, where they may receive `Value::Null`.

use std::sync::Arc;

use serde_json::Value;

use crate::schema::Transform;

fn map_str(value: Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::String(s) => Value::String(f(&s)),
        other => other,
    }
}

/// Trim surrounding whitespace
pub fn trim() -> Transform {
    Arc::new(|value: Value| map_str(value, |s| s.trim().to_string()))
}

pub fn lowercase() -> Transform {
    Arc::new(|value: Value| map_str(value, str::to_lowercase))
}

pub fn uppercase() -> Transform {
    Arc::new(|value: Value| map_str(value, str::to_uppercase))
}

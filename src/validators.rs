//! Common validation predicates
//!
//! Each constructor returns a [`Predicate`] usable as a bare validator or in
//! the `{ validator, message }` form via [`Validate::Rule`](crate::schema::Validate::Rule).
//!
//! Validators also run on absent values. Every predicate here except
//! [`non_empty`] accepts `Value::Null`, so optional fields stay optional;
//! pair them with `required` or [`non_empty`] to demand a value.

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;

use crate::error::Result;
use crate::schema::Predicate;

/// Length of strings (in chars) and arrays
fn length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Accept null, otherwise defer to `check`
fn absent_or(check: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Predicate {
    Arc::new(move |value: &Value| value.is_null() || check(value))
}

/// Rejects null, empty strings and empty arrays/objects
pub fn non_empty() -> Predicate {
    Arc::new(|value: &Value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        _ => true,
    })
}

/// Accepts only values equal to one of `allowed`
pub fn one_of<I, V>(allowed: I) -> Predicate
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let allowed: Vec<Value> = allowed.into_iter().map(Into::into).collect();
    absent_or(move |value| allowed.contains(value))
}

pub fn min_length(min: usize) -> Predicate {
    absent_or(move |value| length(value).is_some_and(|len| len >= min))
}

pub fn max_length(max: usize) -> Predicate {
    absent_or(move |value| length(value).is_some_and(|len| len <= max))
}

/// Inclusive numeric range
pub fn range(min: f64, max: f64) -> Predicate {
    absent_or(move |value| value.as_f64().is_some_and(|n| n >= min && n <= max))
}

/// Strings matching `pattern`
pub fn pattern(pattern: &str) -> Result<Predicate> {
    let re = Regex::new(pattern)?;
    Ok(absent_or(move |value| value.as_str().is_some_and(|s| re.is_match(s))))
}

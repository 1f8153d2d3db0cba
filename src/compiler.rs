//! Schema compiler and applier
//!
//! [`compile`] resolves a [`Blueprint`] plus optional global rules into an
//! immutable [`Schema`]. [`Schema::apply`] then normalizes any number of input
//! objects against it. Each field runs through the same ordered pipeline:
//!
//! ```text
//! presence -> required/type guard -> cast | default | raw -> transforms -> validate -> assign
//! ```

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{Result, SchemaError};
use crate::schema::{Blueprint, DefaultValue, Predicate, RuleDescriptor, Transform, Validate};
use crate::types::{render_value, value_tag, TypeHandle};

/// Token replaced by the failing value in custom validation messages
pub const VALUE_TOKEN: &str = "{VALUE}";

/// Normalized validation option
#[derive(Clone)]
pub struct Validator {
    pub predicate: Predicate,
    pub message: Option<String>,
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A fully resolved field rule
#[derive(Clone)]
pub struct CompiledRule {
    pub type_ref: TypeHandle,
    /// Lower-cased type name
    pub tag: String,
    pub casting: bool,
    pub transforms: Vec<Transform>,
    pub required: bool,
    pub required_message: Option<String>,
    pub default: Option<DefaultValue>,
    pub validator: Option<Validator>,
}

impl CompiledRule {
    fn from_descriptor(name: &str, descriptor: RuleDescriptor) -> Result<Self> {
        let type_ref = descriptor
            .type_ref
            .ok_or_else(|| SchemaError::MissingType(name.to_string()))?;
        if type_ref.name().is_empty() {
            return Err(SchemaError::UnnamedType(name.to_string()));
        }
        let tag = type_ref.tag();

        let (required, required_message) = match descriptor.required {
            Some(required) => (required.is_required(), required.message().map(str::to_string)),
            None => (false, None),
        };

        let validator = match descriptor.validate {
            None => None,
            Some(Validate::Predicate(predicate)) => Some(Validator { predicate, message: None }),
            Some(Validate::Rule { validator: Some(predicate), message }) => {
                Some(Validator { predicate, message })
            }
            Some(Validate::Rule { validator: None, .. }) => {
                return Err(SchemaError::MissingValidator(name.to_string()));
            }
        };

        Ok(Self {
            type_ref,
            tag,
            casting: descriptor.casting.unwrap_or(true),
            transforms: descriptor.transform.unwrap_or_default(),
            required,
            required_message,
            default: descriptor.default,
            validator,
        })
    }

    fn type_mismatch(&self, name: &str) -> SchemaError {
        let message = self
            .required_message
            .clone()
            .unwrap_or_else(|| format!("Expected a {{{}}} for '{}'.", self.tag, name));
        SchemaError::TypeMismatch {
            field: name.to_string(),
            message,
        }
    }

    /// Run the field pipeline; `Value::Null` means "absent"
    fn resolve(&self, name: &str, input: Option<&Value>) -> Result<Value> {
        let present = input.filter(|v| !v.is_null());

        let mismatched = match present {
            Some(value) => !self.casting && !self.type_ref.is_instance(value),
            None => self.required || (!self.casting && self.default.is_none()),
        };
        if mismatched {
            debug!(field = name, tag = %self.tag, "type guard rejected field");
            return Err(self.type_mismatch(name));
        }

        let value = match (present, &self.default) {
            (Some(value), _) if self.casting => {
                self.type_ref
                    .coerce(value)
                    .map_err(|source| SchemaError::Cast {
                        field: name.to_string(),
                        source,
                    })?
            }
            (Some(value), _) => value.clone(),
            (None, Some(default)) => default.resolve(),
            (None, None) => Value::Null,
        };
        trace!(field = name, value_tag = value_tag(&value), "resolved field value");

        let value = self.transforms.iter().fold(value, |acc, f| f(acc));

        if let Some(validator) = &self.validator {
            if !(validator.predicate)(&value) {
                let rendered = render_value(&value);
                let message = match &validator.message {
                    Some(template) => template.replacen(VALUE_TOKEN, &rendered, 1),
                    None => format!("Fail '{}' validation for '{}'.", rendered, name),
                };
                debug!(field = name, "validation rejected field");
                return Err(SchemaError::Validation {
                    field: name.to_string(),
                    message,
                });
            }
        }

        Ok(value)
    }
}

impl fmt::Debug for CompiledRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledRule")
            .field("tag", &self.tag)
            .field("casting", &self.casting)
            .field("transforms", &self.transforms.len())
            .field("required", &self.required)
            .field("required_message", &self.required_message)
            .field("default", &self.default)
            .field("validator", &self.validator)
            .finish()
    }
}

/// A compiled, immutable schema
#[derive(Clone, Debug)]
pub struct Schema {
    rules: Arc<[(String, CompiledRule)]>,
}

impl Schema {
    /// Normalize one input object; `None` behaves like an empty object.
    ///
    /// Fields not declared in the schema are dropped, and fields whose final
    /// value is null are omitted. The first failing field aborts the call.
    pub fn apply(&self, input: Option<&Map<String, Value>>) -> Result<Map<String, Value>> {
        let mut output = Map::new();
        for (name, rule) in self.rules.iter() {
            let value = rule.resolve(name, input.and_then(|obj| obj.get(name)))?;
            if !value.is_null() {
                output.insert(name.clone(), value);
            }
        }
        Ok(output)
    }

    /// Normalize a JSON value; `null` behaves like an empty object
    pub fn apply_value(&self, input: &Value) -> Result<Value> {
        let output = match input {
            Value::Null => self.apply(None)?,
            Value::Object(obj) => self.apply(Some(obj))?,
            other => return Err(SchemaError::InvalidInput(value_tag(other).to_string())),
        };
        Ok(Value::Object(output))
    }

    /// Compiled rule for a field
    pub fn rule(&self, name: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, rule)| rule)
    }

    /// Declared fields in blueprint order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Compile a blueprint, merging `global_rules` under every field
pub fn compile(blueprint: Blueprint, global_rules: Option<&RuleDescriptor>) -> Result<Schema> {
    let empty = RuleDescriptor::default();
    let global = global_rules.unwrap_or(&empty);

    let rules = blueprint
        .into_iter()
        .map(|(name, spec)| -> Result<(String, CompiledRule)> {
            let descriptor = spec.into_descriptor().merged_over(global);
            let rule = CompiledRule::from_descriptor(&name, descriptor)?;
            Ok((name, rule))
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(fields = rules.len(), "compiled schema");
    Ok(Schema { rules: rules.into() })
}

/// Compile a blueprint into a reusable normalizing function
pub fn create_schema(
    blueprint: Blueprint,
    global_rules: Option<&RuleDescriptor>,
) -> Result<impl Fn(Option<&Map<String, Value>>) -> Result<Map<String, Value>> + Clone + Send + Sync>
{
    let schema = compile(blueprint, global_rules)?;
    Ok(move |input: Option<&Map<String, Value>>| schema.apply(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Kind;
    use serde_json::json;

    #[test]
    fn test_compile_resolves_tags_and_defaults() {
        let schema = compile(
            Blueprint::new()
                .field("age", Kind::Number)
                .field("name", RuleDescriptor::of(Kind::String).casting(false)),
            None,
        )
        .unwrap();

        let age = schema.rule("age").unwrap();
        assert_eq!(age.tag, "number");
        assert!(age.casting);
        assert!(age.transforms.is_empty());
        assert!(!age.required);

        assert!(!schema.rule("name").unwrap().casting);
        assert_eq!(schema.fields().collect::<Vec<_>>(), vec!["age", "name"]);
    }

    #[test]
    fn test_compile_missing_type() {
        let err = compile(Blueprint::new().field("age", RuleDescriptor::new()), None).unwrap_err();
        assert!(matches!(err, SchemaError::MissingType(ref f) if f == "age"));
    }

    #[test]
    fn test_global_type_fills_gap() {
        let global = RuleDescriptor::of(Kind::String);
        let schema = compile(Blueprint::new().field("age", RuleDescriptor::new()), Some(&global)).unwrap();
        assert_eq!(schema.rule("age").unwrap().tag, "string");
    }

    #[test]
    fn test_compile_message_without_validator() {
        let blueprint = Blueprint::new().field(
            "age",
            RuleDescriptor::of(Kind::String).validate(Validate::message("nope")),
        );
        let err = compile(blueprint, None).unwrap_err();
        assert!(matches!(err, SchemaError::MissingValidator(_)));
    }

    #[test]
    fn test_apply_value_rejects_non_objects() {
        let schema = compile(Blueprint::new().field("age", Kind::Number), None).unwrap();
        assert_eq!(schema.apply_value(&Value::Null).unwrap(), json!({}));
        assert!(matches!(
            schema.apply_value(&json!([1])),
            Err(SchemaError::InvalidInput(ref tag)) if tag == "array"
        ));
    }

    #[test]
    fn test_value_token_replaced_once() {
        let blueprint = Blueprint::new().field(
            "age",
            RuleDescriptor::of(Kind::Number)
                .validate(Validate::with_message(|_| false, "{VALUE} then {VALUE}")),
        );
        let schema = compile(blueprint, None).unwrap();
        let err = schema.apply_value(&json!({"age": 3})).unwrap_err();
        assert_eq!(err.to_string(), "3 then {VALUE}");
    }
}

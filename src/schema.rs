//! Blueprint and rule descriptor types
//!
//! A [`Blueprint`] maps field names to a [`FieldSpec`]: either a bare type or a
//! full [`RuleDescriptor`]. Every descriptor option is optional so that global
//! rules can fill the gaps a field leaves open (see [`RuleDescriptor::merged_over`]).

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::types::TypeHandle;

/// A unary function applied to a field value after casting/defaulting
pub type Transform = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// A predicate deciding whether a field value is acceptable
pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A zero-argument default value factory
pub type Factory = Arc<dyn Fn() -> Value + Send + Sync>;

/// Requiredness of a field
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Required {
    /// `required: true`
    Flag(bool),
    /// `required: [true, "message"]`; the message may be left for global rules to supply
    WithMessage(bool, Option<String>),
}

impl Required {
    pub fn is_required(&self) -> bool {
        match self {
            Required::Flag(flag) | Required::WithMessage(flag, _) => *flag,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Required::Flag(_) => None,
            Required::WithMessage(_, message) => message.as_deref(),
        }
    }

    fn merged_over(self, global: &Required) -> Required {
        match (self, global) {
            (Required::WithMessage(flag, None), Required::WithMessage(_, Some(message))) => {
                Required::WithMessage(flag, Some(message.clone()))
            }
            (field, _) => field,
        }
    }
}

impl From<bool> for Required {
    fn from(flag: bool) -> Self {
        Required::Flag(flag)
    }
}

impl<S: Into<String>> From<(bool, S)> for Required {
    fn from((flag, message): (bool, S)) -> Self {
        Required::WithMessage(flag, Some(message.into()))
    }
}

/// Default value of a field when the input has none
#[derive(Clone)]
pub enum DefaultValue {
    Literal(Value),
    Factory(Factory),
}

impl DefaultValue {
    pub fn literal(value: impl Into<Value>) -> Self {
        DefaultValue::Literal(value.into())
    }

    pub fn factory<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        DefaultValue::Factory(Arc::new(f))
    }

    /// Produce the default, invoking the factory once
    pub fn resolve(&self) -> Value {
        match self {
            DefaultValue::Literal(value) => value.clone(),
            DefaultValue::Factory(f) => f(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
            DefaultValue::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// Validation option of a field
#[derive(Clone)]
pub enum Validate {
    /// `validate: fn`
    Predicate(Predicate),
    /// `validate: { validator, message }`
    Rule {
        validator: Option<Predicate>,
        message: Option<String>,
    },
}

impl Validate {
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Validate::Predicate(Arc::new(f))
    }

    pub fn with_message<F>(f: F, message: impl Into<String>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Validate::Rule {
            validator: Some(Arc::new(f)),
            message: Some(message.into()),
        }
    }

    /// A message-only rule, typically used as a global default
    pub fn message(message: impl Into<String>) -> Self {
        Validate::Rule {
            validator: None,
            message: Some(message.into()),
        }
    }

    fn merged_over(self, global: &Validate) -> Validate {
        match (self, global) {
            (Validate::Predicate(p), _) => Validate::Predicate(p),
            (Validate::Rule { validator, message }, Validate::Rule { validator: gv, message: gm }) => {
                Validate::Rule {
                    validator: validator.or_else(|| gv.clone()),
                    message: message.or_else(|| gm.clone()),
                }
            }
            (Validate::Rule { validator, message }, Validate::Predicate(gp)) => Validate::Rule {
                validator: validator.or_else(|| Some(gp.clone())),
                message,
            },
        }
    }
}

impl fmt::Debug for Validate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validate::Predicate(_) => f.write_str("Predicate(..)"),
            Validate::Rule { validator, message } => f
                .debug_struct("Rule")
                .field("validator", &validator.as_ref().map(|_| ".."))
                .field("message", message)
                .finish(),
        }
    }
}

/// Per-field options before compilation
#[derive(Clone, Default)]
pub struct RuleDescriptor {
    pub type_ref: Option<TypeHandle>,
    pub casting: Option<bool>,
    pub transform: Option<Vec<Transform>>,
    pub required: Option<Required>,
    pub default: Option<DefaultValue>,
    pub validate: Option<Validate>,
}

impl RuleDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptor with only a type
    pub fn of(type_ref: impl Into<TypeHandle>) -> Self {
        Self {
            type_ref: Some(type_ref.into()),
            ..Self::default()
        }
    }

    pub fn type_ref(mut self, type_ref: impl Into<TypeHandle>) -> Self {
        self.type_ref = Some(type_ref.into());
        self
    }

    pub fn casting(mut self, casting: bool) -> Self {
        self.casting = Some(casting);
        self
    }

    /// Append a transform to the pipeline
    pub fn transform<F>(mut self, f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.transform.get_or_insert_with(Vec::new).push(Arc::new(f));
        self
    }

    /// Replace the whole transform pipeline
    pub fn transforms(mut self, transforms: Vec<Transform>) -> Self {
        self.transform = Some(transforms);
        self
    }

    pub fn required(mut self, required: impl Into<Required>) -> Self {
        self.required = Some(required.into());
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(DefaultValue::literal(value));
        self
    }

    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::factory(f));
        self
    }

    pub fn validate(mut self, validate: Validate) -> Self {
        self.validate = Some(validate);
        self
    }

    /// Shorthand for a bare predicate validator
    pub fn validator<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.validate(Validate::predicate(f))
    }

    /// Merge `global` under this descriptor; options set here win.
    ///
    /// Scalars and the transform list are replaced wholesale. `required` and
    /// `validate` are merged key by key when both sides use the structured form.
    pub fn merged_over(self, global: &RuleDescriptor) -> RuleDescriptor {
        RuleDescriptor {
            type_ref: self.type_ref.or_else(|| global.type_ref.clone()),
            casting: self.casting.or(global.casting),
            transform: self.transform.or_else(|| global.transform.clone()),
            required: match (self.required, &global.required) {
                (Some(field), Some(global)) => Some(field.merged_over(global)),
                (field, global) => field.or_else(|| global.clone()),
            },
            default: self.default.or_else(|| global.default.clone()),
            validate: match (self.validate, &global.validate) {
                (Some(field), Some(global)) => Some(field.merged_over(global)),
                (field, global) => field.or_else(|| global.clone()),
            },
        }
    }
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("type_ref", &self.type_ref)
            .field("casting", &self.casting)
            .field("transform", &self.transform.as_ref().map(Vec::len))
            .field("required", &self.required)
            .field("default", &self.default)
            .field("validate", &self.validate)
            .finish()
    }
}

/// A blueprint entry: a bare type or a full descriptor
#[derive(Clone, Debug)]
pub enum FieldSpec {
    Raw(TypeHandle),
    Descriptor(RuleDescriptor),
}

impl FieldSpec {
    /// Normalize into a descriptor
    pub fn into_descriptor(self) -> RuleDescriptor {
        match self {
            FieldSpec::Raw(type_ref) => RuleDescriptor::of(type_ref),
            FieldSpec::Descriptor(descriptor) => descriptor,
        }
    }
}

impl From<crate::types::Kind> for FieldSpec {
    fn from(kind: crate::types::Kind) -> Self {
        FieldSpec::Raw(kind.into())
    }
}

impl From<TypeHandle> for FieldSpec {
    fn from(type_ref: TypeHandle) -> Self {
        FieldSpec::Raw(type_ref)
    }
}

impl From<RuleDescriptor> for FieldSpec {
    fn from(descriptor: RuleDescriptor) -> Self {
        FieldSpec::Descriptor(descriptor)
    }
}

/// Ordered mapping from field name to its spec
#[derive(Clone, Debug, Default)]
pub struct Blueprint {
    fields: Vec<(String, FieldSpec)>,
}

impl Blueprint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field; redeclaring a name replaces it in place
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<FieldSpec>) {
        let name = name.into();
        let spec = spec.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = spec,
            None => self.fields.push((name, spec)),
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl IntoIterator for Blueprint {
    type Item = (String, FieldSpec);
    type IntoIter = std::vec::IntoIter<(String, FieldSpec)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl<N, S> FromIterator<(N, S)> for Blueprint
where
    N: Into<String>,
    S: Into<FieldSpec>,
{
    fn from_iter<I: IntoIterator<Item = (N, S)>>(iter: I) -> Self {
        let mut blueprint = Blueprint::new();
        for (name, spec) in iter {
            blueprint.insert(name, spec);
        }
        blueprint
    }
}

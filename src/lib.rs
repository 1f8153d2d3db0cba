//! Osom Object Normalizer
//!
//! Compile a declarative blueprint of expected fields once, then normalize any
//! number of JSON objects against it.
//!
//! ## Features
//!
//! - **Casting**: Input values are strictly coerced to the declared type
//! - **Defaults**: Literal values or factories fill missing fields
//! - **Transforms**: Ordered value transforms run after casting
//! - **Validation**: Predicates with optional `{VALUE}` message templates
//! - **Whitelisting**: Undeclared fields never reach the output
//!
//! ## Pipeline
//!
//! ```text
//! Blueprint + global rules
//!     │  compile (once)
//!     ▼
//! Schema ──apply(input)──► presence → guard → cast/default → transform → validate → output
//! ```
//!
//! ## Example
//!
//! ```
//! use osom::{create_schema, transforms, Blueprint, Kind, RuleDescriptor};
//! use serde_json::json;
//!
//! let normalize = create_schema(
//!     Blueprint::new()
//!         .field("age", Kind::Number)
//!         .field("name", RuleDescriptor::of(Kind::String).transforms(vec![transforms::trim()])),
//!     None,
//! )
//! .unwrap();
//!
//! let input = json!({"age": "23", "name": "  Kitt  ", "extra": true});
//! let output = normalize(input.as_object()).unwrap();
//! assert_eq!(serde_json::Value::Object(output), json!({"age": 23, "name": "Kitt"}));
//! ```

pub mod compiler;
pub mod config;
pub mod error;
pub mod schema;
pub mod transforms;
pub mod types;
pub mod validators;

pub use compiler::{compile, create_schema, CompiledRule, Schema, Validator};
pub use config::NormalizerConfig;
pub use error::{Result, SchemaError};
pub use schema::{Blueprint, DefaultValue, FieldSpec, Required, RuleDescriptor, Validate};
pub use types::{CastError, Kind, TypeHandle, TypeRef};

//! Error types for schema compilation and normalization

use thiserror::Error;

use crate::types::CastError;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Schema compilation and normalization errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// A required field is missing, or casting is disabled and the value has the wrong type
    #[error("{message}")]
    TypeMismatch { field: String, message: String },

    /// A validator rejected the final value of a field
    #[error("{message}")]
    Validation { field: String, message: String },

    /// The type's coercion rejected the input value
    #[error("Cannot cast '{}' to {{{}}} for '{}'.", .source.value, .source.expected, .field)]
    Cast {
        field: String,
        #[source]
        source: CastError,
    },

    #[error("Field '{0}' has no type after merging global rules")]
    MissingType(String),

    #[error("Field '{0}' uses a type with an empty name")]
    UnnamedType(String),

    #[error("Field '{0}' declares a validation message without a validator")]
    MissingValidator(String),

    #[error("Invalid input: expected an object, got {0}")]
    InvalidInput(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl SchemaError {
    /// Name of the field that caused the error, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            SchemaError::TypeMismatch { field, .. }
            | SchemaError::Validation { field, .. }
            | SchemaError::Cast { field, .. } => Some(field),
            SchemaError::MissingType(field)
            | SchemaError::UnnamedType(field)
            | SchemaError::MissingValidator(field) => Some(field),
            _ => None,
        }
    }

    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, SchemaError::TypeMismatch { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, SchemaError::Validation { .. })
    }
}

//! Errors surfaced while building, checking, or converting catalog entities.

use sdc_schema::yaml::YamlConversionError;
use sdc_schema::{SchemaError, ValidationError};
use thiserror::Error;

/// Top-level error type for typed catalog operations.
#[derive(Error, Debug)]
pub enum ModelError {
    /// The schema registry could not be built.
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// The document (or the candidate state of an assignment) failed
    /// validation. Carries every violation found.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// JSON text could not be parsed or emitted.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML text could not be emitted.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// YAML text could not be parsed into a JSON-compatible value.
    #[error(transparent)]
    YamlConversion(#[from] YamlConversionError),

    /// A validated record did not fit the typed entity. Indicates the
    /// registry and the Rust types disagree about the entity's fields.
    #[error("cannot convert validated '{entity}' record: {reason}")]
    Conversion { entity: String, reason: String },
}

impl ModelError {
    /// The validation violations, when this is a validation failure.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(e) => Some(e),
            _ => None,
        }
    }
}

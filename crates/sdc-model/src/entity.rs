//! # The `CatalogEntity` trait
//!
//! Connects a typed Rust record to its schema entity. Every typed value
//! enters the program through [`CatalogEntity::from_document`], which runs
//! the full [`Validator`] before any Rust value is built, so a document
//! either yields a complete record or a [`ValidationError`] listing every
//! problem. There is no partially populated result.
//!
//! [`CatalogEntity::assign`] gives the same guarantee for updates: the
//! candidate state is validated exactly like a fresh document and `self`
//! is replaced only on success.
//!
//! [`ValidationError`]: sdc_schema::ValidationError

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use sdc_schema::{SchemaRegistry, ValidatedRecord, Validator};

use crate::error::ModelError;

/// A typed record backed by a schema entity of the same name.
pub trait CatalogEntity: Serialize + DeserializeOwned + Sized {
    /// Name of the schema entity this type represents.
    const ENTITY: &'static str;

    /// Validate `document` as [`Self::ENTITY`] and build the typed record.
    fn from_document(registry: &SchemaRegistry, document: &Value) -> Result<Self, ModelError> {
        let record = Validator::new(registry).validate(Self::ENTITY, document)?;
        Self::from_record(&record)
    }

    /// Build the typed record from an already validated record.
    fn from_record(record: &ValidatedRecord) -> Result<Self, ModelError> {
        if record.entity() != Self::ENTITY {
            return Err(ModelError::Conversion {
                entity: Self::ENTITY.to_string(),
                reason: format!("record was validated as '{}'", record.entity()),
            });
        }
        serde_json::from_value(record.to_value()).map_err(|e| ModelError::Conversion {
            entity: Self::ENTITY.to_string(),
            reason: e.to_string(),
        })
    }

    /// Render as a document in declared field order. Absent optional
    /// fields are omitted, never `null`.
    fn to_document(&self) -> Result<Value, ModelError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Re-check this value against the registry, including cross-field
    /// invariants. Useful for values assembled in code.
    fn validate(&self, registry: &SchemaRegistry) -> Result<(), ModelError> {
        let document = self.to_document()?;
        Validator::new(registry).validate(Self::ENTITY, &document)?;
        Ok(())
    }

    /// Set `field` to `value` (`null` clears it) with validate-on-assignment
    /// semantics. On any error `self` is left untouched.
    fn assign(&mut self, registry: &SchemaRegistry, field: &str, value: Value) -> Result<(), ModelError> {
        let mut document = self.to_document()?;
        let Value::Object(map) = &mut document else {
            return Err(ModelError::Conversion {
                entity: Self::ENTITY.to_string(),
                reason: "entity did not serialize to an object".to_string(),
            });
        };
        map.insert(field.to_string(), value);

        let updated = Self::from_document(registry, &document)?;
        tracing::debug!(entity = Self::ENTITY, field, "field assigned");
        *self = updated;
        Ok(())
    }
}

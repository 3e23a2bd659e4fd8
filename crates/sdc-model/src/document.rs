//! # Catalog documents
//!
//! Conversion between a [`Container`] and its document form, as a JSON
//! value tree or as JSON/YAML text.
//!
//! Both directions pass through the [`Validator`]. Input is checked before a
//! typed value is built. Output is checked before it is returned, so a
//! [`Container`] edited through its public fields cannot be emitted in a
//! state that [`deserialize`] would reject. Output lists fields in declared
//! order and omits absent optional fields (never `null`), so for any valid
//! document `d`, `serialize(reg, &deserialize(reg, &d)?)? == d`, list order
//! included.
//!
//! YAML input is converted to a JSON value tree first and validated the
//! same way; only the JSON-compatible subset of YAML is accepted.

use serde_json::Value;

use sdc_schema::yaml::yaml_str_to_json_value;
use sdc_schema::{SchemaRegistry, Validator};

use crate::container::Container;
use crate::entity::CatalogEntity;
use crate::error::ModelError;

/// Validate `document` as a Container and build the typed value.
pub fn deserialize(registry: &SchemaRegistry, document: &Value) -> Result<Container, ModelError> {
    let container = Container::from_document(registry, document)?;
    tracing::debug!(
        catalog = %container.datacatalog.identifier,
        datasets = container.datasets().count(),
        concepts = container.concepts().count(),
        "container deserialized"
    );
    Ok(container)
}

/// Render `container` as a document value.
///
/// # Errors
///
/// Returns [`ModelError::Validation`] when the container no longer
/// satisfies the schema, e.g. after a duplicate member was pushed onto one
/// of its lists.
pub fn serialize(registry: &SchemaRegistry, container: &Container) -> Result<Value, ModelError> {
    let value = container.to_document()?;
    Validator::new(registry).validate(Container::ENTITY, &value)?;
    tracing::debug!(catalog = %container.datacatalog.identifier, "container serialized");
    Ok(value)
}

pub fn from_json_str(registry: &SchemaRegistry, text: &str) -> Result<Container, ModelError> {
    let value: Value = serde_json::from_str(text)?;
    deserialize(registry, &value)
}

pub fn from_yaml_str(registry: &SchemaRegistry, text: &str) -> Result<Container, ModelError> {
    let value = yaml_str_to_json_value(text)?;
    deserialize(registry, &value)
}

pub fn to_json_string_pretty(registry: &SchemaRegistry, container: &Container) -> Result<String, ModelError> {
    Ok(serde_json::to_string_pretty(&serialize(registry, container)?)?)
}

pub fn to_yaml_string(registry: &SchemaRegistry, container: &Container) -> Result<String, ModelError> {
    Ok(serde_yaml::to_string(&serialize(registry, container)?)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_container() {
        let reg = SchemaRegistry::catalog().unwrap();
        let doc = json!({
            "datacatalog": {"identifier": "cat-1"},
            "datasets": [{"identifier": "ds-1", "title": "Rainfall"}]
        });
        let container = deserialize(&reg, &doc).unwrap();
        assert_eq!(container.datacatalog.identifier, "cat-1");
        assert_eq!(container.dataset("ds-1").and_then(|d| d.title.as_deref()), Some("Rainfall"));
        assert!(container.concepts.is_none());

        // Output follows declared order: datasets before datacatalog.
        let out = serialize(&reg, &container).unwrap();
        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["datasets", "datacatalog"]);
        assert_eq!(out, doc);
    }

    #[test]
    fn test_missing_datacatalog_single_violation() {
        let reg = SchemaRegistry::catalog().unwrap();
        let err = deserialize(&reg, &json!({"datasets": []})).unwrap_err();
        let v = err.as_validation().unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v.violations()[0].kind.field(), Some("datacatalog"));
    }

    #[test]
    fn test_json_text_errors() {
        let reg = SchemaRegistry::catalog().unwrap();
        assert!(matches!(from_json_str(&reg, "{"), Err(ModelError::Json(_))));
        assert!(matches!(from_yaml_str(&reg, "a: [1"), Err(ModelError::YamlConversion(_))));
    }

    #[test]
    fn test_yaml_text_round_trip() {
        let reg = SchemaRegistry::catalog().unwrap();
        let yaml = "\
datasets:
  - identifier: ds-1
    title: Rainfall
datacatalog:
  identifier: cat-1
  dataset:
    - ds-1
distributions:
  - identifier: dist-1
    modified: 2024-03-01
";
        let container = from_yaml_str(&reg, yaml).unwrap();
        let modified = container.distribution("dist-1").and_then(|d| d.modified);
        assert_eq!(modified.map(|d| d.to_string()).as_deref(), Some("2024-03-01"));

        let emitted = to_yaml_string(&reg, &container).unwrap();
        assert_eq!(from_yaml_str(&reg, &emitted).unwrap(), container);
    }

    #[test]
    fn test_pretty_json_round_trip() {
        let reg = SchemaRegistry::catalog().unwrap();
        let doc = json!({"datacatalog": {"identifier": "cat-1", "title": "Main"}});
        let container = deserialize(&reg, &doc).unwrap();
        let text = to_json_string_pretty(&reg, &container).unwrap();
        assert!(text.contains('\n'));
        assert_eq!(from_json_str(&reg, &text).unwrap(), container);
    }
}

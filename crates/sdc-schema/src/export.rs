//! JSON Schema (Draft 2020-12) rendering of a [`SchemaRegistry`].
//!
//! Each entity becomes a `$defs` entry with `additionalProperties: false`.
//! The document's top-level `$ref` points at the tree root, so a Container
//! document can be checked with any off-the-shelf JSON Schema validator.
//!
//! The export covers the structural rules only. Ordering rules and
//! identifier uniqueness have no JSON Schema equivalent and are enforced by
//! the [`Validator`](crate::Validator) alone, as is calendar validity of
//! dates (the export checks the `YYYY-MM-DD` form).

use serde_json::{json, Map, Value};

use sdc_core::PrimitiveKind;

use crate::registry::{EntityDefinition, FieldSpec, SchemaRegistry, Shape};

pub const DRAFT_2020_12: &str = "https://json-schema.org/draft/2020-12/schema";

// ASCII classes only: `\d` is Unicode-aware in most regex engines.
const DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$";
const DECIMAL_PATTERN: &str = r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$";
const NON_BLANK_PATTERN: &str = r"\S";

/// Render the registry as a JSON Schema document.
pub fn to_json_schema(registry: &SchemaRegistry) -> Value {
    let defs: Map<String, Value> = registry
        .definitions()
        .map(|def| (def.name.clone(), entity_schema(def)))
        .collect();

    let mut schema = Map::new();
    schema.insert("$schema".into(), json!(DRAFT_2020_12));
    schema.insert("title".into(), json!(registry.name()));
    if let Some(version) = registry.version() {
        schema.insert("version".into(), json!(version));
    }
    if let Some(root) = registry.tree_root() {
        schema.insert("$ref".into(), json!(def_ref(root)));
    }
    schema.insert("$defs".into(), Value::Object(defs));
    Value::Object(schema)
}

impl SchemaRegistry {
    /// See [`to_json_schema`].
    pub fn to_json_schema(&self) -> Value {
        to_json_schema(self)
    }
}

fn entity_schema(def: &EntityDefinition) -> Value {
    let properties: Map<String, Value> = def
        .fields
        .iter()
        .map(|field| (field.name.clone(), field_schema(field)))
        .collect();
    let required: Vec<&str> = def
        .fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.as_str())
        .collect();

    let mut schema = Map::new();
    if let Some(description) = &def.description {
        schema.insert("description".into(), json!(description));
    }
    schema.insert("type".into(), json!("object"));
    schema.insert("properties".into(), Value::Object(properties));
    if !required.is_empty() {
        schema.insert("required".into(), json!(required));
    }
    schema.insert("additionalProperties".into(), json!(false));
    Value::Object(schema)
}

fn field_schema(field: &FieldSpec) -> Value {
    let mut alternatives: Vec<Value> = field
        .shapes
        .iter()
        .map(|shape| shape_schema(shape, field.identifier))
        .collect();

    let mut value = if alternatives.len() == 1 {
        alternatives.remove(0)
    } else {
        json!({ "anyOf": alternatives })
    };

    if field.multivalued {
        value = json!({ "type": "array", "items": value });
    }
    // `null` is read as "absent", which only optional fields may be.
    if !field.required {
        value = json!({ "anyOf": [value, { "type": "null" }] });
    }

    if let Value::Object(map) = &mut value {
        if let Some(description) = &field.description {
            map.insert("description".into(), json!(description));
        }
        if let Some(default) = &field.default {
            map.insert("default".into(), default.clone());
        }
    }
    value
}

fn shape_schema(shape: &Shape, identifier: bool) -> Value {
    match shape {
        Shape::Entity(name) => json!({ "$ref": def_ref(name) }),
        Shape::Primitive(PrimitiveKind::String) if identifier => {
            json!({ "type": "string", "pattern": NON_BLANK_PATTERN })
        }
        Shape::Primitive(PrimitiveKind::String) => json!({ "type": "string" }),
        Shape::Primitive(PrimitiveKind::Date) => {
            json!({ "type": "string", "format": "date", "pattern": DATE_PATTERN })
        }
        Shape::Primitive(PrimitiveKind::Decimal) => json!({
            "anyOf": [
                { "type": "number" },
                { "type": "string", "pattern": DECIMAL_PATTERN }
            ]
        }),
    }
}

fn def_ref(entity: &str) -> String {
    format!("#/$defs/{entity}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_points_at_tree_root() {
        let schema = SchemaRegistry::catalog().unwrap().to_json_schema();
        assert_eq!(schema["$schema"], DRAFT_2020_12);
        assert_eq!(schema["$ref"], "#/$defs/Container");
        assert_eq!(schema["$defs"].as_object().unwrap().len(), 11);
    }

    #[test]
    fn test_entity_defs_are_closed() {
        let schema = SchemaRegistry::catalog().unwrap().to_json_schema();
        for (name, def) in schema["$defs"].as_object().unwrap() {
            assert_eq!(def["additionalProperties"], false, "{name} must be closed");
            assert_eq!(def["type"], "object");
        }
    }

    #[test]
    fn test_properties_follow_effective_order() {
        let reg = SchemaRegistry::catalog().unwrap();
        let schema = reg.to_json_schema();
        let props: Vec<&String> = schema["$defs"]["DataCatalog"]["properties"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(props, reg.get_definition("DataCatalog").unwrap().field_names());
    }

    #[test]
    fn test_required_and_shapes() {
        let schema = SchemaRegistry::catalog().unwrap().to_json_schema();
        let container = &schema["$defs"]["Container"];
        assert_eq!(container["required"], json!(["datacatalog"]));
        assert_eq!(container["properties"]["datacatalog"], json!({"$ref": "#/$defs/DataCatalog"}));

        let contact = &schema["$defs"]["Resource"]["properties"]["contactPoint"];
        assert_eq!(
            contact["anyOf"][0],
            json!({"anyOf": [{"type": "string"}, {"$ref": "#/$defs/Kind"}]})
        );
        assert_eq!(contact["anyOf"][1], json!({"type": "null"}));
    }

    #[test]
    fn test_identifier_pattern() {
        let schema = SchemaRegistry::catalog().unwrap().to_json_schema();
        let id = &schema["$defs"]["Concept"]["properties"]["identifier"];
        assert_eq!(id["pattern"], NON_BLANK_PATTERN);
    }

    #[test]
    fn test_multivalued_and_dates() {
        let schema = SchemaRegistry::catalog().unwrap().to_json_schema();
        let datasets = &schema["$defs"]["Container"]["properties"]["datasets"];
        assert_eq!(datasets["anyOf"][0]["type"], "array");
        assert_eq!(datasets["anyOf"][0]["items"], json!({"$ref": "#/$defs/Dataset"}));

        let end = &schema["$defs"]["PeriodOfTime"]["properties"]["hasEnd"];
        assert_eq!(end["anyOf"][0]["format"], "date");
    }

    #[test]
    fn test_patterns_use_ascii_digit_classes() {
        for pattern in [DATE_PATTERN, DECIMAL_PATTERN] {
            assert!(!pattern.contains(r"\d"), "{pattern}");
        }
        let schema = SchemaRegistry::catalog().unwrap().to_json_schema();
        let modified = &schema["$defs"]["Distribution"]["properties"]["modified"];
        assert_eq!(modified["anyOf"][0]["pattern"], "^[0-9]{4}-[0-9]{2}-[0-9]{2}$");
    }

    #[test]
    fn test_decimal_and_defaults() {
        let reg = SchemaRegistry::from_json_value(json!({"name": "t", "entities": [
            {"name": "M", "fields": [
                {"name": "amount", "range": "decimal", "required": true},
                {"name": "unit", "default": "EUR"}
            ]}
        ]}))
        .unwrap();
        let schema = reg.to_json_schema();
        assert!(schema.get("$ref").is_none());
        let m = &schema["$defs"]["M"]["properties"];
        assert_eq!(m["amount"]["anyOf"][0], json!({"type": "number"}));
        assert_eq!(m["amount"]["anyOf"][1]["pattern"], DECIMAL_PATTERN);
        assert_eq!(m["unit"]["default"], "EUR");
    }
}

//! # Schema Description
//!
//! The external, serializable form of a catalog schema: a list of entity
//! definitions, each with its fields, optional parent and ordering rules.
//! This is the input the [`SchemaRegistry`](crate::SchemaRegistry) is built
//! from once at startup.
//!
//! Every level uses `deny_unknown_fields`: a typo in a description key is a
//! malformed description, not a silently ignored setting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

fn default_range() -> String {
    "string".to_string()
}

/// A whole schema description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDescription {
    /// Schema name, used in logs and as the exported JSON Schema title.
    pub name: String,
    /// Optional schema version string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Range applied to fields that declare neither `range` nor `any_of`.
    #[serde(default = "default_range")]
    pub default_range: String,
    /// Entity definitions, in declaration order.
    pub entities: Vec<EntityDescription>,
}

/// One entity definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityDescription {
    pub name: String,
    /// Parent entity whose fields this entity inherits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
    /// Marks the document root (at most one per schema).
    #[serde(default)]
    pub tree_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Date fields that must not precede one another.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_before: Vec<NotBeforeDescription>,
    /// Fields declared by this entity (inherited ones are not repeated
    /// unless overridden).
    #[serde(default)]
    pub fields: Vec<FieldDescription>,
}

/// One field declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldDescription {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Identifier fields are required, non-blank, and unique within the
    /// document root's collections.
    #[serde(default)]
    pub identifier: bool,
    #[serde(default)]
    pub multivalued: bool,
    /// A single primitive or entity name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    /// Ordered alternatives; the first matching shape wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<String>,
    /// Value substituted when the field is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

/// `later` must not be an earlier date than `earlier` when both are present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotBeforeDescription {
    pub earlier: String,
    pub later: String,
}

impl FieldDescription {
    /// A plain optional field taking the default range.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            required: false,
            identifier: false,
            multivalued: false,
            range: None,
            any_of: Vec::new(),
            default: None,
        }
    }
}

impl EntityDescription {
    /// An entity with no parent, rules, or fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            is_abstract: false,
            tree_root: false,
            description: None,
            not_before: Vec::new(),
            fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_description_defaults() {
        let desc: SchemaDescription = serde_json::from_value(json!({
            "name": "m",
            "entities": [{"name": "Agent", "fields": [{"name": "name"}]}]
        }))
        .unwrap();
        assert_eq!(desc.default_range, "string");
        assert_eq!(desc.version, None);
        let field = &desc.entities[0].fields[0];
        assert!(!field.required && !field.multivalued && !field.identifier);
        assert!(field.range.is_none() && field.any_of.is_empty());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = serde_json::from_value::<SchemaDescription>(json!({
            "name": "m",
            "entities": [{"name": "Agent", "fields": [{"name": "name", "optional": true}]}]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_abstract_keyword() {
        let entity: EntityDescription =
            serde_json::from_value(json!({"name": "Resource", "abstract": true})).unwrap();
        assert!(entity.is_abstract);
    }
}

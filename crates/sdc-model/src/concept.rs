//! SKOS concepts, used as dataset themes.

use serde::{Deserialize, Serialize};

use sdc_core::Identifier;

use crate::entity::CatalogEntity;

/// A unit of thought in a controlled vocabulary (`skos:Concept`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub pref_label: String,
    /// Unique among the container's concepts.
    pub identifier: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt_label: Option<String>,
}

impl Concept {
    pub fn new(identifier: Identifier, pref_label: impl Into<String>) -> Self {
        Self {
            pref_label: pref_label.into(),
            identifier,
            example: None,
            alt_label: None,
        }
    }

    pub fn with_alt_label(mut self, label: impl Into<String>) -> Self {
        self.alt_label = Some(label.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.example = Some(example.into());
        self
    }
}

impl CatalogEntity for Concept {
    const ENTITY: &'static str = "Concept";
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdc_schema::{SchemaRegistry, ViolationKind};
    use serde_json::json;

    #[test]
    fn test_concept_requires_label() {
        let reg = SchemaRegistry::catalog().unwrap();
        let err = Concept::from_document(&reg, &json!({"identifier": "c1"})).unwrap_err();
        let v = err.as_validation().unwrap();
        assert_eq!(
            v.violations()[0].kind,
            ViolationKind::MissingField { field: "prefLabel".into() }
        );
    }

    #[test]
    fn test_concept_document_order() {
        let concept = Concept::new(Identifier::new("c1").unwrap(), "Climate").with_alt_label("Weather");
        let doc = concept.to_document().unwrap();
        assert_eq!(doc, json!({"prefLabel": "Climate", "identifier": "c1", "altLabel": "Weather"}));
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["prefLabel", "identifier", "altLabel"]);
    }
}

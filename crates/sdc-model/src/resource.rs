//! # Resources: Resource, Dataset, DatasetSeries, DataCatalog
//!
//! The DCAT resource hierarchy, expressed by composition:
//!
//! ```text
//! Resource ◀── Dataset ◀── DatasetSeries
//!                 ▲
//!                 └─────── DataCatalog
//! ```
//!
//! Each subtype embeds its parent with `#[serde(flatten)]`, so the document
//! form is a single flat object with the parent's fields first, matching the
//! registry's effective field order. `Deref` exposes the parent's fields
//! directly (`catalog.identifier`, `series.title`).
//!
//! `publisher`, `contactPoint` and `theme` accept either a string or an
//! embedded record. The sum types list their variants in schema order and
//! are `untagged`, so the first matching shape wins on input and the
//! variant decides the output form.

use std::ops::Deref;

use serde::{Deserialize, Serialize};

use sdc_core::Identifier;

use crate::concept::Concept;
use crate::contact::{Agent, Kind};
use crate::entity::CatalogEntity;

// ─── Shape sum types ─────────────────────────────────────────────────

/// `publisher`: a URI or name, or an embedded [`Agent`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Publisher {
    Uri(String),
    Agent(Agent),
}

/// `contactPoint`: free text, or an embedded vCard [`Kind`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContactPoint {
    Text(String),
    Kind(Kind),
}

/// `theme`: a concept reference as text, or an embedded [`Concept`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Theme {
    Text(String),
    Concept(Concept),
}

impl From<String> for Publisher {
    fn from(s: String) -> Self {
        Self::Uri(s)
    }
}

impl From<Agent> for Publisher {
    fn from(agent: Agent) -> Self {
        Self::Agent(agent)
    }
}

impl From<String> for ContactPoint {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Kind> for ContactPoint {
    fn from(kind: Kind) -> Self {
        Self::Kind(kind)
    }
}

impl From<String> for Theme {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Concept> for Theme {
    fn from(concept: Concept) -> Self {
        Self::Concept(concept)
    }
}

// ─── Resource ────────────────────────────────────────────────────────

/// A resource published or curated by a single agent (`dcat:Resource`).
///
/// Abstract in the schema: documents never validate as a bare Resource
/// member of a container, but every concrete resource carries these fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Unique within the catalog's resource namespace.
    pub identifier: Identifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<Publisher>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_point: Option<ContactPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Identifier of the [`DatasetSeries`] this resource belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_series: Option<String>,
    /// Identifier of a [`Distribution`](crate::Distribution).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<String>,
}

impl Resource {
    pub fn new(identifier: Identifier) -> Self {
        Self {
            identifier,
            description: None,
            title: None,
            publisher: None,
            contact_point: None,
            status: None,
            theme: None,
            in_series: None,
            distribution: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_publisher(mut self, publisher: impl Into<Publisher>) -> Self {
        self.publisher = Some(publisher.into());
        self
    }

    pub fn with_contact_point(mut self, contact: impl Into<ContactPoint>) -> Self {
        self.contact_point = Some(contact.into());
        self
    }

    pub fn with_theme(mut self, theme: impl Into<Theme>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_series(mut self, series: impl Into<String>) -> Self {
        self.in_series = Some(series.into());
        self
    }

    pub fn with_distribution(mut self, distribution: impl Into<String>) -> Self {
        self.distribution = Some(distribution.into());
        self
    }
}

// ─── Dataset ─────────────────────────────────────────────────────────

/// A collection of data published by a single agent (`dcat:Dataset`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(flatten)]
    pub resource: Resource,
    /// Period descriptor, as free text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<String>,
}

impl Dataset {
    pub fn new(identifier: Identifier) -> Self {
        Resource::new(identifier).into()
    }

    pub fn with_temporal(mut self, temporal: impl Into<String>) -> Self {
        self.temporal = Some(temporal.into());
        self
    }
}

impl From<Resource> for Dataset {
    fn from(resource: Resource) -> Self {
        Self {
            resource,
            temporal: None,
        }
    }
}

impl Deref for Dataset {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        &self.resource
    }
}

impl CatalogEntity for Dataset {
    const ENTITY: &'static str = "Dataset";
}

// ─── DatasetSeries ───────────────────────────────────────────────────

/// A dataset that stands for a series of related datasets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSeries {
    #[serde(flatten)]
    pub dataset: Dataset,
}

impl DatasetSeries {
    pub fn new(identifier: Identifier) -> Self {
        Dataset::new(identifier).into()
    }
}

impl From<Dataset> for DatasetSeries {
    fn from(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl Deref for DatasetSeries {
    type Target = Dataset;

    fn deref(&self) -> &Dataset {
        &self.dataset
    }
}

impl CatalogEntity for DatasetSeries {
    const ENTITY: &'static str = "DatasetSeries";
}

// ─── DataCatalog ─────────────────────────────────────────────────────

/// A curated collection of metadata about datasets (`dcat:Catalog`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataCatalog {
    #[serde(flatten)]
    pub dataset: Dataset,
    /// Identifiers of the listed datasets or series, in catalog order.
    #[serde(rename = "dataset", default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<String>>,
}

impl DataCatalog {
    pub fn new(identifier: Identifier) -> Self {
        Dataset::new(identifier).into()
    }

    pub fn with_datasets<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.datasets = Some(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Listed dataset identifiers; empty when the field is absent.
    pub fn dataset_ids(&self) -> impl Iterator<Item = &str> {
        self.datasets.iter().flatten().map(String::as_str)
    }
}

impl From<Dataset> for DataCatalog {
    fn from(dataset: Dataset) -> Self {
        Self {
            dataset,
            datasets: None,
        }
    }
}

impl Deref for DataCatalog {
    type Target = Dataset;

    fn deref(&self) -> &Dataset {
        &self.dataset
    }
}

impl CatalogEntity for DataCatalog {
    const ENTITY: &'static str = "DataCatalog";
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdc_schema::SchemaRegistry;
    use serde_json::json;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    #[test]
    fn test_dataset_from_document() {
        let reg = SchemaRegistry::catalog().unwrap();
        let ds = Dataset::from_document(&reg, &json!({"identifier": "ds-1", "title": "Rainfall"})).unwrap();
        assert_eq!(ds.identifier, "ds-1");
        assert_eq!(ds.title.as_deref(), Some("Rainfall"));
        assert_eq!(ds.temporal, None);
    }

    #[test]
    fn test_flattened_field_order() {
        let catalog = DataCatalog::from(
            Dataset::from(Resource::new(id("cat-1")).with_title("Main").with_series("s1")).with_temporal("2024"),
        )
        .with_datasets(["ds-1"]);
        let doc = catalog.to_document().unwrap();
        let keys: Vec<&String> = doc.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["identifier", "title", "inSeries", "temporal", "dataset"]);
    }

    #[test]
    fn test_deref_chain() {
        let series = DatasetSeries::new(id("s1"));
        assert_eq!(series.identifier.as_str(), "s1");
        assert!(series.temporal.is_none());
    }

    #[test]
    fn test_contact_point_shapes() {
        let reg = SchemaRegistry::catalog().unwrap();
        let text = Dataset::from_document(&reg, &json!({"identifier": "a", "contactPoint": "ops@example.org"})).unwrap();
        assert_eq!(text.contact_point, Some(ContactPoint::Text("ops@example.org".into())));

        let kind = Dataset::from_document(
            &reg,
            &json!({"identifier": "a", "contactPoint": {"hasEmail": "ops@example.org"}}),
        )
        .unwrap();
        assert!(matches!(
            kind.contact_point,
            Some(ContactPoint::Kind(Kind { has_email: Some(ref e) })) if e == "ops@example.org"
        ));
    }

    #[test]
    fn test_publisher_agent_round_trip() {
        let reg = SchemaRegistry::catalog().unwrap();
        let doc = json!({"identifier": "a", "publisher": {"name": "Met Office"}});
        let ds = Dataset::from_document(&reg, &doc).unwrap();
        assert_eq!(ds.publisher, Some(Publisher::Agent(Agent::named("Met Office"))));
        assert_eq!(ds.to_document().unwrap(), doc);
    }

    #[test]
    fn test_catalog_dataset_ids() {
        let catalog = DataCatalog::new(id("cat-1"));
        assert_eq!(catalog.dataset_ids().count(), 0);
        let catalog = catalog.with_datasets(["a", "b"]);
        assert_eq!(catalog.dataset_ids().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_dataset_rejects_catalog_field() {
        let reg = SchemaRegistry::catalog().unwrap();
        let err = Dataset::from_document(&reg, &json!({"identifier": "a", "dataset": ["x"]})).unwrap_err();
        let violations = err.as_validation().unwrap();
        assert_eq!(violations.violations()[0].kind.field(), Some("dataset"));
    }
}

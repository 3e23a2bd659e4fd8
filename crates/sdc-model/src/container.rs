//! # Container — the document root
//!
//! A `Container` owns every entity of one catalog document. Entities refer
//! to each other by identifier string only (`DataCatalog.dataset`,
//! `Resource.inSeries`, `Resource.distribution`); the lookups here resolve
//! those strings against the container's member lists.
//!
//! Resolution never affects validity: a dangling reference is reported by
//! [`Container::unresolved_references`] but the document still validates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::concept::Concept;
use crate::distribution::Distribution;
use crate::entity::CatalogEntity;
use crate::resource::{DataCatalog, Dataset, DatasetSeries, Resource};

/// Root aggregate holding every entity of one catalog document.
///
/// Member lists are `None` when the document omits them, which is
/// distinct from an explicitly empty list and survives a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datasets: Option<Vec<Dataset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concepts: Option<Vec<Concept>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<DatasetSeries>>,
    pub datacatalog: DataCatalog,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distributions: Option<Vec<Distribution>>,
}

impl CatalogEntity for Container {
    const ENTITY: &'static str = "Container";
}

/// A resource member of a container, whatever its concrete type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ResourceRef<'a> {
    Dataset(&'a Dataset),
    Series(&'a DatasetSeries),
    Catalog(&'a DataCatalog),
}

impl<'a> ResourceRef<'a> {
    /// The shared resource fields.
    pub fn resource(&self) -> &'a Resource {
        match self {
            Self::Dataset(d) => &d.resource,
            Self::Series(s) => &s.dataset.resource,
            Self::Catalog(c) => &c.dataset.resource,
        }
    }

    pub fn identifier(&self) -> &'a str {
        self.resource().identifier.as_str()
    }

    /// Schema entity name of the concrete type.
    pub fn entity(&self) -> &'static str {
        match self {
            Self::Dataset(_) => Dataset::ENTITY,
            Self::Series(_) => DatasetSeries::ENTITY,
            Self::Catalog(_) => DataCatalog::ENTITY,
        }
    }
}

/// A reference field whose target is not in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReference {
    /// Identifier of the resource holding the reference.
    pub source: String,
    /// Document field name, e.g. `inSeries`.
    pub field: &'static str,
    /// The identifier that was not found.
    pub target: String,
}

impl fmt::Display for UnresolvedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} -> '{}' not found", self.source, self.field, self.target)
    }
}

/// The datasets listed by the container's catalog, resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMembers<'a> {
    /// Resolved members in catalog order.
    pub resolved: Vec<ResourceRef<'a>>,
    /// Listed identifiers with no matching dataset or series.
    pub unresolved: Vec<&'a str>,
}

impl Container {
    /// A container holding only its catalog.
    pub fn new(datacatalog: DataCatalog) -> Self {
        Self {
            datasets: None,
            concepts: None,
            series: None,
            datacatalog,
            distributions: None,
        }
    }

    pub fn with_datasets(mut self, datasets: Vec<Dataset>) -> Self {
        self.datasets = Some(datasets);
        self
    }

    pub fn with_concepts(mut self, concepts: Vec<Concept>) -> Self {
        self.concepts = Some(concepts);
        self
    }

    pub fn with_series(mut self, series: Vec<DatasetSeries>) -> Self {
        self.series = Some(series);
        self
    }

    pub fn with_distributions(mut self, distributions: Vec<Distribution>) -> Self {
        self.distributions = Some(distributions);
        self
    }

    // ─── Member iteration ────────────────────────────────────────────

    pub fn datasets(&self) -> impl Iterator<Item = &Dataset> {
        self.datasets.iter().flatten()
    }

    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter().flatten()
    }

    pub fn all_series(&self) -> impl Iterator<Item = &DatasetSeries> {
        self.series.iter().flatten()
    }

    pub fn distributions(&self) -> impl Iterator<Item = &Distribution> {
        self.distributions.iter().flatten()
    }

    /// Every resource member: datasets, series, then the catalog itself.
    pub fn resources(&self) -> impl Iterator<Item = ResourceRef<'_>> {
        self.datasets()
            .map(ResourceRef::Dataset)
            .chain(self.all_series().map(ResourceRef::Series))
            .chain(std::iter::once(ResourceRef::Catalog(&self.datacatalog)))
    }

    // ─── Lookups ─────────────────────────────────────────────────────

    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets().find(|d| d.identifier == id)
    }

    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts().find(|c| c.identifier == id)
    }

    pub fn series(&self, id: &str) -> Option<&DatasetSeries> {
        self.all_series().find(|s| s.identifier == id)
    }

    pub fn distribution(&self, id: &str) -> Option<&Distribution> {
        self.distributions().find(|d| d.identifier == id)
    }

    /// Any resource member with identifier `id`.
    pub fn resource(&self, id: &str) -> Option<ResourceRef<'_>> {
        self.resources().find(|r| r.identifier() == id)
    }

    /// Resolve `datacatalog.dataset` against the datasets and series.
    pub fn resolve_catalog_datasets(&self) -> CatalogMembers<'_> {
        let mut members = CatalogMembers {
            resolved: Vec::new(),
            unresolved: Vec::new(),
        };
        for id in self.datacatalog.dataset_ids() {
            let found = self
                .dataset(id)
                .map(ResourceRef::Dataset)
                .or_else(|| self.series(id).map(ResourceRef::Series));
            match found {
                Some(r) => members.resolved.push(r),
                None => members.unresolved.push(id),
            }
        }
        members
    }

    /// Every `distribution`, `inSeries` and catalog `dataset` reference that
    /// names no member of this container, in member order.
    pub fn unresolved_references(&self) -> Vec<UnresolvedReference> {
        let mut out = Vec::new();

        for r in self.resources() {
            let resource = r.resource();
            if let Some(target) = resource.distribution.as_deref() {
                if self.distribution(target).is_none() {
                    out.push(UnresolvedReference {
                        source: r.identifier().to_string(),
                        field: "distribution",
                        target: target.to_string(),
                    });
                }
            }
            if let Some(target) = resource.in_series.as_deref() {
                if self.series(target).is_none() {
                    out.push(UnresolvedReference {
                        source: r.identifier().to_string(),
                        field: "inSeries",
                        target: target.to_string(),
                    });
                }
            }
        }

        for target in self.resolve_catalog_datasets().unresolved {
            out.push(UnresolvedReference {
                source: self.datacatalog.identifier.to_string(),
                field: "dataset",
                target: target.to_string(),
            });
        }

        if !out.is_empty() {
            tracing::warn!(
                catalog = %self.datacatalog.identifier,
                unresolved = out.len(),
                "container has dangling references"
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdc_core::Identifier;

    fn id(s: &str) -> Identifier {
        Identifier::new(s).unwrap()
    }

    fn sample() -> Container {
        Container::new(DataCatalog::new(id("cat-1")).with_datasets(["ds-1", "s1", "ghost"]))
            .with_datasets(vec![Dataset::from(
                Resource::new(id("ds-1")).with_series("s1").with_distribution("dist-1"),
            )])
            .with_series(vec![DatasetSeries::new(id("s1"))])
            .with_concepts(vec![Concept::new(id("c1"), "Climate")])
            .with_distributions(vec![Distribution::new(id("dist-1"))])
    }

    #[test]
    fn test_lookups() {
        let c = sample();
        assert!(c.dataset("ds-1").is_some());
        assert!(c.dataset("s1").is_none());
        assert!(c.series("s1").is_some());
        assert_eq!(c.concept("c1").map(|c| c.pref_label.as_str()), Some("Climate"));
        assert!(c.distribution("dist-1").is_some());
        assert_eq!(c.resource("cat-1").map(|r| r.entity()), Some("DataCatalog"));
        assert_eq!(c.resource("s1").map(|r| r.entity()), Some("DatasetSeries"));
        assert!(c.resource("c1").is_none());
    }

    #[test]
    fn test_resolve_catalog_datasets() {
        let c = sample();
        let members = c.resolve_catalog_datasets();
        let ids: Vec<&str> = members.resolved.iter().map(|r| r.identifier()).collect();
        assert_eq!(ids, ["ds-1", "s1"]);
        assert_eq!(members.unresolved, ["ghost"]);
    }

    #[test]
    fn test_unresolved_references() {
        let mut c = sample();
        assert_eq!(
            c.unresolved_references(),
            [UnresolvedReference {
                source: "cat-1".into(),
                field: "dataset",
                target: "ghost".into(),
            }]
        );

        c.distributions = None;
        let unresolved = c.unresolved_references();
        assert_eq!(unresolved.len(), 2);
        assert_eq!(unresolved[0].to_string(), "ds-1.distribution -> 'dist-1' not found");
    }

    #[test]
    fn test_absent_lists_iterate_empty() {
        let c = Container::new(DataCatalog::new(id("cat-1")));
        assert_eq!(c.datasets().count(), 0);
        assert_eq!(c.resources().count(), 1);
        assert!(c.unresolved_references().is_empty());
    }
}

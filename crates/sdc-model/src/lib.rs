//! # sdc-model — Typed Catalog Entities
//!
//! Rust types for the Simple Data Catalog vocabulary (DCAT, DCTERMS, FOAF,
//! vCard, SKOS) and validated conversion between those types and JSON or
//! YAML documents.
//!
//! ## Entities
//!
//! | type | schema entity | module |
//! |------|---------------|--------|
//! | [`Resource`] (abstract), [`Dataset`], [`DatasetSeries`], [`DataCatalog`] | dcat resources | `resource` |
//! | [`Agent`], [`Kind`] | foaf / vcard | `contact` |
//! | [`Concept`] | skos | `concept` |
//! | [`Distribution`], [`LicenseDocument`] | dcat / dcterms | `distribution` |
//! | [`PeriodOfTime`] | dcterms | `period` |
//! | [`Container`] | document root | `container` |
//!
//! Inheritance is composition: a subtype embeds its parent with
//! `#[serde(flatten)]` and derefs to it. Fields with several allowed
//! shapes are `untagged` sum types ([`Publisher`], [`ContactPoint`],
//! [`Theme`]).
//!
//! ## Validation
//!
//! Every typed value read from a document has passed the
//! [`Validator`](sdc_schema::Validator) first (see [`CatalogEntity`]).
//! Cross-entity links stay identifier strings; the [`Container`] owns all
//! members and resolves links by lookup.
//!
//! ## Crate Policy
//!
//! - The [`SchemaRegistry`](sdc_schema::SchemaRegistry) is always passed in
//!   by the caller; this crate holds no global state.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod concept;
pub mod contact;
pub mod container;
pub mod distribution;
pub mod document;
pub mod entity;
pub mod error;
pub mod period;
pub mod resource;

pub use concept::Concept;
pub use contact::{Agent, Kind};
pub use container::{CatalogMembers, Container, ResourceRef, UnresolvedReference};
pub use distribution::{Distribution, LicenseDocument};
pub use document::{deserialize, from_json_str, from_yaml_str, serialize, to_json_string_pretty, to_yaml_string};
pub use entity::CatalogEntity;
pub use error::ModelError;
pub use period::PeriodOfTime;
pub use resource::{ContactPoint, DataCatalog, Dataset, DatasetSeries, Publisher, Resource, Theme};

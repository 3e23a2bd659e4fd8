//! # sdc-schema — Schema Registry & Validation
//!
//! Turns a declarative catalog schema description into an immutable
//! [`SchemaRegistry`] and checks JSON documents against it.
//!
//! ## Registry (`registry`, `description`)
//!
//! The registry is built once from a JSON or YAML description (the catalog
//! schema is embedded; see [`SchemaSource`] for loading another). Each entity
//! is resolved to its **effective field set**: inherited fields first,
//! root-most ancestor first, own fields last. Every structural problem in
//! the description is a fatal [`SchemaError`].
//!
//! ## Validation (`validate`, `invariants`)
//!
//! [`Validator::validate`] is closed-world: unknown keys are rejected at
//! every level. All structural violations of a document are accumulated and
//! returned together in one [`ValidationError`]; cross-field invariants
//! (date ordering, identifier uniqueness within the tree root) run only on
//! a structurally clean document. A successful call yields a
//! [`ValidatedRecord`] in declared field order with defaults applied.
//!
//! ## Export (`export`)
//!
//! [`SchemaRegistry::to_json_schema`] renders the registry as a Draft
//! 2020-12 JSON Schema document for use by external tooling.
//!
//! ## Crate Policy
//!
//! - Depends only on `sdc-core` internally.
//! - No global state: the registry is passed explicitly by reference.
//! - Violations carry a JSON Pointer path, the entity being checked, and
//!   the expected-vs-found detail.

pub mod config;
pub mod description;
pub mod export;
mod invariants;
pub mod registry;
pub mod validate;
pub mod yaml;

pub use config::{SchemaSource, SCHEMA_PATH_ENV};
pub use description::{EntityDescription, FieldDescription, NotBeforeDescription, SchemaDescription};
pub use export::to_json_schema;
pub use registry::{EntityDefinition, FieldSpec, OrderingRule, SchemaError, SchemaRegistry, Shape};
pub use validate::{FieldValue, ValidatedRecord, ValidationError, Validator, Violation, ViolationKind};

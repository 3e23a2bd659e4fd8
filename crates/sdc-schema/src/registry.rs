//! # Schema Registry
//!
//! A read-only table mapping entity names to their **effective field sets**,
//! built once from a [`SchemaDescription`].
//!
//! ## Inheritance as field-set composition
//!
//! A subtype lists its parent; it is not a language-level subclass. The
//! effective field set of an entity is computed by walking the parent chain
//! root-first:
//!
//! ```text
//! Resource      identifier description title ... distribution
//!    │
//! Dataset       (Resource fields) temporal
//!    │
//! DataCatalog   (Dataset fields) dataset
//! ```
//!
//! A field redeclared by a subtype replaces the inherited constraints in
//! place (most specific declaration wins) but keeps the inherited position.
//!
//! ## Construction checks
//!
//! Building a registry fails with [`SchemaError`] when the description has
//! duplicate entities or fields, dangling parent or range names, inheritance
//! cycles, ordering rules over non-date fields, defaults that do not conform
//! to their own field, or required reference cycles that no finite document
//! could ever satisfy.
//!
//! ## Thread Safety
//!
//! `SchemaRegistry` owns all of its data and exposes no `&mut` API, so a
//! single instance can be shared across threads without locking.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;

use sdc_core::PrimitiveKind;
use serde_json::Value;
use thiserror::Error;

use crate::config::SchemaSource;
use crate::description::{EntityDescription, FieldDescription, SchemaDescription};
use crate::validate::Validator;
use crate::yaml::{yaml_str_to_json_value, YamlConversionError};

/// The catalog schema description compiled into this crate.
const CATALOG_SCHEMA: &str = include_str!("../../../schemas/data_catalog.schema.yaml");

/// Error building a registry from a schema description. Always fatal.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The description could not be decoded.
    #[error("malformed schema description: {0}")]
    Parse(String),

    /// The description file could not be read.
    #[error("cannot read schema description '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("entity '{0}' is defined more than once")]
    DuplicateEntity(String),

    #[error("entity '{entity}' declares field '{field}' more than once")]
    DuplicateField { entity: String, field: String },

    #[error("entity '{entity}' names unknown parent '{parent}'")]
    UnknownParent { entity: String, parent: String },

    #[error("entity '{entity}' appears in its own inheritance chain")]
    InheritanceCycle { entity: String },

    /// A range or `any_of` entry names neither a primitive nor an entity.
    #[error("field '{entity}.{field}' references undefined range '{target}'")]
    DanglingReference {
        entity: String,
        field: String,
        target: String,
    },

    #[error("field '{entity}.{field}' declares both `range` and `any_of`")]
    AmbiguousRange { entity: String, field: String },

    #[error("identifier field '{entity}.{field}' must be a single-valued string")]
    InvalidIdentifier { entity: String, field: String },

    #[error("default for '{entity}.{field}' does not conform to the field: {reason}")]
    InvalidDefault {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("invalid ordering rule on '{entity}': {reason}")]
    InvalidRule { entity: String, reason: String },

    /// Required single-valued references form a cycle with no primitive
    /// alternative, so validation of these entities could never terminate
    /// on a finite document.
    #[error("entities {entities:?} can never be satisfied: their required fields reference each other in a cycle")]
    NonTerminating { entities: Vec<String> },

    #[error("more than one entity is marked tree_root: {0:?}")]
    MultipleTreeRoots(Vec<String>),
}

impl From<YamlConversionError> for SchemaError {
    fn from(e: YamlConversionError) -> Self {
        Self::Parse(e.to_string())
    }
}

// ─── Field specifications ────────────────────────────────────────────

/// One allowed structural alternative for a field value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// A scalar checked by [`PrimitiveKind::conforms`].
    Primitive(PrimitiveKind),
    /// An embedded object validated against the named entity.
    Entity(String),
}

impl Shape {
    /// The schema name of this shape (`string`, `date`, `Agent`, ...).
    pub fn name(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Entity(name) => name,
        }
    }

    /// The referenced entity name, if this is an entity shape.
    pub fn as_entity(&self) -> Option<&str> {
        match self {
            Self::Entity(name) => Some(name),
            Self::Primitive(_) => None,
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved field of an entity's effective field set.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub description: Option<String>,
    /// Identifier fields are always required.
    pub required: bool,
    pub identifier: bool,
    pub multivalued: bool,
    pub default: Option<Value>,
    /// Allowed shapes in declaration order. Never empty.
    pub shapes: Vec<Shape>,
    /// The entity whose declaration produced this field.
    pub declared_in: String,
}

impl FieldSpec {
    /// Shape names, e.g. `["string", "Kind"]`.
    pub fn shape_names(&self) -> Vec<String> {
        self.shapes.iter().map(|s| s.name().to_string()).collect()
    }
}

/// `later` must not precede `earlier` when both dates are present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderingRule {
    pub earlier: String,
    pub later: String,
}

/// An entity with its effective (inherited + own) field set.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    pub name: String,
    pub parent: Option<String>,
    pub is_abstract: bool,
    pub tree_root: bool,
    pub description: Option<String>,
    /// Effective fields: ancestors' first (root-most first), then own.
    pub fields: Vec<FieldSpec>,
    /// Ordering rules declared on this entity or any ancestor.
    pub rules: Vec<OrderingRule>,
}

impl EntityDefinition {
    /// Look up a field of the effective field set.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Fields declared (or overridden) by this entity itself.
    pub fn own_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(move |f| f.declared_in == self.name)
    }

    /// The first identifier field, if the entity has one.
    pub fn identifier_field(&self) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.identifier)
    }
}

// ─── Registry ────────────────────────────────────────────────────────

/// Process-wide, immutable table of entity definitions.
///
/// Built once (see [`SchemaRegistry::load`]) and passed explicitly by
/// reference to the [`Validator`] and to document (de)serialization.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    name: String,
    version: Option<String>,
    /// Entity names in declaration order.
    order: Vec<String>,
    entities: HashMap<String, EntityDefinition>,
    tree_root: Option<String>,
}

impl SchemaRegistry {
    /// Build the registry for the embedded catalog schema.
    pub fn catalog() -> Result<Self, SchemaError> {
        Self::from_yaml_str(CATALOG_SCHEMA)
    }

    /// The YAML source of the embedded catalog schema.
    pub fn catalog_source() -> &'static str {
        CATALOG_SCHEMA
    }

    /// Build the registry from a configured [`SchemaSource`].
    pub fn load(source: &SchemaSource) -> Result<Self, SchemaError> {
        match source {
            SchemaSource::Builtin => Self::catalog(),
            SchemaSource::File(path) => Self::from_path(path),
        }
    }

    /// Read a description file. `.yaml`/`.yml` files are parsed as YAML,
    /// everything else as JSON.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            _ => Self::from_json_str(&content),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, SchemaError> {
        let value = yaml_str_to_json_value(content)?;
        Self::from_json_value(value)
    }

    pub fn from_json_str(content: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(content)
            .map_err(|e| SchemaError::Parse(format!("invalid JSON: {e}")))?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: Value) -> Result<Self, SchemaError> {
        let description: SchemaDescription =
            serde_json::from_value(value).map_err(|e| SchemaError::Parse(e.to_string()))?;
        Self::from_description(description)
    }

    /// Resolve a description into a registry, running every construction
    /// check listed in the module docs.
    pub fn from_description(description: SchemaDescription) -> Result<Self, SchemaError> {
        let mut by_name: HashMap<&str, &EntityDescription> = HashMap::new();
        for entity in &description.entities {
            if by_name.insert(entity.name.as_str(), entity).is_some() {
                return Err(SchemaError::DuplicateEntity(entity.name.clone()));
            }
        }

        let mut entities = HashMap::with_capacity(description.entities.len());
        for entity in &description.entities {
            let chain = inheritance_chain(entity, &by_name)?;

            let mut fields: Vec<FieldSpec> = Vec::new();
            let mut rules = Vec::new();
            for link in &chain {
                let mut declared_here = HashSet::new();
                for field in &link.fields {
                    if !declared_here.insert(field.name.as_str()) {
                        return Err(SchemaError::DuplicateField {
                            entity: link.name.clone(),
                            field: field.name.clone(),
                        });
                    }
                    let spec = resolve_field(link, field, &description.default_range, &by_name)?;
                    match fields.iter_mut().find(|f| f.name == spec.name) {
                        Some(inherited) => *inherited = spec,
                        None => fields.push(spec),
                    }
                }
                rules.extend(link.not_before.iter().map(|r| OrderingRule {
                    earlier: r.earlier.clone(),
                    later: r.later.clone(),
                }));
            }
            check_rules(&entity.name, &fields, &rules)?;

            entities.insert(
                entity.name.clone(),
                EntityDefinition {
                    name: entity.name.clone(),
                    parent: entity.parent.clone(),
                    is_abstract: entity.is_abstract,
                    tree_root: entity.tree_root,
                    description: entity.description.clone(),
                    fields,
                    rules,
                },
            );
        }

        let roots: Vec<String> = description
            .entities
            .iter()
            .filter(|e| e.tree_root)
            .map(|e| e.name.clone())
            .collect();
        if roots.len() > 1 {
            return Err(SchemaError::MultipleTreeRoots(roots));
        }

        let order: Vec<String> = description.entities.iter().map(|e| e.name.clone()).collect();
        check_termination(&order, &entities)?;

        let registry = Self {
            name: description.name,
            version: description.version,
            order,
            entities,
            tree_root: roots.into_iter().next(),
        };
        registry.check_defaults()?;

        tracing::info!(
            schema = %registry.name,
            entities = registry.len(),
            tree_root = registry.tree_root.as_deref().unwrap_or("-"),
            "schema registry built"
        );
        Ok(registry)
    }

    /// Every declared default must pass the same checks as a document value.
    fn check_defaults(&self) -> Result<(), SchemaError> {
        let validator = Validator::new(self);
        for def in self.definitions() {
            for field in def.own_fields() {
                if let Some(default) = &field.default {
                    validator.check_default(def, field, default).map_err(|reason| {
                        SchemaError::InvalidDefault {
                            entity: def.name.clone(),
                            field: field.name.clone(),
                            reason,
                        }
                    })?;
                }
            }
        }
        Ok(())
    }

    /// Schema name from the description.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The effective definition of `entity`, or `None` if undefined.
    pub fn get_definition(&self, entity: &str) -> Option<&EntityDefinition> {
        self.entities.get(entity)
    }

    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    /// All definitions in declaration order.
    pub fn definitions(&self) -> impl Iterator<Item = &EntityDefinition> {
        self.order.iter().filter_map(|name| self.entities.get(name))
    }

    /// Entity names in declaration order.
    pub fn entity_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The entity marked `tree_root`, if any.
    pub fn tree_root(&self) -> Option<&str> {
        self.tree_root.as_deref()
    }

    /// Ancestors of `entity`, nearest first. Empty for unknown entities.
    pub fn ancestors(&self, entity: &str) -> Vec<&str> {
        let mut out = Vec::new();
        let mut current = self.entities.get(entity);
        while let Some(parent) = current.and_then(|d| d.parent.as_deref()) {
            out.push(parent);
            current = self.entities.get(parent);
        }
        out
    }

    /// Whether `entity` is `ancestor` or inherits from it.
    pub fn is_subtype_of(&self, entity: &str, ancestor: &str) -> bool {
        self.contains(entity) && (entity == ancestor || self.ancestors(entity).contains(&ancestor))
    }

    /// The root-most ancestor of `entity` (itself when it has no parent).
    ///
    /// Identifiers are unique per namespace: a Dataset and a DataCatalog
    /// share the `Resource` namespace, Concepts have their own.
    pub fn namespace_of<'a>(&'a self, entity: &'a str) -> Option<&'a str> {
        if !self.contains(entity) {
            return None;
        }
        Some(self.ancestors(entity).last().copied().unwrap_or(entity))
    }
}

/// Parent chain of `entity`, root-most ancestor first, `entity` last.
fn inheritance_chain<'d>(
    entity: &'d EntityDescription,
    by_name: &HashMap<&str, &'d EntityDescription>,
) -> Result<Vec<&'d EntityDescription>, SchemaError> {
    let mut chain = vec![entity];
    let mut seen = HashSet::from([entity.name.as_str()]);
    let mut current = entity;

    while let Some(parent) = current.parent.as_deref() {
        let next = by_name
            .get(parent)
            .copied()
            .ok_or_else(|| SchemaError::UnknownParent {
                entity: current.name.clone(),
                parent: parent.to_string(),
            })?;
        if !seen.insert(next.name.as_str()) {
            return Err(SchemaError::InheritanceCycle {
                entity: entity.name.clone(),
            });
        }
        chain.push(next);
        current = next;
    }

    chain.reverse();
    Ok(chain)
}

fn resolve_field(
    owner: &EntityDescription,
    field: &FieldDescription,
    default_range: &str,
    by_name: &HashMap<&str, &EntityDescription>,
) -> Result<FieldSpec, SchemaError> {
    if field.range.is_some() && !field.any_of.is_empty() {
        return Err(SchemaError::AmbiguousRange {
            entity: owner.name.clone(),
            field: field.name.clone(),
        });
    }

    let names: Vec<&str> = if field.any_of.is_empty() {
        vec![field.range.as_deref().unwrap_or(default_range)]
    } else {
        field.any_of.iter().map(String::as_str).collect()
    };

    let mut shapes = Vec::with_capacity(names.len());
    for name in names {
        let shape = if let Some(kind) = PrimitiveKind::from_name(name) {
            Shape::Primitive(kind)
        } else if by_name.contains_key(name) {
            Shape::Entity(name.to_string())
        } else {
            return Err(SchemaError::DanglingReference {
                entity: owner.name.clone(),
                field: field.name.clone(),
                target: name.to_string(),
            });
        };
        if !shapes.contains(&shape) {
            shapes.push(shape);
        }
    }

    if field.identifier
        && (field.multivalued || shapes != [Shape::Primitive(PrimitiveKind::String)])
    {
        return Err(SchemaError::InvalidIdentifier {
            entity: owner.name.clone(),
            field: field.name.clone(),
        });
    }

    Ok(FieldSpec {
        name: field.name.clone(),
        description: field.description.clone(),
        required: field.required || field.identifier,
        identifier: field.identifier,
        multivalued: field.multivalued,
        default: field.default.clone(),
        shapes,
        declared_in: owner.name.clone(),
    })
}

fn check_rules(entity: &str, fields: &[FieldSpec], rules: &[OrderingRule]) -> Result<(), SchemaError> {
    for rule in rules {
        for name in [&rule.earlier, &rule.later] {
            match fields.iter().find(|f| &f.name == name) {
                None => {
                    return Err(SchemaError::InvalidRule {
                        entity: entity.to_string(),
                        reason: format!("unknown field '{name}'"),
                    })
                }
                Some(f) if f.multivalued || f.shapes != [Shape::Primitive(PrimitiveKind::Date)] => {
                    return Err(SchemaError::InvalidRule {
                        entity: entity.to_string(),
                        reason: format!("field '{name}' is not a single-valued date"),
                    })
                }
                Some(_) => {}
            }
        }
    }
    Ok(())
}

/// Least fixpoint of "every required single-valued field has a shape that
/// is primitive or an already-satisfiable entity". Multivalued fields are
/// satisfied by an empty list and never block termination.
fn check_termination(
    order: &[String],
    entities: &HashMap<String, EntityDefinition>,
) -> Result<(), SchemaError> {
    let mut satisfiable: HashSet<&str> = HashSet::new();

    loop {
        let mut progressed = false;
        for name in order {
            if satisfiable.contains(name.as_str()) {
                continue;
            }
            let Some(def) = entities.get(name) else {
                continue;
            };
            let ok = def
                .fields
                .iter()
                .filter(|f| f.required && !f.multivalued)
                .all(|f| {
                    f.shapes.iter().any(|s| match s {
                        Shape::Primitive(_) => true,
                        Shape::Entity(e) => satisfiable.contains(e.as_str()),
                    })
                });
            if ok {
                satisfiable.insert(name.as_str());
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    let stuck: Vec<String> = order
        .iter()
        .filter(|n| !satisfiable.contains(n.as_str()))
        .cloned()
        .collect();
    if stuck.is_empty() {
        Ok(())
    } else {
        Err(SchemaError::NonTerminating { entities: stuck })
    }
}

//! # Structural Validation
//!
//! Checks a candidate JSON value against an entity's effective field set
//! from the [`SchemaRegistry`] and, on success, produces a
//! [`ValidatedRecord`]: a tree of field values in declared order with
//! defaults applied and every shape decision already made.
//!
//! ## Algorithm
//!
//! 1. Resolve the entity definition (inherited fields included).
//! 2. Report **every** key not in the field set as `UnknownField`.
//! 3. For each declared field: absent (or `null`) and required is
//!    `MissingField`; absent and optional takes the declared default or
//!    stays absent.
//! 4. Present values are matched against the field's shapes in declared
//!    order; the first match wins. Entity shapes recurse. When nothing
//!    matches, the violation is `TypeMismatch` naming all attempted shapes,
//!    unless the value is an object and exactly one entity shape applied, in
//!    which case that entity's own violations are reported.
//! 5. Only when steps 1–4 are clean, cross-field invariants run (see
//!    [`crate::invariants`]).
//!
//! Violations from steps 1–4 are accumulated rather than short-circuited:
//! a catalog author gets the complete list for a document in one pass.
//! No partial record is ever returned.

use std::fmt;

use sdc_core::{json_type_name, Identifier, PrimitiveKind};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::invariants;
use crate::registry::{EntityDefinition, FieldSpec, SchemaRegistry, Shape};

// ─── Violations ──────────────────────────────────────────────────────

/// What went wrong at one location of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// The requested entity is not defined in the registry.
    UnknownEntity { name: String },
    /// The key is not part of the entity's effective field set.
    UnknownField { field: String },
    /// A required field is absent or `null`.
    MissingField { field: String },
    /// The value matched none of the allowed shapes.
    TypeMismatch {
        /// Field name; `None` when the entity value itself has the wrong type.
        field: Option<String>,
        /// Attempted shapes, in declared order.
        expected: Vec<String>,
        /// JSON type of the rejected value.
        found: String,
    },
    /// An identifier field holds an empty or blank string.
    EmptyIdentifier { field: String },
    /// Another member of the same namespace already uses this identifier.
    DuplicateIdentifier {
        field: String,
        value: String,
        /// Path of the first member carrying the identifier.
        first_path: String,
    },
    /// `later` is an earlier date than `earlier`.
    OrderViolated {
        earlier_field: String,
        later_field: String,
        earlier: String,
        later: String,
    },
}

impl ViolationKind {
    /// The field this violation concerns, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::UnknownEntity { .. } => None,
            Self::UnknownField { field }
            | Self::MissingField { field }
            | Self::EmptyIdentifier { field }
            | Self::DuplicateIdentifier { field, .. } => Some(field),
            Self::TypeMismatch { field, .. } => field.as_deref(),
            Self::OrderViolated { later_field, .. } => Some(later_field),
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownEntity { name } => write!(f, "unknown entity '{name}'"),
            Self::UnknownField { field } => write!(f, "unknown field '{field}'"),
            Self::MissingField { field } => write!(f, "missing required field '{field}'"),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => {
                let expected = expected.join(" | ");
                match field {
                    Some(field) => write!(f, "field '{field}' expected {expected}, found {found}"),
                    None => write!(f, "expected {expected}, found {found}"),
                }
            }
            Self::EmptyIdentifier { field } => write!(f, "identifier field '{field}' is empty"),
            Self::DuplicateIdentifier {
                field,
                value,
                first_path,
            } => write!(
                f,
                "duplicate {field} '{value}' (first used at {})",
                display_path(first_path)
            ),
            Self::OrderViolated {
                earlier_field,
                later_field,
                earlier,
                later,
            } => write!(
                f,
                "'{later_field}' ({later}) precedes '{earlier_field}' ({earlier})"
            ),
        }
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// JSON Pointer to the violating value; empty for the document root.
    pub path: String,
    /// Entity being validated at that location.
    pub entity: String,
    pub kind: ViolationKind,
}

impl Violation {
    pub(crate) fn new(path: &str, entity: &str, kind: ViolationKind) -> Self {
        Self {
            path: path.to_string(),
            entity: entity.to_string(),
            kind,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} [{}]: {}", display_path(&self.path), self.entity, self.kind)
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

/// Every violation found for one top-level validation call.
///
/// Returned instead of a record whenever any check fails; there is no
/// partially validated result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation failed for '{entity}':\n{}", render(.violations))]
pub struct ValidationError {
    entity: String,
    violations: Vec<Violation>,
}

fn render(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidationError {
    pub(crate) fn new(entity: &str, violations: Vec<Violation>) -> Self {
        Self {
            entity: entity.to_string(),
            violations,
        }
    }

    /// The top-level entity that was validated.
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

// ─── Validated records ───────────────────────────────────────────────

/// A validated field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A primitive, with the kind it matched as.
    Scalar { kind: PrimitiveKind, value: Value },
    /// An embedded entity.
    Record(ValidatedRecord),
    /// A multivalued field, element order preserved.
    List(Vec<FieldValue>),
}

impl FieldValue {
    pub fn to_value(&self) -> Value {
        match self {
            Self::Scalar { value, .. } => value.clone(),
            Self::Record(record) => record.to_value(),
            Self::List(items) => Value::Array(items.iter().map(Self::to_value).collect()),
        }
    }

    pub fn as_record(&self) -> Option<&ValidatedRecord> {
        match self {
            Self::Record(record) => Some(record),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// The string payload of a string-like scalar.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar { value, .. } => value.as_str(),
            _ => None,
        }
    }
}

/// A fully validated entity value. Fields appear in the entity's declared
/// order; absent optional fields without defaults are not present at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord {
    entity: String,
    fields: Vec<(String, FieldValue)>,
}

impl ValidatedRecord {
    pub fn entity(&self) -> &str {
        &self.entity
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render back to a JSON object in declared field order.
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), value.to_value()))
            .collect();
        Value::Object(map)
    }
}

// ─── Validator ───────────────────────────────────────────────────────

/// Validates JSON values against a borrowed [`SchemaRegistry`].
///
/// Cheap to construct; holds no state besides the registry reference.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> Validator<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Validate `candidate` as an instance of `entity`.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] carrying every structural violation, or
    /// every invariant violation when the structure is sound.
    pub fn validate(&self, entity: &str, candidate: &Value) -> Result<ValidatedRecord, ValidationError> {
        let mut violations = Vec::new();
        let record = self.check_entity(entity, candidate, "", &mut violations);

        let record = match record {
            Some(record) if violations.is_empty() => record,
            _ => {
                tracing::debug!(entity, violations = violations.len(), "structural validation failed");
                return Err(ValidationError::new(entity, violations));
            }
        };

        invariants::check(self.registry, &record, &mut violations);
        if violations.is_empty() {
            tracing::debug!(entity, fields = record.len(), "validated");
            Ok(record)
        } else {
            tracing::debug!(entity, violations = violations.len(), "invariant check failed");
            Err(ValidationError::new(entity, violations))
        }
    }

    /// Check a field default against its own field spec, plus the ordering
    /// rules of any record it holds. Used once while building the registry.
    pub(crate) fn check_default(
        &self,
        def: &EntityDefinition,
        spec: &FieldSpec,
        default: &Value,
    ) -> Result<(), String> {
        let mut violations = Vec::new();
        let path = pointer_join("", &spec.name);
        if let Some(value) = self.check_field(def, spec, default, &path, &mut violations) {
            if violations.is_empty() {
                invariants::check_value_ordering(self.registry, &value, &path, &mut violations);
            }
        }
        if violations.is_empty() {
            Ok(())
        } else {
            Err(render(&violations))
        }
    }

    /// Structural check of one entity value. Returns `None` iff at least one
    /// violation was appended to `out`.
    fn check_entity(
        &self,
        entity: &str,
        candidate: &Value,
        path: &str,
        out: &mut Vec<Violation>,
    ) -> Option<ValidatedRecord> {
        let Some(def) = self.registry.get_definition(entity) else {
            out.push(Violation::new(
                path,
                entity,
                ViolationKind::UnknownEntity {
                    name: entity.to_string(),
                },
            ));
            return None;
        };

        let Some(map) = candidate.as_object() else {
            out.push(Violation::new(
                path,
                entity,
                ViolationKind::TypeMismatch {
                    field: None,
                    expected: vec![entity.to_string()],
                    found: json_type_name(candidate).to_string(),
                },
            ));
            return None;
        };

        let before = out.len();

        for key in map.keys() {
            if def.field(key).is_none() {
                out.push(Violation::new(
                    &pointer_join(path, key),
                    entity,
                    ViolationKind::UnknownField { field: key.clone() },
                ));
            }
        }

        let mut fields = Vec::with_capacity(def.fields.len());
        for spec in &def.fields {
            let field_path = pointer_join(path, &spec.name);
            let value = match map.get(&spec.name) {
                None | Some(Value::Null) => {
                    if spec.required {
                        out.push(Violation::new(
                            &field_path,
                            entity,
                            ViolationKind::MissingField {
                                field: spec.name.clone(),
                            },
                        ));
                        continue;
                    }
                    match &spec.default {
                        Some(default) => default,
                        None => continue,
                    }
                }
                Some(value) => value,
            };

            if let Some(checked) = self.check_field(def, spec, value, &field_path, out) {
                fields.push((spec.name.clone(), checked));
            }
        }

        (out.len() == before).then(|| ValidatedRecord {
            entity: def.name.clone(),
            fields,
        })
    }

    fn check_field(
        &self,
        def: &EntityDefinition,
        spec: &FieldSpec,
        value: &Value,
        path: &str,
        out: &mut Vec<Violation>,
    ) -> Option<FieldValue> {
        if !spec.multivalued {
            return self.match_shapes(def, spec, value, path, out);
        }

        let Some(items) = value.as_array() else {
            out.push(Violation::new(
                path,
                &def.name,
                ViolationKind::TypeMismatch {
                    field: Some(spec.name.clone()),
                    expected: vec![format!("list of {}", spec.shape_names().join(" | "))],
                    found: json_type_name(value).to_string(),
                },
            ));
            return None;
        };

        let before = out.len();
        let mut checked = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let item_path = format!("{path}/{i}");
            if let Some(v) = self.match_shapes(def, spec, item, &item_path, out) {
                checked.push(v);
            }
        }
        (out.len() == before).then_some(FieldValue::List(checked))
    }

    /// First-match-wins over the field's shapes.
    fn match_shapes(
        &self,
        def: &EntityDefinition,
        spec: &FieldSpec,
        value: &Value,
        path: &str,
        out: &mut Vec<Violation>,
    ) -> Option<FieldValue> {
        let mut attempts: Vec<Vec<Violation>> = Vec::new();

        for shape in &spec.shapes {
            match shape {
                Shape::Primitive(kind) => {
                    if !kind.conforms(value) {
                        continue;
                    }
                    if spec.identifier && !value.as_str().is_some_and(Identifier::is_valid) {
                        out.push(Violation::new(
                            path,
                            &def.name,
                            ViolationKind::EmptyIdentifier {
                                field: spec.name.clone(),
                            },
                        ));
                        return None;
                    }
                    return Some(FieldValue::Scalar {
                        kind: *kind,
                        value: value.clone(),
                    });
                }
                Shape::Entity(name) => {
                    if !value.is_object() {
                        continue;
                    }
                    let mut nested = Vec::new();
                    if let Some(record) = self.check_entity(name, value, path, &mut nested) {
                        return Some(FieldValue::Record(record));
                    }
                    attempts.push(nested);
                }
            }
        }

        if attempts.len() == 1 {
            out.append(&mut attempts[0]);
        } else {
            out.push(Violation::new(
                path,
                &def.name,
                ViolationKind::TypeMismatch {
                    field: Some(spec.name.clone()),
                    expected: spec.shape_names(),
                    found: json_type_name(value).to_string(),
                },
            ));
        }
        None
    }
}

/// Append one reference token to a JSON Pointer (RFC 6901 escaping).
pub(crate) fn pointer_join(path: &str, token: &str) -> String {
    let escaped = token.replace('~', "~0").replace('/', "~1");
    format!("{path}/{escaped}")
}

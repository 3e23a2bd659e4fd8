//! Cross-field and collection invariants, run over a structurally valid
//! [`ValidatedRecord`] tree.
//!
//! - **Ordering**: every `not_before` rule of every record in the tree.
//!   Absent dates never violate a rule.
//! - **Identifier uniqueness**: only when the record is the schema's tree
//!   root. Direct members (single or list-valued) are grouped by the
//!   namespace of their entity (its root-most ancestor); within a namespace
//!   an identifier value may appear once.

use std::collections::HashMap;

use sdc_core::CalendarDate;

use crate::registry::SchemaRegistry;
use crate::validate::{pointer_join, FieldValue, ValidatedRecord, Violation, ViolationKind};

/// Append every invariant violation of `root` to `out`.
pub(crate) fn check(registry: &SchemaRegistry, root: &ValidatedRecord, out: &mut Vec<Violation>) {
    check_ordering(registry, root, "", out);
    if registry.tree_root() == Some(root.entity()) {
        check_unique_identifiers(registry, root, out);
    }
}

fn check_ordering(registry: &SchemaRegistry, record: &ValidatedRecord, path: &str, out: &mut Vec<Violation>) {
    if let Some(def) = registry.get_definition(record.entity()) {
        for rule in &def.rules {
            let (Some(earlier), Some(later)) = (date_of(record, &rule.earlier), date_of(record, &rule.later)) else {
                continue;
            };
            if later < earlier {
                out.push(Violation::new(
                    &pointer_join(path, &rule.later),
                    record.entity(),
                    ViolationKind::OrderViolated {
                        earlier_field: rule.earlier.clone(),
                        later_field: rule.later.clone(),
                        earlier: earlier.to_string(),
                        later: later.to_string(),
                    },
                ));
            }
        }
    }

    for (name, value) in record.fields() {
        walk_records(value, &pointer_join(path, name), &mut |child: &ValidatedRecord, child_path: &str| {
            check_ordering(registry, child, child_path, out)
        });
    }
}

/// Append the ordering violations of every record held by `value`, which
/// sits at `path`.
pub(crate) fn check_value_ordering(registry: &SchemaRegistry, value: &FieldValue, path: &str, out: &mut Vec<Violation>) {
    walk_records(value, path, &mut |record: &ValidatedRecord, record_path: &str| {
        check_ordering(registry, record, record_path, out)
    });
}

fn date_of(record: &ValidatedRecord, field: &str) -> Option<CalendarDate> {
    record
        .get(field)
        .and_then(FieldValue::as_str)
        .and_then(|s| CalendarDate::parse(s).ok())
}

/// Visit the records directly held by `value` (itself, or list elements).
fn walk_records(value: &FieldValue, path: &str, visit: &mut dyn FnMut(&ValidatedRecord, &str)) {
    match value {
        FieldValue::Record(record) => visit(record, path),
        FieldValue::List(items) => {
            for (i, item) in items.iter().enumerate() {
                walk_records(item, &format!("{path}/{i}"), visit);
            }
        }
        FieldValue::Scalar { .. } => {}
    }
}

fn check_unique_identifiers(registry: &SchemaRegistry, root: &ValidatedRecord, out: &mut Vec<Violation>) {
    // (namespace, identifier) -> path of the first member using it
    let mut seen: HashMap<(String, String), String> = HashMap::new();

    for (name, value) in root.fields() {
        walk_records(value, &pointer_join("", name), &mut |member: &ValidatedRecord, member_path: &str| {
            let Some(id_field) = registry
                .get_definition(member.entity())
                .and_then(|d| d.identifier_field())
            else {
                return;
            };
            let Some(id) = member.get(&id_field.name).and_then(FieldValue::as_str) else {
                return;
            };
            let namespace = registry
                .namespace_of(member.entity())
                .unwrap_or(member.entity())
                .to_string();

            let id_path = pointer_join(member_path, &id_field.name);
            match seen.get(&(namespace.clone(), id.to_string())) {
                Some(first_path) => out.push(Violation::new(
                    &id_path,
                    member.entity(),
                    ViolationKind::DuplicateIdentifier {
                        field: id_field.name.clone(),
                        value: id.to_string(),
                        first_path: first_path.clone(),
                    },
                )),
                None => {
                    seen.insert((namespace, id.to_string()), id_path);
                }
            }
        });
    }
}

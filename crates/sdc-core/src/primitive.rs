//! # Primitive Value Kinds
//!
//! The scalar shapes a schema field may accept, and how each is recognized
//! in a JSON value tree.
//!
//! | kind      | accepted JSON                                        |
//! |-----------|------------------------------------------------------|
//! | `string`  | any string                                           |
//! | `date`    | a string in strict `YYYY-MM-DD` form                 |
//! | `decimal` | a number, or a string holding a decimal literal      |
//!
//! Values are never coerced between kinds: `42` is not a `string`, and
//! `"true"` is not a `decimal`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::temporal::CalendarDate;

/// A primitive (non-entity) field shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    /// Free text.
    String,
    /// ISO-8601 calendar date.
    Date,
    /// Arbitrary-precision decimal number.
    Decimal,
}

impl PrimitiveKind {
    /// All primitive kinds, in canonical order.
    pub const ALL: [PrimitiveKind; 3] = [Self::String, Self::Date, Self::Decimal];

    /// The canonical schema name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Date => "date",
            Self::Decimal => "decimal",
        }
    }

    /// Resolve a range name from a schema description.
    ///
    /// `str` and `uri` are accepted as aliases of `string`; URIs carry no
    /// format constraint of their own.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "string" | "str" | "uri" => Some(Self::String),
            "date" => Some(Self::Date),
            "decimal" => Some(Self::Decimal),
            _ => None,
        }
    }

    /// Whether `value` conforms to this kind.
    pub fn conforms(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::String, Value::String(_)) => true,
            (Self::Date, Value::String(s)) => CalendarDate::parse(s).is_ok(),
            (Self::Decimal, Value::Number(_)) => true,
            (Self::Decimal, Value::String(s)) => is_decimal_literal(s),
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `s` is a decimal literal: optional sign, digits with an optional
/// fractional part, and an optional exponent (`-12`, `3.50`, `.5`, `1e-3`).
pub fn is_decimal_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        digits += i - frac_start;
    }

    if digits == 0 {
        return false;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        i += 1;
        if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }

    i == bytes.len()
}

/// Human-readable JSON type name, used in type-mismatch reports.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

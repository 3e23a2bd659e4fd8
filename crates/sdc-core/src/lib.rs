//! # sdc-core — Foundational Types for the Simple Data Catalog
//!
//! This crate is the leaf of the catalog workspace. It defines the small set
//! of value types that every other crate relies on when checking or carrying
//! catalog records.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrapper for identifiers.** `Identifier` can only be built from
//!    a non-blank string, so a typed record can never carry an empty
//!    `identifier`.
//!
//! 2. **Calendar dates, not timestamps.** `CalendarDate` accepts exactly the
//!    ISO-8601 `YYYY-MM-DD` form and renders it back byte-for-byte, which keeps
//!    documents stable across a parse/emit cycle.
//!
//! 3. **Closed set of primitive kinds.** `PrimitiveKind` enumerates the scalar
//!    shapes a schema field may accept (`string`, `date`, `decimal`) together
//!    with their conformance checks against JSON values.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `sdc-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod primitive;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::CoreError;
pub use identity::Identifier;
pub use primitive::{is_decimal_literal, json_type_name, PrimitiveKind};
pub use temporal::CalendarDate;

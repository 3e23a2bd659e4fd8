//! # Error Types
//!
//! Errors raised when constructing the foundational value types. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.

use thiserror::Error;

/// Error constructing a core value type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Identifiers must contain at least one non-whitespace character.
    #[error("identifier must be a non-empty string")]
    EmptyIdentifier,

    /// The value is not an ISO-8601 calendar date.
    #[error("invalid calendar date {value:?}: {reason}")]
    InvalidDate {
        /// The rejected input.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}

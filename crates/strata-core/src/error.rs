//! Error types for the core crate

use thiserror::Error;

/// Core error types
#[derive(Debug, Error)]
pub enum Error {
    /// A route pattern could not be parsed
    #[error("invalid route pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern string
        pattern: String,
        /// Why parsing rejected it
        reason: String,
    },

    /// A write payload did not conform to the declared schema
    #[error("schema violation on field `{field}`: {reason}")]
    SchemaViolation {
        /// The offending field name
        field: String,
        /// Why validation rejected it
        reason: String,
    },

    /// A row did not match the record set's column arity
    #[error("row arity mismatch: expected {expected} values, got {actual}")]
    RowArity {
        /// Number of declared columns
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a pattern error
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }

    /// Create a schema violation error
    pub fn schema_violation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaViolation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

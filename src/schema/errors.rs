//! Schema validation errors
//!
//! Every variant is a client-side rejection: the operation that produced it
//! leaves registry and table data untouched.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Column spec has no `:` separator
    #[error("invalid column spec '{0}': expected name:type")]
    MissingSeparator(String),

    #[error("invalid column spec '{0}': column name is empty")]
    EmptyColumnName(String),

    #[error("unsupported type '{type_name}' for column '{column}' (allowed: int, str, bool)")]
    UnknownType { column: String, type_name: String },

    #[error("duplicate column '{0}'")]
    DuplicateColumn(String),

    #[error("expected {expected} values, got {actual}")]
    ValueCount { expected: usize, actual: usize },

    #[error("invalid type for column '{column}': expected {expected}, got {actual}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Attempt to assign the reserved `ID` column
    #[error("column '{0}' is immutable")]
    ImmutableColumn(String),

    #[error("empty set clause")]
    EmptyAssignments,
}

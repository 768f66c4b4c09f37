//! Table engine error types
//!
//! Error codes:
//! - PRIMDB_NOT_FOUND
//! - PRIMDB_ALREADY_EXISTS
//! - PRIMDB_VALIDATION_FAILED
//! - PRIMDB_CANCELLED
//!
//! All engine errors are recoverable. An operation that fails leaves the
//! caller's registry and table data exactly as they were.

use std::fmt;

use crate::schema::SchemaError;

/// Engine error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineErrorCode {
    /// Table or matching records absent
    NotFound,
    /// Duplicate table
    AlreadyExists,
    /// Bad column spec, type mismatch, wrong value count, unknown column
    ValidationFailed,
    /// Operator declined a confirmation
    Cancelled,
}

impl EngineErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            EngineErrorCode::NotFound => "PRIMDB_NOT_FOUND",
            EngineErrorCode::AlreadyExists => "PRIMDB_ALREADY_EXISTS",
            EngineErrorCode::ValidationFailed => "PRIMDB_VALIDATION_FAILED",
            EngineErrorCode::Cancelled => "PRIMDB_CANCELLED",
        }
    }
}

impl fmt::Display for EngineErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Engine error with code and human-readable message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    code: EngineErrorCode,
    message: String,
}

impl EngineError {
    pub fn new(code: EngineErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Table does not exist
    pub fn table_not_found(table: &str) -> Self {
        Self::new(
            EngineErrorCode::NotFound,
            format!("Table \"{}\" does not exist.", table),
        )
    }

    /// Predicate matched nothing
    pub fn no_matching_records() -> Self {
        Self::new(EngineErrorCode::NotFound, "No records matched the condition.")
    }

    pub fn table_exists(table: &str) -> Self {
        Self::new(
            EngineErrorCode::AlreadyExists,
            format!("Table \"{}\" already exists.", table),
        )
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(EngineErrorCode::ValidationFailed, message)
    }

    pub fn cancelled(action: &str) -> Self {
        Self::new(
            EngineErrorCode::Cancelled,
            format!("Operation \"{}\" cancelled.", action),
        )
    }

    pub fn code(&self) -> EngineErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_cancelled(&self) -> bool {
        self.code == EngineErrorCode::Cancelled
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for EngineError {}

impl From<SchemaError> for EngineError {
    fn from(e: SchemaError) -> Self {
        Self::validation(e.to_string())
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

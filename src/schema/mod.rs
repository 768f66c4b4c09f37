//! Schema subsystem for primdb
//!
//! Schemas are mandatory: every record written to a table is checked against
//! the table's column list first.
//!
//! # Design Principles
//!
//! - `ID:int` is reserved, always first, never caller-supplied
//! - Column names are unique per table (case-sensitive)
//! - No nulls, defaults, or coercion
//! - Deterministic validation

mod errors;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaResult};
pub use types::{ColumnDef, ColumnType, Record, SchemaRegistry, TableSchema, Value, ID_COLUMN};
pub use validator::TypeValidator;

//! Type validation for rows, set-clauses and predicates
//!
//! Validation semantics:
//! - Value types exactly match column types
//! - No implicit coercion (a bool is never an int)
//! - Unknown columns are rejected
//! - `ID` is never assigned by the caller
//! - Validation does not mutate anything

use super::errors::{SchemaError, SchemaResult};
use super::types::{ColumnType, TableSchema, Value, ID_COLUMN};

/// Stateless checks of values against a table schema
pub struct TypeValidator;

impl TypeValidator {
    /// Returns true if `value` is of `declared` type
    pub fn matches(value: &Value, declared: ColumnType) -> bool {
        matches!(
            (value, declared),
            (Value::Int(_), ColumnType::Int)
                | (Value::Str(_), ColumnType::Str)
                | (Value::Bool(_), ColumnType::Bool)
        )
    }

    /// Checks a full row of values (without `ID`) in schema order.
    ///
    /// The count is checked first, then the first type mismatch is reported.
    pub fn check_row(schema: &TableSchema, values: &[Value]) -> SchemaResult<()> {
        let columns = schema.value_columns();
        if values.len() != columns.len() {
            return Err(SchemaError::ValueCount {
                expected: columns.len(),
                actual: values.len(),
            });
        }

        for (column, value) in columns.iter().zip(values) {
            Self::check_value(&column.name, column.column_type, value)?;
        }

        Ok(())
    }

    /// Checks a set-clause: known, non-ID columns with correctly typed values
    pub fn check_assignments<'a>(
        schema: &TableSchema,
        assignments: impl IntoIterator<Item = (&'a str, &'a Value)>,
    ) -> SchemaResult<()> {
        let mut seen = false;
        for (column, value) in assignments {
            seen = true;
            if column.eq_ignore_ascii_case(ID_COLUMN) {
                return Err(SchemaError::ImmutableColumn(column.to_string()));
            }
            let declared = schema
                .column_type(column)
                .ok_or_else(|| SchemaError::UnknownColumn(column.to_string()))?;
            Self::check_value(column, declared, value)?;
        }

        if !seen {
            return Err(SchemaError::EmptyAssignments);
        }
        Ok(())
    }

    /// Checks a where-clause: known columns (ID included) with correctly typed values
    pub fn check_predicate<'a>(
        schema: &TableSchema,
        conditions: impl IntoIterator<Item = (&'a str, &'a Value)>,
    ) -> SchemaResult<()> {
        for (column, value) in conditions {
            let declared = schema
                .column_type(column)
                .ok_or_else(|| SchemaError::UnknownColumn(column.to_string()))?;
            Self::check_value(column, declared, value)?;
        }
        Ok(())
    }

    fn check_value(column: &str, declared: ColumnType, value: &Value) -> SchemaResult<()> {
        if Self::matches(value, declared) {
            Ok(())
        } else {
            Err(SchemaError::TypeMismatch {
                column: column.to_string(),
                expected: declared.type_name(),
                actual: value.type_name(),
            })
        }
    }
}

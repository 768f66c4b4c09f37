//! Schema type definitions
//!
//! Supported column types:
//! - int: 64-bit signed integer
//! - str: UTF-8 string
//! - bool: Boolean
//!
//! Every table carries a reserved `ID:int` column in first position.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::errors::{SchemaError, SchemaResult};

/// Name of the reserved identifier column.
pub const ID_COLUMN: &str = "ID";

/// Supported column types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// 64-bit signed integer
    Int,
    /// UTF-8 string
    Str,
    /// Boolean
    Bool,
}

impl ColumnType {
    /// Returns the type name used in column specs and messages
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Str => "str",
            ColumnType::Bool => "bool",
        }
    }

    /// Parses a type name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "int" => Some(ColumnType::Int),
            "str" => Some(ColumnType::Str),
            "bool" => Some(ColumnType::Bool),
            _ => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A typed cell value.
///
/// Booleans and integers are distinct variants; nothing converts between them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Value {
    /// Returns the name of the runtime type, matching `ColumnType` names
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::Bool(_) => "bool",
        }
    }

    /// Returns the integer payload, if any
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Str(s) => write!(f, "{}", s),
            Value::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

/// Column definition: a name bound to a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnDef {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// The reserved `ID:int` column
    pub fn id() -> Self {
        Self::new(ID_COLUMN, ColumnType::Int)
    }

    /// Parses a raw `name:type` column spec.
    ///
    /// Returns `Ok(None)` when the name is the reserved `ID` (any case); such
    /// specs are skipped, not rejected.
    pub fn parse_spec(raw: &str) -> SchemaResult<Option<Self>> {
        let (name, type_name) = raw
            .split_once(':')
            .ok_or_else(|| SchemaError::MissingSeparator(raw.to_string()))?;

        let name = name.trim();
        let type_name = type_name.trim();

        if name.is_empty() {
            return Err(SchemaError::EmptyColumnName(raw.to_string()));
        }
        if name.eq_ignore_ascii_case(ID_COLUMN) {
            return Ok(None);
        }

        let column_type = ColumnType::from_name(type_name).ok_or_else(|| {
            SchemaError::UnknownType {
                column: name.to_string(),
                type_name: type_name.to_string(),
            }
        })?;

        Ok(Some(Self::new(name, column_type)))
    }
}

impl fmt::Display for ColumnDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.column_type)
    }
}

/// Ordered column list of one table, `ID:int` always first
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableSchema {
    columns: Vec<ColumnDef>,
}

impl TableSchema {
    /// Builds a schema from user columns, prepending `ID:int`.
    ///
    /// Rejects duplicate names and silently drops any column named `ID`.
    pub fn new(user_columns: Vec<ColumnDef>) -> SchemaResult<Self> {
        let mut columns = Vec::with_capacity(user_columns.len() + 1);
        columns.push(ColumnDef::id());

        for column in user_columns {
            if column.name.eq_ignore_ascii_case(ID_COLUMN) {
                continue;
            }
            if columns[1..].iter().any(|c| c.name == column.name) {
                return Err(SchemaError::DuplicateColumn(column.name));
            }
            columns.push(column);
        }

        Ok(Self { columns })
    }

    /// Parses and validates raw `name:type` specs in input order.
    ///
    /// Stops at the first bad spec: a malformed spec or unknown type, then a
    /// name repeating an earlier column.
    pub fn from_specs<S: AsRef<str>>(specs: &[S]) -> SchemaResult<Self> {
        let mut parsed: Vec<ColumnDef> = Vec::with_capacity(specs.len());
        for spec in specs {
            if let Some(column) = ColumnDef::parse_spec(spec.as_ref())? {
                if parsed.iter().any(|c| c.name == column.name) {
                    return Err(SchemaError::DuplicateColumn(column.name));
                }
                parsed.push(column);
            }
        }
        Self::new(parsed)
    }

    /// All columns, `ID` first
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    /// Columns the caller supplies values for (everything except `ID`)
    pub fn value_columns(&self) -> &[ColumnDef] {
        match self.columns.first() {
            Some(first) if first.name == ID_COLUMN => &self.columns[1..],
            _ => &self.columns,
        }
    }

    /// Looks up a column's type by name
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.column_type)
    }

    /// Checks the structure of a schema read from disk
    pub fn validate_structure(&self) -> Result<(), String> {
        match self.columns.first() {
            Some(first) if *first == ColumnDef::id() => {}
            _ => return Err(format!("first column must be '{}:int'", ID_COLUMN)),
        }

        for (i, column) in self.columns.iter().enumerate().skip(1) {
            if column.name.eq_ignore_ascii_case(ID_COLUMN) {
                return Err(format!("column '{}' shadows the reserved ID column", column.name));
            }
            if self.columns[..i].iter().any(|c| c.name == column.name) {
                return Err(format!("duplicate column '{}'", column.name));
            }
        }

        Ok(())
    }

    /// Comma-separated `name:type` listing
    pub fn describe(&self) -> String {
        self.columns
            .iter()
            .map(ColumnDef::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Mapping from table name to schema.
///
/// Table names are kept sorted so listings and persisted snapshots are
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaRegistry {
    tables: BTreeMap<String, TableSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, table: &str) -> Option<&TableSchema> {
        self.tables.get(table)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn insert(&mut self, table: impl Into<String>, schema: TableSchema) {
        self.tables.insert(table.into(), schema);
    }

    pub fn remove(&mut self, table: &str) -> Option<TableSchema> {
        self.tables.remove(table)
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Checks every table structure, reporting the first broken table
    pub fn validate_structure(&self) -> Result<(), String> {
        for (name, schema) in &self.tables {
            if name.is_empty() {
                return Err("empty table name".into());
            }
            schema
                .validate_structure()
                .map_err(|e| format!("table '{}': {}", name, e))?;
        }
        Ok(())
    }
}

/// A single row: column name to value, always containing `ID`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, Value>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(column, value)` pairs
    pub fn from_pairs<K: Into<String>, V: Into<Value>>(pairs: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields.get(column)
    }

    pub fn set(&mut self, column: impl Into<String>, value: Value) {
        self.fields.insert(column.into(), value);
    }

    /// The record identifier; `0` if the record carries no integer `ID`
    pub fn id(&self) -> i64 {
        self.get(ID_COLUMN).and_then(Value::as_int).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

//! Success outcomes of engine operations
//!
//! Each outcome carries the data a caller needs to inspect the result and
//! renders the user-facing confirmation through `Display`.

use std::fmt;

use crate::schema::TableSchema;

/// A table was added to the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCreated {
    pub table: String,
    pub schema: TableSchema,
}

impl fmt::Display for TableCreated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Table \"{}\" created with columns: {}",
            self.table,
            self.schema.describe()
        )
    }
}

/// A table was removed from the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDropped {
    pub table: String,
}

impl fmt::Display for TableDropped {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Table \"{}\" dropped.", self.table)
    }
}

/// A record was appended
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInserted {
    pub table: String,
    pub id: i64,
}

impl fmt::Display for RecordInserted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Record with ID={} inserted into \"{}\".", self.id, self.table)
    }
}

/// Records matched by an update, in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsUpdated {
    pub table: String,
    pub ids: Vec<i64>,
}

impl fmt::Display for RecordsUpdated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ids.len() == 1 {
            write!(f, "Record with ID={} in \"{}\" updated.", self.ids[0], self.table)
        } else {
            write!(f, "Records with ID={} in \"{}\" updated.", join_ids(&self.ids), self.table)
        }
    }
}

/// Records removed by a delete, in table order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordsDeleted {
    pub table: String,
    pub ids: Vec<i64>,
}

impl fmt::Display for RecordsDeleted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ids.len() == 1 {
            write!(f, "Record with ID={} deleted from \"{}\".", self.ids[0], self.table)
        } else {
            write!(f, "Records with ID={} deleted from \"{}\".", join_ids(&self.ids), self.table)
        }
    }
}

/// Schema and size of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableInfo {
    pub table: String,
    pub schema: TableSchema,
    pub record_count: usize,
}

impl fmt::Display for TableInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Table: {}", self.table)?;
        writeln!(f, "Columns: {}", self.schema.describe())?;
        write!(f, "Records: {}", self.record_count)
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

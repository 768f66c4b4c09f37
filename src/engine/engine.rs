//! Table engine: create/drop table, insert, select, update, delete
//!
//! # Contract
//!
//! 1. Registry and table data are owned by the caller and lent to the engine
//! 2. All validation runs before any mutation
//! 3. On error nothing is mutated and the cache is left as is
//! 4. Every successful write clears the query cache
//! 5. Destructive operations ask `Confirm` before anything else

use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{Record, SchemaRegistry, TableSchema, TypeValidator, Value, ID_COLUMN};

use super::cache::{CacheKey, QueryCache, QueryCacheConfig};
use super::confirm::Confirm;
use super::errors::{EngineError, EngineResult};
use super::matcher::{Assignments, Predicate, RecordMatcher};
use super::outcome::{
    RecordInserted, RecordsDeleted, RecordsUpdated, TableCreated, TableDropped, TableInfo,
};

/// The record engine. Owns the query cache; owns no table state.
#[derive(Debug, Default)]
pub struct TableEngine {
    cache: QueryCache,
}

impl TableEngine {
    pub fn new(cache_config: QueryCacheConfig) -> Self {
        Self {
            cache: QueryCache::new(cache_config),
        }
    }

    /// Read access to the query cache (stats, size)
    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Adds a table to `registry`.
    ///
    /// Validation order:
    /// 1. Name non-empty and usable as a file name
    /// 2. Name not already registered
    /// 3. Column specs parse, types allowed, names unique (`ID` specs skipped)
    pub fn create_table<S: AsRef<str>>(
        &mut self,
        registry: &mut SchemaRegistry,
        table: &str,
        columns: &[S],
    ) -> EngineResult<TableCreated> {
        Self::check_table_name(table).map_err(|e| rejected("create_table", e))?;

        if registry.contains(table) {
            return Err(rejected("create_table", EngineError::table_exists(table)));
        }

        let schema = TableSchema::from_specs(columns).map_err(|e| rejected("create_table", e))?;

        registry.insert(table, schema.clone());
        self.cache.invalidate();

        let columns = schema.describe();
        log_event_with_fields(
            Event::TableCreated,
            &[("table", table), ("columns", columns.as_str())],
        );

        Ok(TableCreated {
            table: table.to_string(),
            schema,
        })
    }

    /// Removes a table from `registry` after confirmation.
    ///
    /// The caller removes the table's data.
    pub fn drop_table(
        &mut self,
        registry: &mut SchemaRegistry,
        table: &str,
        confirm: &mut dyn Confirm,
    ) -> EngineResult<TableDropped> {
        let action = format!("drop table \"{}\"", table);
        if !confirm.ask(&action) {
            return Err(rejected("drop_table", EngineError::cancelled(&action)));
        }

        if registry.remove(table).is_none() {
            return Err(rejected("drop_table", EngineError::table_not_found(table)));
        }

        self.cache.invalidate();
        log_event_with_fields(Event::TableDropped, &[("table", table)]);

        Ok(TableDropped {
            table: table.to_string(),
        })
    }

    /// Appends a record built from `values` in schema order.
    ///
    /// The new ID is `max(existing IDs) + 1`, or 1 for an empty table. IDs are
    /// never reused, even after deletes. A table whose maximum ID is
    /// `i64::MAX` rejects further inserts.
    pub fn insert(
        &mut self,
        registry: &SchemaRegistry,
        table: &str,
        values: Vec<Value>,
        data: &mut Vec<Record>,
    ) -> EngineResult<RecordInserted> {
        let schema = Self::schema(registry, table).map_err(|e| rejected("insert", e))?;
        TypeValidator::check_row(schema, &values).map_err(|e| rejected("insert", e))?;

        let id = match data.iter().map(Record::id).max() {
            None => 1,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                rejected(
                    "insert",
                    EngineError::validation(format!(
                        "Table \"{}\" has no IDs left after {}.",
                        table, max
                    )),
                )
            })?,
        };

        let mut record = Record::new();
        record.set(ID_COLUMN, Value::Int(id));
        for (column, value) in schema.value_columns().iter().zip(values) {
            record.set(column.name.clone(), value);
        }

        data.push(record);
        self.cache.invalidate();

        let id_str = id.to_string();
        log_event_with_fields(
            Event::RecordInserted,
            &[("table", table), ("id", id_str.as_str())],
        );

        Ok(RecordInserted {
            table: table.to_string(),
            id,
        })
    }

    /// Returns the records matching `predicate` in original order.
    ///
    /// An empty predicate returns every record. Results are memoized until the
    /// next write. Never mutates `data`.
    pub fn select(
        &mut self,
        registry: &SchemaRegistry,
        table: &str,
        data: &[Record],
        predicate: &Predicate,
    ) -> EngineResult<Arc<Vec<Record>>> {
        let schema = Self::schema(registry, table).map_err(|e| rejected("select", e))?;
        TypeValidator::check_predicate(schema, predicate.iter())
            .map_err(|e| rejected("select", e))?;

        let hits_before = self.cache.stats().hits;
        let key = CacheKey::new(table, data, predicate);
        let result = self.cache.get_or_compute(key, || {
            if predicate.is_empty() {
                data.to_vec()
            } else {
                RecordMatcher::filter(data, predicate)
            }
        });

        if self.cache.stats().hits > hits_before {
            Logger::trace(Event::CacheHit.as_str(), &[("table", table)]);
        }

        Ok(result)
    }

    /// Applies `assignments` to every record matching `predicate`.
    ///
    /// Assignments are checked against the schema: known columns, correct
    /// types, never `ID`.
    pub fn update(
        &mut self,
        registry: &SchemaRegistry,
        table: &str,
        data: &mut [Record],
        assignments: &Assignments,
        predicate: &Predicate,
    ) -> EngineResult<RecordsUpdated> {
        let schema = Self::schema(registry, table).map_err(|e| rejected("update", e))?;
        TypeValidator::check_assignments(schema, assignments.iter())
            .map_err(|e| rejected("update", e))?;
        TypeValidator::check_predicate(schema, predicate.iter())
            .map_err(|e| rejected("update", e))?;

        let mut ids = Vec::new();
        for record in data.iter_mut() {
            if RecordMatcher::matches(record, predicate) {
                assignments.apply(record);
                ids.push(record.id());
            }
        }

        if ids.is_empty() {
            return Err(rejected("update", EngineError::no_matching_records()));
        }

        self.cache.invalidate();
        let count = ids.len().to_string();
        log_event_with_fields(
            Event::RecordsUpdated,
            &[("table", table), ("count", count.as_str())],
        );

        Ok(RecordsUpdated {
            table: table.to_string(),
            ids,
        })
    }

    /// Removes every record matching `predicate` after confirmation.
    ///
    /// Remaining records keep their order and IDs.
    pub fn delete(
        &mut self,
        registry: &SchemaRegistry,
        table: &str,
        data: &mut Vec<Record>,
        predicate: &Predicate,
        confirm: &mut dyn Confirm,
    ) -> EngineResult<RecordsDeleted> {
        let action = format!("delete from \"{}\"", table);
        if !confirm.ask(&action) {
            return Err(rejected("delete", EngineError::cancelled(&action)));
        }

        let schema = Self::schema(registry, table).map_err(|e| rejected("delete", e))?;
        TypeValidator::check_predicate(schema, predicate.iter())
            .map_err(|e| rejected("delete", e))?;

        let (removed, kept): (Vec<Record>, Vec<Record>) = data
            .iter()
            .cloned()
            .partition(|record| RecordMatcher::matches(record, predicate));

        if removed.is_empty() {
            return Err(rejected("delete", EngineError::no_matching_records()));
        }

        *data = kept;
        self.cache.invalidate();

        let ids: Vec<i64> = removed.iter().map(Record::id).collect();
        let count = ids.len().to_string();
        log_event_with_fields(
            Event::RecordsDeleted,
            &[("table", table), ("count", count.as_str())],
        );

        Ok(RecordsDeleted {
            table: table.to_string(),
            ids,
        })
    }

    /// Describes a table's columns and size
    pub fn info(
        &self,
        registry: &SchemaRegistry,
        table: &str,
        data: &[Record],
    ) -> EngineResult<TableInfo> {
        let schema = Self::schema(registry, table)?;
        Ok(TableInfo {
            table: table.to_string(),
            schema: schema.clone(),
            record_count: data.len(),
        })
    }

    fn schema<'r>(registry: &'r SchemaRegistry, table: &str) -> EngineResult<&'r TableSchema> {
        registry
            .get(table)
            .ok_or_else(|| EngineError::table_not_found(table))
    }

    fn check_table_name(table: &str) -> EngineResult<()> {
        if table.trim().is_empty() {
            return Err(EngineError::validation("Table name must not be empty."));
        }
        if table.contains(|c: char| c == '/' || c == '\\') || table == "." || table == ".." {
            return Err(EngineError::validation(format!(
                "Invalid table name \"{}\".",
                table
            )));
        }
        Ok(())
    }
}

/// Logs a rejected operation and converts it into an engine error
fn rejected(operation: &str, err: impl Into<EngineError>) -> EngineError {
    let err = err.into();
    Logger::warn(
        Event::OperationRejected.as_str(),
        &[
            ("code", err.code().code()),
            ("operation", operation),
            ("reason", err.message()),
        ],
    );
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::confirm::{AutoConfirm, Decline};
    use crate::engine::errors::EngineErrorCode;

    fn setup() -> (TableEngine, SchemaRegistry) {
        let mut engine = TableEngine::default();
        let mut registry = SchemaRegistry::new();
        engine
            .create_table(&mut registry, "users", &["name:str", "age:int"])
            .unwrap();
        (engine, registry)
    }

    fn row(name: &str, age: i64) -> Vec<Value> {
        vec![Value::from(name), Value::Int(age)]
    }

    #[test]
    fn test_create_table_rejects_bad_names() {
        let mut engine = TableEngine::default();
        let mut registry = SchemaRegistry::new();

        for name in ["", "  ", "../etc", "a/b"] {
            let err = engine
                .create_table(&mut registry, name, &["x:int"])
                .unwrap_err();
            assert_eq!(err.code(), EngineErrorCode::ValidationFailed);
        }
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insert_binds_values_by_column() {
        let (mut engine, registry) = setup();
        let mut data = Vec::new();

        let inserted = engine
            .insert(&registry, "users", row("Ann", 30), &mut data)
            .unwrap();

        assert_eq!(inserted.id, 1);
        assert_eq!(data[0].get("ID"), Some(&Value::Int(1)));
        assert_eq!(data[0].get("name"), Some(&Value::from("Ann")));
        assert_eq!(data[0].get("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_insert_type_mismatch_leaves_data() {
        let (mut engine, registry) = setup();
        let mut data = Vec::new();

        let err = engine
            .insert(&registry, "users", vec![Value::from("Ann"), Value::Bool(true)], &mut data)
            .unwrap_err();

        assert_eq!(err.code(), EngineErrorCode::ValidationFailed);
        assert!(err.message().contains("age"));
        assert!(data.is_empty());
    }

    #[test]
    fn test_select_rejects_unknown_column() {
        let (mut engine, registry) = setup();
        let err = engine
            .select(&registry, "users", &[], &Predicate::eq("email", "x"))
            .unwrap_err();
        assert_eq!(err.code(), EngineErrorCode::ValidationFailed);
    }

    #[test]
    fn test_update_rejects_id_assignment() {
        let (mut engine, registry) = setup();
        let mut data = Vec::new();
        engine.insert(&registry, "users", row("Ann", 30), &mut data).unwrap();

        let before = data.clone();
        let err = engine
            .update(
                &registry,
                "users",
                &mut data,
                &Assignments::new().set("ID", 5i64),
                &Predicate::all(),
            )
            .unwrap_err();

        assert_eq!(err.code(), EngineErrorCode::ValidationFailed);
        assert_eq!(data, before);
    }

    #[test]
    fn test_update_rejects_wrong_type() {
        let (mut engine, registry) = setup();
        let mut data = Vec::new();
        engine.insert(&registry, "users", row("Ann", 30), &mut data).unwrap();

        let err = engine
            .update(
                &registry,
                "users",
                &mut data,
                &Assignments::new().set("age", "old"),
                &Predicate::eq("ID", 1i64),
            )
            .unwrap_err();
        assert_eq!(err.code(), EngineErrorCode::ValidationFailed);
        assert_eq!(data[0].get("age"), Some(&Value::Int(30)));
    }

    #[test]
    fn test_delete_declined_asks_before_validation() {
        let (mut engine, registry) = setup();
        let mut data = Vec::new();

        let err = engine
            .delete(&registry, "missing", &mut data, &Predicate::all(), &mut Decline)
            .unwrap_err();
        assert!(err.is_cancelled());
    }

    #[test]
    fn test_delete_with_empty_predicate_removes_all() {
        let (mut engine, registry) = setup();
        let mut data = Vec::new();
        engine.insert(&registry, "users", row("Ann", 30), &mut data).unwrap();
        engine.insert(&registry, "users", row("Bo", 25), &mut data).unwrap();

        let deleted = engine
            .delete(&registry, "users", &mut data, &Predicate::all(), &mut AutoConfirm)
            .unwrap();
        assert_eq!(deleted.ids, vec![1, 2]);
        assert!(data.is_empty());
    }

    #[test]
    fn test_info() {
        let (engine, registry) = setup();
        let info = engine.info(&registry, "users", &[]).unwrap();
        assert_eq!(info.record_count, 0);
        assert_eq!(info.schema.describe(), "ID:int, name:str, age:int");

        let err = engine.info(&registry, "nope", &[]).unwrap_err();
        assert_eq!(err.code(), EngineErrorCode::NotFound);
    }
}

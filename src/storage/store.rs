//! Schema and table persistence
//!
//! On-disk layout under the data directory:
//! - `db_meta.json`: the schema registry, `{ "<table>": [{"name", "type"}, ...] }`
//! - `data/<table>.json`: the table's records as a JSON array
//!
//! Writes go to a `.tmp` file, are fsynced, then renamed over the target, so a
//! crash leaves either the old or the new file.

use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::observability::{log_event_with_fields, Event};
use crate::schema::{Record, SchemaRegistry, Value, ID_COLUMN};

use super::errors::{StorageError, StorageResult};

/// Schema registry file name
pub const META_FILE_NAME: &str = "db_meta.json";

/// Table data subdirectory name
pub const TABLES_DIR_NAME: &str = "data";

/// Load/store contract between the shell and durable state.
///
/// Missing state is not an error: an absent registry loads as empty, an
/// absent table loads as no records.
pub trait Persistence {
    fn load_schema(&self) -> StorageResult<SchemaRegistry>;
    fn save_schema(&mut self, registry: &SchemaRegistry) -> StorageResult<()>;
    fn load_table(&self, table: &str) -> StorageResult<Vec<Record>>;
    fn save_table(&mut self, table: &str, records: &[Record]) -> StorageResult<()>;
    /// Removes a table's records. Removing an absent table is a no-op.
    fn remove_table(&mut self, table: &str) -> StorageResult<()>;
}

/// JSON files under a data directory
#[derive(Debug, Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Creates the data directory layout. Existing files are left alone.
    pub fn init(&self) -> StorageResult<()> {
        let tables_dir = self.tables_dir();
        fs::create_dir_all(&tables_dir).map_err(|e| StorageError::io(&tables_dir, e))?;
        log_event_with_fields(
            Event::DataDirInitialized,
            &[("data_dir", &*self.data_dir.to_string_lossy())],
        );
        Ok(())
    }

    /// Returns true if the layout created by `init` exists
    pub fn is_initialized(&self) -> bool {
        self.tables_dir().is_dir()
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn meta_path(&self) -> PathBuf {
        self.data_dir.join(META_FILE_NAME)
    }

    pub fn tables_dir(&self) -> PathBuf {
        self.data_dir.join(TABLES_DIR_NAME)
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.tables_dir().join(format!("{}.json", table))
    }
}

impl Persistence for FileStore {
    fn load_schema(&self) -> StorageResult<SchemaRegistry> {
        let path = self.meta_path();
        let registry: SchemaRegistry = read_json(&path)?.unwrap_or_default();

        registry
            .validate_structure()
            .map_err(|reason| StorageError::InvalidSchema {
                path: path.clone(),
                reason,
            })?;

        let count = registry.len().to_string();
        log_event_with_fields(Event::SchemaLoaded, &[("tables", count.as_str())]);
        Ok(registry)
    }

    fn save_schema(&mut self, registry: &SchemaRegistry) -> StorageResult<()> {
        write_json_atomic(&self.meta_path(), registry)?;
        let count = registry.len().to_string();
        log_event_with_fields(Event::SchemaSaved, &[("tables", count.as_str())]);
        Ok(())
    }

    fn load_table(&self, table: &str) -> StorageResult<Vec<Record>> {
        let path = self.table_path(table);
        let records: Vec<Record> = read_json(&path)?.unwrap_or_default();

        for (index, record) in records.iter().enumerate() {
            if !matches!(record.get(ID_COLUMN), Some(Value::Int(_))) {
                return Err(StorageError::InvalidTable {
                    path,
                    reason: format!("record {} has no integer '{}'", index, ID_COLUMN),
                });
            }
        }

        Ok(records)
    }

    fn save_table(&mut self, table: &str, records: &[Record]) -> StorageResult<()> {
        write_json_atomic(&self.table_path(table), &records)?;
        let count = records.len().to_string();
        log_event_with_fields(
            Event::TableSaved,
            &[("table", table), ("records", count.as_str())],
        );
        Ok(())
    }

    fn remove_table(&mut self, table: &str) -> StorageResult<()> {
        let path = self.table_path(table);
        match fs::remove_file(&path) {
            Ok(()) => {
                log_event_with_fields(Event::TableRemoved, &[("table", table)]);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(path, e)),
        }
    }
}

/// In-memory persistence, for tests and dry runs
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    registry: SchemaRegistry,
    tables: HashMap<String, Vec<Record>>,
    schema_saves: usize,
    table_saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save_schema` calls so far
    pub fn schema_saves(&self) -> usize {
        self.schema_saves
    }

    /// Number of `save_table` calls so far
    pub fn table_saves(&self) -> usize {
        self.table_saves
    }

    pub fn has_table_data(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }
}

impl Persistence for MemoryStore {
    fn load_schema(&self) -> StorageResult<SchemaRegistry> {
        Ok(self.registry.clone())
    }

    fn save_schema(&mut self, registry: &SchemaRegistry) -> StorageResult<()> {
        self.registry = registry.clone();
        self.schema_saves += 1;
        Ok(())
    }

    fn load_table(&self, table: &str) -> StorageResult<Vec<Record>> {
        Ok(self.tables.get(table).cloned().unwrap_or_default())
    }

    fn save_table(&mut self, table: &str, records: &[Record]) -> StorageResult<()> {
        self.tables.insert(table.to_string(), records.to_vec());
        self.table_saves += 1;
        Ok(())
    }

    fn remove_table(&mut self, table: &str) -> StorageResult<()> {
        self.tables.remove(table);
        Ok(())
    }
}

/// Reads and decodes a JSON file; `None` if the file does not exist
fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| StorageError::malformed(path, e))
}

/// Writes JSON to `<path>.tmp`, fsyncs, then renames over `path`
fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let content = serde_json::to_string_pretty(value).map_err(|e| StorageError::malformed(path, e))?;

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| StorageError::io(&temp_path, e))?;

    file.write_all(content.as_bytes())
        .map_err(|e| StorageError::io(&temp_path, e))?;
    file.sync_all().map_err(|e| StorageError::io(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| StorageError::io(path, e))?;

    // fsync the directory so the rename is durable
    if let Some(parent) = path.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::TableSchema;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry.insert(
            "users",
            TableSchema::from_specs(&["name:str", "age:int", "active:bool"]).unwrap(),
        );
        registry
    }

    #[test]
    fn test_missing_files_load_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.load_schema().unwrap().is_empty());
        assert!(store.load_table("users").unwrap().is_empty());
    }

    #[test]
    fn test_init_creates_layout() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("db"));
        assert!(!store.is_initialized());

        store.init().unwrap();
        assert!(store.is_initialized());
    }

    #[test]
    fn test_schema_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store.save_schema(&sample_registry()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.meta_path()).unwrap()).unwrap();
        assert_eq!(
            raw,
            json!({
                "users": [
                    {"name": "ID", "type": "int"},
                    {"name": "name", "type": "str"},
                    {"name": "age", "type": "int"},
                    {"name": "active", "type": "bool"}
                ]
            })
        );

        assert_eq!(store.load_schema().unwrap(), sample_registry());
        assert!(!store.meta_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn test_table_values_keep_their_types() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());

        let records = vec![Record::from_pairs([
            ("ID", Value::Int(7)),
            ("name", Value::from("true")),
            ("age", Value::Int(0)),
            ("active", Value::Bool(false)),
        ])];
        store.save_table("users", &records).unwrap();

        let loaded = store.load_table("users").unwrap();
        assert_eq!(loaded, records);
        assert_eq!(loaded[0].get("name"), Some(&Value::from("true")));
        assert_eq!(loaded[0].get("active"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_remove_table() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = FileStore::new(temp_dir.path());
        store.save_table("users", &[]).unwrap();
        assert!(store.table_path("users").exists());

        store.remove_table("users").unwrap();
        assert!(!store.table_path("users").exists());

        // Absent table is a no-op
        store.remove_table("users").unwrap();
    }

    #[test]
    fn test_malformed_schema_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        fs::write(store.meta_path(), "{not json").unwrap();

        let err = store.load_schema().unwrap_err();
        assert!(matches!(err, StorageError::Malformed { .. }));
    }

    #[test]
    fn test_schema_without_id_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        fs::write(
            store.meta_path(),
            r#"{"users": [{"name": "name", "type": "str"}]}"#,
        )
        .unwrap();

        let err = store.load_schema().unwrap_err();
        assert!(matches!(err, StorageError::InvalidSchema { .. }));
    }

    #[test]
    fn test_record_without_integer_id_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());
        store.init().unwrap();

        for content in [r#"[{"name": "Ann"}]"#, r#"[{"ID": "1", "name": "Ann"}]"#] {
            fs::write(store.table_path("users"), content).unwrap();
            let err = store.load_table("users").unwrap_err();
            assert!(matches!(err, StorageError::InvalidTable { .. }));
            assert_eq!(err.path(), store.table_path("users"));
        }
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let mut store = MemoryStore::new();
        store.save_schema(&sample_registry()).unwrap();
        store.save_table("users", &[]).unwrap();

        assert_eq!(store.schema_saves(), 1);
        assert_eq!(store.table_saves(), 1);
        assert!(store.has_table_data("users"));

        store.remove_table("users").unwrap();
        assert!(!store.has_table_data("users"));
    }
}

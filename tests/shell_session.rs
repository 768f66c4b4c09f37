//! Shell Session Tests
//!
//! Scripted sessions against a `FileStore` in a temporary directory:
//! - State-changing commands persist db_meta.json and data/<table>.json
//! - Reads and rejected commands write nothing
//! - A declined confirmation writes nothing
//! - State survives a new session on the same directory

use std::fs;
use std::io::Cursor;
use std::path::Path;

use primdb::engine::TableEngine;
use primdb::schema::Value;
use primdb::shell::{LineStatus, Shell};
use primdb::storage::{FileStore, Persistence};
use serde_json::json;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

type FileShell = Shell<FileStore, Cursor<Vec<u8>>, Vec<u8>>;

fn open_shell(dir: &Path, answers: &str) -> FileShell {
    let store = FileStore::new(dir);
    store.init().unwrap();
    Shell::new(
        store,
        TableEngine::default(),
        Cursor::new(answers.as_bytes().to_vec()),
        Vec::new(),
    )
}

fn run(shell: &mut FileShell, line: &str) -> LineStatus {
    shell.execute_line(line).unwrap()
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn output(shell: FileShell) -> String {
    let (_, out) = shell.into_parts();
    String::from_utf8(out).unwrap()
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_scripted_session_persists_state() {
    let tmp = TempDir::new().unwrap();
    let mut shell = open_shell(tmp.path(), "y\n");

    assert_eq!(run(&mut shell, "create_table users name:str age:int active:bool"), LineStatus::Ok);
    assert_eq!(
        read_json(&tmp.path().join("db_meta.json")),
        json!({
            "users": [
                {"name": "ID", "type": "int"},
                {"name": "name", "type": "str"},
                {"name": "age", "type": "int"},
                {"name": "active", "type": "bool"}
            ]
        })
    );

    assert_eq!(run(&mut shell, r#"insert into users values ("Smith, J", 28, true)"#), LineStatus::Ok);
    assert_eq!(run(&mut shell, r#"insert into users values ("Bo", 35, false)"#), LineStatus::Ok);
    assert_eq!(
        run(&mut shell, r#"update users set age = 29 where name = "Smith, J""#),
        LineStatus::Ok
    );
    assert_eq!(run(&mut shell, "delete from users where ID = 2"), LineStatus::Ok);

    assert_eq!(
        read_json(&tmp.path().join("data").join("users.json")),
        json!([
            {"ID": 1, "name": "Smith, J", "age": 29, "active": true}
        ])
    );

    let out = output(shell);
    assert!(out.contains("Record with ID=1 inserted into \"users\"."));
    assert!(out.contains("Record with ID=2 inserted into \"users\"."));
    assert!(out.contains("Record with ID=1 in \"users\" updated."));
    assert!(out.contains("Record with ID=2 deleted from \"users\"."));
}

#[test]
fn test_reads_and_rejections_write_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut shell = open_shell(tmp.path(), "");

    run(&mut shell, "create_table users name:str");
    run(&mut shell, r#"insert into users values ("Ann")"#);

    let table_path = tmp.path().join("data").join("users.json");
    let meta_before = fs::read_to_string(tmp.path().join("db_meta.json")).unwrap();
    let data_before = fs::read_to_string(&table_path).unwrap();

    assert_eq!(run(&mut shell, "select from users"), LineStatus::Ok);
    assert_eq!(run(&mut shell, "info users"), LineStatus::Ok);
    assert_eq!(run(&mut shell, "list_tables"), LineStatus::Ok);
    assert_eq!(run(&mut shell, "insert into users values (1)"), LineStatus::Failed);
    assert_eq!(run(&mut shell, "create_table users other:int"), LineStatus::Failed);
    assert_eq!(run(&mut shell, "update users set name = \"X\" where ID = 9"), LineStatus::Failed);
    assert_eq!(run(&mut shell, "select from ghosts"), LineStatus::Failed);
    assert_eq!(run(&mut shell, "nonsense"), LineStatus::Failed);

    assert_eq!(fs::read_to_string(tmp.path().join("db_meta.json")).unwrap(), meta_before);
    assert_eq!(fs::read_to_string(&table_path).unwrap(), data_before);

    let out = output(shell);
    assert!(out.contains("Error: Table \"users\" already exists."));
    assert!(out.contains("Error: Table \"ghosts\" does not exist."));
    assert!(out.contains("Error: No records matched the condition."));
    assert!(out.contains("Records: 1"));
    assert!(out.contains("- users"));
}

#[test]
fn test_declined_confirmation_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let mut shell = open_shell(tmp.path(), "n\nno\n");

    run(&mut shell, "create_table users name:str");
    run(&mut shell, r#"insert into users values ("Ann")"#);

    let table_path = tmp.path().join("data").join("users.json");
    let meta_before = fs::read_to_string(tmp.path().join("db_meta.json")).unwrap();
    let data_before = fs::read_to_string(&table_path).unwrap();

    assert_eq!(run(&mut shell, "delete from users where ID = 1"), LineStatus::Failed);
    assert_eq!(run(&mut shell, "drop_table users"), LineStatus::Failed);

    assert_eq!(fs::read_to_string(tmp.path().join("db_meta.json")).unwrap(), meta_before);
    assert_eq!(fs::read_to_string(&table_path).unwrap(), data_before);

    let out = output(shell);
    assert_eq!(out.matches("Operation cancelled.").count(), 2);
}

#[test]
fn test_drop_table_removes_data_file() {
    let tmp = TempDir::new().unwrap();
    let mut shell = open_shell(tmp.path(), "Y\n");

    run(&mut shell, "create_table users name:str");
    run(&mut shell, r#"insert into users values ("Ann")"#);
    let table_path = tmp.path().join("data").join("users.json");
    assert!(table_path.exists());

    assert_eq!(run(&mut shell, "drop_table users"), LineStatus::Ok);
    assert!(!table_path.exists());
    assert_eq!(read_json(&tmp.path().join("db_meta.json")), json!({}));

    // A recreated table starts empty with fresh IDs
    run(&mut shell, "create_table users email:str");
    run(&mut shell, r#"insert into users values ("a@b")"#);
    let store = FileStore::new(tmp.path());
    let records = store.load_table("users").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].id(), 1);
}

/// When the data file cannot be removed the table stays registered on disk.
#[test]
fn test_failed_data_removal_keeps_table() {
    let tmp = TempDir::new().unwrap();
    let mut shell = open_shell(tmp.path(), "y\n");

    run(&mut shell, "create_table users name:str");
    let meta_before = fs::read_to_string(tmp.path().join("db_meta.json")).unwrap();

    // A directory in place of the data file makes removal fail
    fs::create_dir(tmp.path().join("data").join("users.json")).unwrap();

    assert_eq!(run(&mut shell, "drop_table users"), LineStatus::Failed);
    assert_eq!(fs::read_to_string(tmp.path().join("db_meta.json")).unwrap(), meta_before);
    assert!(shell.store().load_schema().unwrap().contains("users"));
}

#[test]
fn test_state_survives_new_session() {
    let tmp = TempDir::new().unwrap();

    let mut first = open_shell(tmp.path(), "");
    run(&mut first, "create_table notes body:str pinned:bool");
    run(&mut first, r#"insert into notes values ("true", TRUE)"#);
    drop(first);

    let mut second = open_shell(tmp.path(), "");
    run(&mut second, r#"insert into notes values ("later", false)"#);

    let records = second.store().load_table("notes").unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("body"), Some(&Value::from("true")));
    assert_eq!(records[0].get("pinned"), Some(&Value::Bool(true)));
    assert_eq!(records[1].id(), 2);
}

#[test]
fn test_interactive_loop() {
    let tmp = TempDir::new().unwrap();
    let script = "create_table t a:int\n\ninsert into t values (5)\nselect from t where a = 5\nhelp\nexit\n";
    let mut shell = open_shell(tmp.path(), script);

    shell.run().unwrap();

    let out = output(shell);
    assert!(out.contains("| ID | a |"));
    assert!(out.contains("| 1  | 5 |"));
    assert!(out.contains("list_tables"));
    assert!(out.trim_end().ends_with("Goodbye."));
}

//! Storage subsystem for primdb
//!
//! Persists the schema registry and each table's records as JSON files. The
//! table engine never calls storage; the shell loads state before an
//! operation and saves it afterwards, only when it changed.
//!
//! # Design Principles
//!
//! - Whole-file snapshots, no partial updates
//! - Atomic replace (temp file, fsync, rename)
//! - Missing files mean empty state
//! - Lossless round-trip of int, str and bool values

mod errors;
mod store;

pub use errors::{StorageError, StorageResult};
pub use store::{FileStore, MemoryStore, Persistence, META_FILE_NAME, TABLES_DIR_NAME};

//! Table engine subsystem for primdb
//!
//! The engine validates and applies every table operation. It owns nothing but
//! its query cache: the schema registry and table data are lent in by the
//! caller, mutated only on success, and persisted by the caller.
//!
//! # Operation Flow
//!
//! 1. Confirm (drop table, delete only)
//! 2. Resolve the table schema
//! 3. Validate input against the schema
//! 4. Apply the change, or serve the read from the query cache
//! 5. Invalidate the query cache after any write
//!
//! # Threading
//!
//! Single-threaded. Every operation takes `&mut self`; a multi-threaded host
//! must put the engine and the data it operates on behind one mutex.

mod cache;
mod confirm;
mod engine;
mod errors;
mod matcher;
mod outcome;

pub use cache::{CacheKey, CacheStats, QueryCache, QueryCacheConfig};
pub use confirm::{AutoConfirm, Confirm, Decline};
pub use engine::TableEngine;
pub use errors::{EngineError, EngineErrorCode, EngineResult};
pub use matcher::{Assignments, Predicate, RecordMatcher};
pub use outcome::{
    RecordInserted, RecordsDeleted, RecordsUpdated, TableCreated, TableDropped, TableInfo,
};

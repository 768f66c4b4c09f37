//! Observability events for primdb
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

/// Observable events in primdb
///
/// Covers:
/// - Process lifecycle
/// - Schema and table persistence
/// - Table engine operations
/// - Query cache activity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Data directory initialized
    DataDirInitialized,
    /// Interactive shell started
    ShellStart,
    /// Interactive shell exited
    ShellExit,

    // Persistence
    /// Schema registry read from disk
    SchemaLoaded,
    /// Schema registry written to disk
    SchemaSaved,
    /// Table data written to disk
    TableSaved,
    /// Table data file removed
    TableRemoved,
    /// Persistence failed
    StorageFailed,

    // Engine
    /// Table added to the registry
    TableCreated,
    /// Table removed from the registry
    TableDropped,
    /// Record appended
    RecordInserted,
    /// Records updated
    RecordsUpdated,
    /// Records deleted
    RecordsDeleted,
    /// Operation rejected by validation or cancelled
    OperationRejected,

    // Cache
    /// Select served from the query cache
    CacheHit,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DataDirInitialized => "DATA_DIR_INITIALIZED",
            Event::ShellStart => "SHELL_START",
            Event::ShellExit => "SHELL_EXIT",

            Event::SchemaLoaded => "SCHEMA_LOADED",
            Event::SchemaSaved => "SCHEMA_SAVED",
            Event::TableSaved => "TABLE_SAVED",
            Event::TableRemoved => "TABLE_REMOVED",
            Event::StorageFailed => "STORAGE_FAILED",

            Event::TableCreated => "TABLE_CREATED",
            Event::TableDropped => "TABLE_DROPPED",
            Event::RecordInserted => "RECORD_INSERTED",
            Event::RecordsUpdated => "RECORDS_UPDATED",
            Event::RecordsDeleted => "RECORDS_DELETED",
            Event::OperationRejected => "OPERATION_REJECTED",

            Event::CacheHit => "CACHE_HIT",
        }
    }

    /// Default severity for this event
    pub fn severity(&self) -> Severity {
        match self {
            Event::StorageFailed => Severity::Error,
            Event::OperationRejected => Severity::Warn,
            Event::CacheHit | Event::TableSaved | Event::SchemaSaved => Severity::Trace,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

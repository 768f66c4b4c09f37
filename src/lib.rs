//! primdb - a small schema-checked table store kept in flat JSON files
//!
//! Tables have a fixed column list with an implicit `ID:int` first column.
//! Records are validated against it on every write, selects are memoized
//! until the next write, and destructive commands ask before running.
//!
//! - `schema`: column types, values, records and the table registry
//! - `engine`: table operations, predicate matching and the query cache
//! - `storage`: JSON persistence of the registry and table data
//! - `shell`: command grammar and the interactive session
//! - `cli`: argument parsing, configuration and entry points
//! - `observability`: structured logging

pub mod cli;
pub mod engine;
pub mod observability;
pub mod schema;
pub mod shell;
pub mod storage;

//! Interactive command loop
//!
//! Each command runs against fresh state: the registry (and table data when
//! needed) is loaded from the store, handed to the engine, and written back
//! only when the engine reports a successful change.

use std::io::{self, BufRead, Write};

use crate::engine::{AutoConfirm, Confirm, TableEngine};
use crate::observability::{log_event, log_event_with_fields, Event, ObservationScope};
use crate::storage::Persistence;

use super::errors::{ShellError, ShellResult};
use super::parser::{parse_statement, Statement};
use super::render::render_records;

pub const PROMPT: &str = "primdb> ";

pub const HELP: &str = "\
Commands:
  create_table <name> <column:type> ...        create a table (types: int, str, bool)
  drop_table <name>                            drop a table and its records
  list_tables                                  list all tables
  insert into <name> values (<v1>, <v2>, ...)  add a record
  select from <name> [where <col> = <v>]       show records
  update <name> set <col> = <v> where <col> = <v>
                                               change matching records
  delete from <name> where <col> = <v>         remove matching records
  info <name>                                  show a table's columns and size
  help                                         show this message
  exit                                         leave the shell

Conditions may be joined with 'and'. Quote text values: \"Ann\".";

/// Result of running one command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStatus {
    Ok,
    Failed,
    Exit,
}

enum Reply {
    Text(String),
    Exit,
}

/// Console confirmation: `y` (any case) accepts, anything else declines
struct ConsolePrompt<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Confirm for ConsolePrompt<'_, R, W> {
    fn ask(&mut self, action: &str) -> bool {
        if write!(self.output, "Are you sure you want to {}? [y/n]: ", action).is_err()
            || self.output.flush().is_err()
        {
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => answer.trim().eq_ignore_ascii_case("y"),
        }
    }
}

/// A shell session over a store, an input and an output
pub struct Shell<P, R, W> {
    store: P,
    engine: TableEngine,
    input: R,
    output: W,
    confirm_destructive: bool,
}

impl<P: Persistence, R: BufRead, W: Write> Shell<P, R, W> {
    pub fn new(store: P, engine: TableEngine, input: R, output: W) -> Self {
        Self {
            store,
            engine,
            input,
            output,
            confirm_destructive: true,
        }
    }

    /// When false, destructive commands run without asking
    pub fn with_confirmation(mut self, confirm_destructive: bool) -> Self {
        self.confirm_destructive = confirm_destructive;
        self
    }

    pub fn store(&self) -> &P {
        &self.store
    }

    pub fn engine(&self) -> &TableEngine {
        &self.engine
    }

    /// Consumes the shell, returning the store and output
    pub fn into_parts(self) -> (P, W) {
        (self.store, self.output)
    }

    /// Reads and runs commands until `exit` or end of input
    pub fn run(&mut self) -> io::Result<()> {
        log_event(Event::ShellStart);
        writeln!(self.output, "primdb shell. Type 'help' for commands.")?;

        loop {
            write!(self.output, "{}", PROMPT)?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                break;
            }
            if line.trim().is_empty() {
                continue;
            }

            if self.execute_line(&line)? == LineStatus::Exit {
                break;
            }
        }

        log_event(Event::ShellExit);
        Ok(())
    }

    /// Runs one command line and prints its reply or error
    pub fn execute_line(&mut self, line: &str) -> io::Result<LineStatus> {
        let statement = match parse_statement(line) {
            Ok(statement) => statement,
            Err(e) => {
                writeln!(self.output, "{}", ShellError::from(e).user_message())?;
                return Ok(LineStatus::Failed);
            }
        };

        let scope = ObservationScope::with_fields("COMMAND", &[("command", statement.name())]);
        match self.execute(statement) {
            Ok(Reply::Text(text)) => {
                scope.complete();
                writeln!(self.output, "{}", text)?;
                Ok(LineStatus::Ok)
            }
            Ok(Reply::Exit) => {
                scope.complete();
                writeln!(self.output, "Goodbye.")?;
                Ok(LineStatus::Exit)
            }
            Err(e) => {
                if let ShellError::Storage(storage) = &e {
                    log_event_with_fields(
                        Event::StorageFailed,
                        &[("path", &*storage.path().to_string_lossy())],
                    );
                }
                scope.complete();
                writeln!(self.output, "{}", e.user_message())?;
                Ok(LineStatus::Failed)
            }
        }
    }

    fn execute(&mut self, statement: Statement) -> ShellResult<Reply> {
        let Shell {
            store,
            engine,
            input,
            output,
            confirm_destructive,
        } = self;

        let mut prompt = ConsolePrompt { input, output };
        let mut auto = AutoConfirm;
        let confirm: &mut dyn Confirm = if *confirm_destructive {
            &mut prompt
        } else {
            &mut auto
        };

        let text = match statement {
            Statement::CreateTable { table, columns } => {
                let mut registry = store.load_schema()?;
                let created = engine.create_table(&mut registry, &table, columns.as_slice())?;
                store.save_schema(&registry)?;
                created.to_string()
            }
            Statement::DropTable { table } => {
                let mut registry = store.load_schema()?;
                let dropped = engine.drop_table(&mut registry, &table, confirm)?;
                // Data file first: a failed removal leaves the table registered
                store.remove_table(&table)?;
                store.save_schema(&registry)?;
                dropped.to_string()
            }
            Statement::ListTables => {
                let registry = store.load_schema()?;
                if registry.is_empty() {
                    "No tables.".to_string()
                } else {
                    registry
                        .table_names()
                        .map(|name| format!("- {}", name))
                        .collect::<Vec<_>>()
                        .join("\n")
                }
            }
            Statement::Insert { table, values } => {
                let registry = store.load_schema()?;
                let mut data = store.load_table(&table)?;
                let inserted = engine.insert(&registry, &table, values, &mut data)?;
                store.save_table(&table, &data)?;
                inserted.to_string()
            }
            Statement::Select { table, predicate } => {
                let registry = store.load_schema()?;
                let data = store.load_table(&table)?;
                let records = engine.select(&registry, &table, &data, &predicate)?;
                match registry.get(&table) {
                    Some(schema) if !records.is_empty() => render_records(schema, &records),
                    _ => "No records found.".to_string(),
                }
            }
            Statement::Update {
                table,
                assignments,
                predicate,
            } => {
                let registry = store.load_schema()?;
                let before = store.load_table(&table)?;
                let mut data = before.clone();
                let updated = engine.update(&registry, &table, &mut data, &assignments, &predicate)?;
                if data != before {
                    store.save_table(&table, &data)?;
                }
                updated.to_string()
            }
            Statement::Delete { table, predicate } => {
                let registry = store.load_schema()?;
                let mut data = store.load_table(&table)?;
                let deleted = engine.delete(&registry, &table, &mut data, &predicate, confirm)?;
                store.save_table(&table, &data)?;
                deleted.to_string()
            }
            Statement::Info { table } => {
                let registry = store.load_schema()?;
                let data = store.load_table(&table)?;
                engine.info(&registry, &table, &data)?.to_string()
            }
            Statement::Help => HELP.to_string(),
            Statement::Exit => return Ok(Reply::Exit),
        };

        Ok(Reply::Text(text))
    }
}

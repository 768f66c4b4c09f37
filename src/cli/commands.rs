//! CLI command implementations
//!
//! Every command resolves its configuration first, which also sets the log
//! level, then opens the data directory through a `FileStore`.

use std::io::{self, Write};
use std::path::Path;

use crate::engine::TableEngine;
use crate::shell::{LineStatus, Shell};
use crate::storage::FileStore;

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(config.as_deref()),
        Command::Shell { config } => shell(config.as_deref()),
        Command::Exec {
            config,
            yes,
            command,
        } => exec(config.as_deref(), yes, &command.join(" ")),
    }
}

/// Create the data directory layout
pub fn init(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    let store = FileStore::new(config.data_path());

    if store.is_initialized() {
        return Err(CliError::already_initialized(&config.data_dir));
    }

    store.init()?;

    let mut stdout = io::stdout();
    writeln!(stdout, "Initialized data directory '{}'.", config.data_dir)?;
    stdout.flush()?;

    Ok(())
}

/// Run the interactive shell on stdin/stdout
pub fn shell(config_path: Option<&Path>) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    let store = open_store(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(
        store,
        TableEngine::new(config.cache_config()),
        stdin.lock(),
        stdout.lock(),
    )
    .with_confirmation(config.confirm_destructive);

    shell.run()?;
    Ok(())
}

/// Run one command line.
///
/// `yes` skips the confirmation prompt for destructive commands.
pub fn exec(config_path: Option<&Path>, yes: bool, line: &str) -> CliResult<()> {
    let config = Config::resolve(config_path)?;
    let store = open_store(&config)?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(
        store,
        TableEngine::new(config.cache_config()),
        stdin.lock(),
        stdout.lock(),
    )
    .with_confirmation(config.confirm_destructive && !yes);

    match shell.execute_line(line)? {
        LineStatus::Failed => Err(CliError::command_failed(line.trim())),
        LineStatus::Ok | LineStatus::Exit => Ok(()),
    }
}

fn open_store(config: &Config) -> CliResult<FileStore> {
    let store = FileStore::new(config.data_path());
    if !store.is_initialized() {
        return Err(CliError::not_initialized(&config.data_dir));
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::errors::CliErrorCode;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> std::path::PathBuf {
        let data_dir = dir.path().join("data_root");
        let path = dir.path().join("primdb.json");
        let content = serde_json::json!({ "data_dir": data_dir }).to_string();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_init_then_exec() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        init(Some(&config)).unwrap();
        assert!(dir.path().join("data_root").join("data").is_dir());

        exec(Some(&config), false, "create_table users name:str age:int").unwrap();
        exec(Some(&config), false, "insert into users values (\"Ann\", 30)").unwrap();

        let rows = fs::read_to_string(dir.path().join("data_root/data/users.json")).unwrap();
        assert!(rows.contains("\"Ann\""));
    }

    #[test]
    fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        init(Some(&config)).unwrap();
        let err = init(Some(&config)).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_exec_requires_init() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let err = exec(Some(&config), false, "list_tables").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::NotInitialized);
    }

    #[test]
    fn test_exec_rejected_command_fails() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);
        init(Some(&config)).unwrap();

        let err = exec(Some(&config), false, "select from missing").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::CommandFailed);
    }
}

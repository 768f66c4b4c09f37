//! CLI module for primdb
//!
//! Provides command-line interface for:
//! - init: Create the data directory layout
//! - shell: Interactive command loop
//! - exec: One-shot command execution

mod args;
mod commands;
mod config;
mod errors;

pub use args::{Cli, Command};
pub use commands::{exec, init, run, run_command, shell};
pub use config::{Config, DEFAULT_CONFIG_PATH};
pub use errors::{CliError, CliErrorCode, CliResult};

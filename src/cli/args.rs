//! CLI argument definitions using clap
//!
//! Commands:
//! - primdb init [--config <path>]
//! - primdb shell [--config <path>]
//! - primdb exec [--config <path>] [--yes] <command>...

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// primdb - a small schema-checked table store kept in JSON files
#[derive(Parser, Debug)]
#[command(name = "primdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory layout
    Init {
        /// Path to configuration file (default: ./primdb.json, optional)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run the interactive shell
    Shell {
        /// Path to configuration file (default: ./primdb.json, optional)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Run a single command line and exit
    Exec {
        /// Path to configuration file (default: ./primdb.json, optional)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Do not ask before drop_table or delete
        #[arg(long, short = 'y')]
        yes: bool,

        /// The command, e.g. select from users where age = 30
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        command: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

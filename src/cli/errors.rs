//! CLI-specific error types
//!
//! CLI errors end the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::storage::StorageError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout)
    IoError,
    /// Data directory could not be read or written
    StorageError,
    /// Already initialized
    AlreadyInitialized,
    /// Not initialized
    NotInitialized,
    /// A one-shot command was rejected
    CommandFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PRIMDB_CLI_CONFIG_ERROR",
            Self::IoError => "PRIMDB_CLI_IO_ERROR",
            Self::StorageError => "PRIMDB_CLI_STORAGE_ERROR",
            Self::AlreadyInitialized => "PRIMDB_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "PRIMDB_CLI_NOT_INITIALIZED",
            Self::CommandFailed => "PRIMDB_CLI_COMMAND_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn already_initialized(data_dir: &str) -> Self {
        Self::new(
            CliErrorCode::AlreadyInitialized,
            format!("Data directory '{}' already initialized", data_dir),
        )
    }

    pub fn not_initialized(data_dir: &str) -> Self {
        Self::new(
            CliErrorCode::NotInitialized,
            format!(
                "Data directory '{}' not initialized. Run 'primdb init' first.",
                data_dir
            ),
        )
    }

    pub fn command_failed(command: &str) -> Self {
        Self::new(
            CliErrorCode::CommandFailed,
            format!("Command failed: {}", command),
        )
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        Self::new(CliErrorCode::StorageError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = CliError::not_initialized("./primdb_data");
        assert_eq!(err.code(), &CliErrorCode::NotInitialized);
        assert!(err
            .to_string()
            .starts_with("PRIMDB_CLI_NOT_INITIALIZED: Data directory './primdb_data'"));
    }
}

//! Shell command errors
//!
//! A failed command is reported and the session continues.

use thiserror::Error;

use crate::engine::EngineError;
use crate::storage::StorageError;

use super::parser::ParseError;

pub type ShellResult<T> = Result<T, ShellError>;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{}", .0.message())]
    Engine(#[from] EngineError),

    #[error("{0}")]
    Storage(#[from] StorageError),
}

impl ShellError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ShellError::Engine(e) if e.is_cancelled())
    }

    /// Line printed to the user
    pub fn user_message(&self) -> String {
        if self.is_cancelled() {
            "Operation cancelled.".to_string()
        } else {
            format!("Error: {}", self)
        }
    }
}

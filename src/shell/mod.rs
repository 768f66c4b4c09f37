//! Interactive shell for primdb
//!
//! Turns command lines into engine calls:
//!
//! 1. Parse the line into a `Statement`
//! 2. Load the registry and table data from the store
//! 3. Run the engine operation, asking before destructive ones
//! 4. Persist what changed and print the outcome
//!
//! Errors from any step are printed and the session continues.

mod errors;
pub mod parser;
mod render;
mod session;

pub use errors::{ShellError, ShellResult};
pub use parser::{parse_literal, parse_statement, ParseError, ParseResult, Statement};
pub use render::render_records;
pub use session::{LineStatus, Shell, HELP, PROMPT};

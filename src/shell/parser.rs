//! Command grammar
//!
//! ```text
//! create_table <name> <col:type> ...
//! drop_table <name>
//! list_tables
//! insert into <name> values (<v>, <v>, ...)
//! select from <name> [where <col> = <v> [and <col> = <v> ...]]
//! update <name> set <col> = <v>[, <col> = <v> ...] where <col> = <v> [and ...]
//! delete from <name> where <col> = <v> [and ...]
//! info <name>
//! help
//! exit
//! ```
//!
//! Keywords are case-insensitive. The parser only checks shape; column names,
//! value types and table existence are checked by the engine.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::engine::{Assignments, Predicate};
use crate::schema::Value;

/// Result type for parsing
pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}'; type 'help' for the list of commands")]
    UnknownCommand(String),

    #[error("unexpected end of command, expected {0}")]
    UnexpectedEnd(&'static str),

    #[error("expected {expected}, found '{found}'")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("unterminated quoted string")]
    UnterminatedQuote,

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),
}

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable { table: String, columns: Vec<String> },
    DropTable { table: String },
    ListTables,
    Insert { table: String, values: Vec<Value> },
    Select { table: String, predicate: Predicate },
    Update {
        table: String,
        assignments: Assignments,
        predicate: Predicate,
    },
    Delete { table: String, predicate: Predicate },
    Info { table: String },
    Help,
    Exit,
}

impl Statement {
    /// Command keyword, for logging
    pub fn name(&self) -> &'static str {
        match self {
            Statement::CreateTable { .. } => "create_table",
            Statement::DropTable { .. } => "drop_table",
            Statement::ListTables => "list_tables",
            Statement::Insert { .. } => "insert",
            Statement::Select { .. } => "select",
            Statement::Update { .. } => "update",
            Statement::Delete { .. } => "delete",
            Statement::Info { .. } => "info",
            Statement::Help => "help",
            Statement::Exit => "exit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Quoted(String),
    Symbol(char),
}

impl Token {
    fn text(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Quoted(q) => format!("\"{}\"", q),
            Token::Symbol(c) => c.to_string(),
        }
    }
}

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| {
        Regex::new(r#""(?P<quoted>[^"]*)(?P<close>"?)|(?P<symbol>[(),=])|(?P<word>[^\s(),="]+)"#)
            .expect("token pattern is valid")
    })
}

fn tokenize(line: &str) -> ParseResult<Vec<Token>> {
    let mut tokens = Vec::new();
    for caps in token_regex().captures_iter(line) {
        if let Some(quoted) = caps.name("quoted") {
            if caps.name("close").map_or(true, |m| m.as_str().is_empty()) {
                return Err(ParseError::UnterminatedQuote);
            }
            tokens.push(Token::Quoted(quoted.as_str().to_string()));
        } else if let Some(symbol) = caps.name("symbol") {
            if let Some(c) = symbol.as_str().chars().next() {
                tokens.push(Token::Symbol(c));
            }
        } else if let Some(word) = caps.name("word") {
            tokens.push(Token::Word(word.as_str().to_string()));
        }
    }
    Ok(tokens)
}

/// Converts a literal into a typed value.
///
/// Quoted text is always a string; unquoted `true`/`false` are booleans,
/// base-10 integers are ints, anything else is a string.
pub fn parse_literal(raw: &str) -> Value {
    if raw.eq_ignore_ascii_case("true") {
        Value::Bool(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Value::Bool(false)
    } else if let Ok(n) = raw.parse::<i64>() {
        Value::Int(n)
    } else {
        Value::Str(raw.to_string())
    }
}

/// Parses one command line
pub fn parse_statement(line: &str) -> ParseResult<Statement> {
    let tokens = tokenize(line)?;
    let mut cursor = Cursor::new(tokens);

    let command = match cursor.next() {
        Some(Token::Word(w)) => w.to_ascii_lowercase(),
        Some(other) => return Err(ParseError::UnknownCommand(other.text())),
        None => return Err(ParseError::Empty),
    };

    let statement = match command.as_str() {
        "create_table" => {
            let table = cursor.word("table name")?;
            let mut columns = Vec::new();
            while let Some(token) = cursor.next() {
                match token {
                    Token::Word(spec) => columns.push(spec),
                    other => {
                        return Err(ParseError::UnexpectedToken {
                            expected: "column definition <name:type>",
                            found: other.text(),
                        })
                    }
                }
            }
            Statement::CreateTable { table, columns }
        }
        "drop_table" => Statement::DropTable {
            table: cursor.word("table name")?,
        },
        "list_tables" => Statement::ListTables,
        "insert" => {
            cursor.keyword("into")?;
            let table = cursor.word("table name")?;
            cursor.keyword("values")?;
            let values = cursor.value_list()?;
            Statement::Insert { table, values }
        }
        "select" => {
            cursor.keyword("from")?;
            let table = cursor.word("table name")?;
            let predicate = if cursor.is_done() {
                Predicate::all()
            } else {
                cursor.keyword("where")?;
                cursor.conditions()?
            };
            Statement::Select { table, predicate }
        }
        "update" => {
            let table = cursor.word("table name")?;
            cursor.keyword("set")?;
            let assignments = cursor.assignments()?;
            cursor.keyword("where")?;
            let predicate = cursor.conditions()?;
            Statement::Update {
                table,
                assignments,
                predicate,
            }
        }
        "delete" => {
            cursor.keyword("from")?;
            let table = cursor.word("table name")?;
            cursor.keyword("where")?;
            let predicate = cursor.conditions()?;
            Statement::Delete { table, predicate }
        }
        "info" => Statement::Info {
            table: cursor.word("table name")?,
        },
        "help" => Statement::Help,
        "exit" => Statement::Exit,
        _ => return Err(ParseError::UnknownCommand(command)),
    };

    cursor.finish()?;
    Ok(statement)
}

struct Cursor {
    tokens: std::vec::IntoIter<Token>,
    peeked: Option<Token>,
}

impl Cursor {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            peeked: None,
        }
    }

    fn next(&mut self) -> Option<Token> {
        self.peeked.take().or_else(|| self.tokens.next())
    }

    fn peek(&mut self) -> Option<&Token> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next();
        }
        self.peeked.as_ref()
    }

    fn is_done(&mut self) -> bool {
        self.peek().is_none()
    }

    fn finish(&mut self) -> ParseResult<()> {
        match self.next() {
            None => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken {
                expected: "end of command",
                found: token.text(),
            }),
        }
    }

    fn word(&mut self, expected: &'static str) -> ParseResult<String> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w),
            Some(other) => Err(ParseError::UnexpectedToken {
                expected,
                found: other.text(),
            }),
            None => Err(ParseError::UnexpectedEnd(expected)),
        }
    }

    fn keyword(&mut self, keyword: &'static str) -> ParseResult<()> {
        match self.next() {
            Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword) => Ok(()),
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: keyword,
                found: other.text(),
            }),
            None => Err(ParseError::UnexpectedEnd(keyword)),
        }
    }

    fn symbol(&mut self, symbol: char, expected: &'static str) -> ParseResult<()> {
        match self.next() {
            Some(Token::Symbol(c)) if c == symbol => Ok(()),
            Some(other) => Err(ParseError::UnexpectedToken {
                expected,
                found: other.text(),
            }),
            None => Err(ParseError::UnexpectedEnd(expected)),
        }
    }

    fn value(&mut self) -> ParseResult<Value> {
        match self.next() {
            Some(Token::Quoted(q)) => Ok(Value::Str(q)),
            Some(Token::Word(w)) => Ok(parse_literal(&w)),
            Some(other) => Err(ParseError::UnexpectedToken {
                expected: "value",
                found: other.text(),
            }),
            None => Err(ParseError::UnexpectedEnd("value")),
        }
    }

    /// `( v, v, ... )`, possibly empty
    fn value_list(&mut self) -> ParseResult<Vec<Value>> {
        self.symbol('(', "'('")?;
        let mut values = Vec::new();
        if matches!(self.peek(), Some(Token::Symbol(')'))) {
            self.next();
            return Ok(values);
        }
        loop {
            values.push(self.value()?);
            match self.next() {
                Some(Token::Symbol(',')) => continue,
                Some(Token::Symbol(')')) => return Ok(values),
                Some(other) => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "',' or ')'",
                        found: other.text(),
                    })
                }
                None => return Err(ParseError::UnexpectedEnd("')'")),
            }
        }
    }

    /// `col = v`
    fn pair(&mut self) -> ParseResult<(String, Value)> {
        let column = self.word("column name")?;
        self.symbol('=', "'='")?;
        let value = self.value()?;
        Ok((column, value))
    }

    /// `col = v [and col = v ...]`
    fn conditions(&mut self) -> ParseResult<Predicate> {
        let mut pairs = vec![self.pair()?];
        while matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case("and")) {
            self.next();
            pairs.push(self.pair()?);
        }
        check_unique(&pairs)?;
        Ok(pairs.into_iter().collect())
    }

    /// `col = v [, col = v ...]`
    fn assignments(&mut self) -> ParseResult<Assignments> {
        let mut pairs = vec![self.pair()?];
        while matches!(self.peek(), Some(Token::Symbol(','))) {
            self.next();
            pairs.push(self.pair()?);
        }
        check_unique(&pairs)?;
        Ok(pairs.into_iter().collect())
    }
}

fn check_unique(pairs: &[(String, Value)]) -> ParseResult<()> {
    for (i, (column, _)) in pairs.iter().enumerate() {
        if pairs[..i].iter().any(|(seen, _)| seen == column) {
            return Err(ParseError::DuplicateColumn(column.clone()));
        }
    }
    Ok(())
}

use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;

/// Errors returned by the loading entry points.
///
/// A failed load never yields a partially filled mapping.
#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("invalid UTF-8 input at line {line}: {source}")]
    InvalidEncoding {
        /// Physical line on which the offending logical line starts (1-based).
        line: u32,
        source: std::str::Utf8Error,
    },
}

/// A malformed escape sequence inside a logical line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("parse error at line {line}, column {column}: {kind}")]
pub struct ParseError {
    /// Physical line on which the offending logical line starts (1-based).
    pub line: u32,
    /// Character column of the escape within the logical line (1-based).
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("malformed \\uXXXX escape")]
    MalformedUnicodeEscape,
    #[error("unpaired UTF-16 surrogate in \\uXXXX escape")]
    UnpairedSurrogate,
}

/// A stored value that does not convert to the requested type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value for key `{key}`: {kind}")]
pub struct ValueError {
    pub key: String,
    pub kind: ValueErrorKind,
}

impl ValueError {
    pub(crate) fn new(key: &str, kind: ValueErrorKind) -> Self {
        Self {
            key: key.to_owned(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueErrorKind {
    #[error("expected `true` or `false`")]
    InvalidBool,
    #[error("invalid integer: {0}")]
    InvalidInt(#[from] ParseIntError),
    #[error("invalid float: {0}")]
    InvalidFloat(#[from] ParseFloatError),
}

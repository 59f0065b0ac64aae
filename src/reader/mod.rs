//! Convert source text into `Value` syntax trees
use std::error::Error;
use std::fmt;

mod chars;
mod datum;


pub use self::chars::{Chars, StreamError};
pub use self::datum::Reader;

use crate::config::Config;
use crate::vm::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReaderError {
    BadToken(String),
    UnterminatedString,
    BadEscapeSequence(char),
    UnterminatedList,
    BadDotPair,
    UnexpectedToken(char),
    NestingTooDeep(usize),
    Stream(StreamError),
}

impl fmt::Display for ReaderError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use self::ReaderError::*;

        match *self {
            BadToken(ref token) => write!(fmt, "bad token: {}", token),
            UnterminatedString => fmt.write_str("unterminated string literal"),
            BadEscapeSequence(c) => write!(fmt, "unknown escape sequence: \\{}", c),
            UnterminatedList => fmt.write_str("unterminated list"),
            BadDotPair => fmt.write_str("a dot must have exactly one datum on each side"),
            UnexpectedToken(c) => write!(fmt, "unexpected {}", c),
            NestingTooDeep(max) => write!(fmt, "lists nested more than {} deep", max),
            Stream(ref e) => write!(fmt, "{}", e),
        }
    }
}

impl Error for ReaderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            ReaderError::Stream(ref e) => Some(e),
            _ => None,
        }
    }
}

impl From<StreamError> for ReaderError {
    fn from(e: StreamError) -> ReaderError {
        ReaderError::Stream(e)
    }
}

/// Reads every form in `text`, case-sensitively
pub fn parse(text: &str) -> Result<Vec<Value>, ReaderError> {
    parse_with(text, &Config::default())
}

/// Reads every form in `text`; either all of them or the first error.
/// Lists may nest at most `config.max_depth` deep.
pub fn parse_with(text: &str, config: &Config) -> Result<Vec<Value>, ReaderError> {
    let mut reader = Reader::new(Chars::from_str(text), config);
    let mut forms = vec![];

    while let Some(form) = reader.next_datum()? {
        debug!("read: {}", form);
        forms.push(form);
    }

    Ok(forms)
}

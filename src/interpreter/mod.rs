use std::error::Error;
use std::fmt;

use crate::reader::{parse_with, ReaderError};
use crate::vm::{ExecutionError, Interpreter, Value};

#[derive(Debug, PartialEq)]
pub enum InterpreterError {
    Reader(ReaderError),
    Exec(ExecutionError),
}

impl fmt::Display for InterpreterError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            InterpreterError::Reader(ref e) => write!(fmt, "parse error: {}", e),
            InterpreterError::Exec(ref e) => write!(fmt, "runtime error: {}", e),
        }
    }
}

impl Error for InterpreterError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            InterpreterError::Reader(ref e) => Some(e),
            InterpreterError::Exec(ref e) => Some(e),
        }
    }
}

impl From<ReaderError> for InterpreterError {
    fn from(e: ReaderError) -> InterpreterError {
        InterpreterError::Reader(e)
    }
}

impl From<ExecutionError> for InterpreterError {
    fn from(e: ExecutionError) -> InterpreterError {
        InterpreterError::Exec(e)
    }
}

/// Reads all of `code`, then evaluates it form by form in `interpreter`'s root frame.
/// Nothing is evaluated if the code doesn't parse.
pub fn interpret(
    code: &str,
    interpreter: &Interpreter,
) -> Result<Vec<Option<Value>>, InterpreterError> {
    let forms = parse_with(code, interpreter.config())?;
    Ok(interpreter.run(&forms)?)
}

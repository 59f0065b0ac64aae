use std::error::Error;
use std::fmt;

/// A character source with a single character of put-back
#[derive(Debug)]
pub struct Chars {
    vec: Vec<char>,
    index: usize,
    // true right after a read, false after a put-back
    can_put_back: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamError {
    EndOfInput,
    NoCharacterToPutBack,
}

impl fmt::Display for StreamError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            StreamError::EndOfInput => fmt.write_str("reading after end of input"),
            StreamError::NoCharacterToPutBack => fmt.write_str("no character to put back"),
        }
    }
}

impl Error for StreamError {}

impl Chars {
    pub fn from_vec(v: Vec<char>) -> Chars {
        Chars {
            vec: v,
            index: 0,
            can_put_back: false,
        }
    }

    pub fn from_str(s: &str) -> Chars {
        Chars::from_vec(s.chars().collect())
    }

    pub fn read_ch(&mut self) -> Result<char, StreamError> {
        match self.vec.get(self.index).cloned() {
            Some(c) => {
                self.index += 1;
                self.can_put_back = true;
                Ok(c)
            }
            None => {
                self.can_put_back = false;
                Err(StreamError::EndOfInput)
            }
        }
    }

    pub fn put_back(&mut self) -> Result<(), StreamError> {
        if !self.can_put_back {
            return Err(StreamError::NoCharacterToPutBack);
        }
        self.index -= 1;
        self.can_put_back = false;
        Ok(())
    }
}

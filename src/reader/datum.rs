use super::chars::{Chars, StreamError};
use super::ReaderError;
use crate::config::Config;
use crate::vm::Value;

// What a single read can produce. `Close` and `Dot` only make sense
// inside a list, it's up to the caller to reject them elsewhere.
#[derive(Debug, PartialEq)]
enum Token {
    Datum(Value),
    Close,
    Dot,
}

/// Pulls forms out of a character stream, one at a time
#[derive(Debug)]
pub struct Reader {
    chars: Chars,
    fold_case: bool,
    // open lists around the current position
    depth: usize,
    max_depth: usize,
}

impl Reader {
    pub fn new(chars: Chars, config: &Config) -> Reader {
        Reader {
            chars,
            fold_case: config.fold_case,
            depth: 0,
            max_depth: config.max_depth,
        }
    }

    /// The next top-level form, `None` once only whitespace and comments remain
    pub fn next_datum(&mut self) -> Result<Option<Value>, ReaderError> {
        match self.next_token()? {
            None => Ok(None),
            Some(Token::Datum(datum)) => ok_some!(datum),
            Some(Token::Close) => Err(ReaderError::UnexpectedToken(')')),
            Some(Token::Dot) => Err(ReaderError::BadToken(".".to_owned())),
        }
    }

    // End of input becomes `None`
    fn read(&mut self) -> Result<Option<char>, ReaderError> {
        match self.chars.read_ch() {
            Ok(c) => Ok(Some(c)),
            Err(StreamError::EndOfInput) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn next_token(&mut self) -> Result<Option<Token>, ReaderError> {
        let c = loop {
            match self.read()? {
                None => return Ok(None),
                Some(';') => self.skip_comment()?,
                Some(c) if c.is_whitespace() => {}
                Some(c) => break c,
            }
        };

        let token = match c {
            '"' => Token::Datum(Value::String(self.read_string()?)),
            '(' => Token::Datum(self.read_nested_list()?),
            ')' => Token::Close,
            '#' => Token::Datum(self.read_boolean()?),
            c if is_atom_char(c) => self.read_atom(c)?,
            c => return Err(ReaderError::BadToken(c.to_string())),
        };
        Ok(Some(token))
    }

    fn skip_comment(&mut self) -> Result<(), ReaderError> {
        loop {
            match self.read()? {
                None | Some('\n') => return Ok(()),
                _ => {}
            }
        }
    }

    // Starts right after the opening quote
    fn read_string(&mut self) -> Result<String, ReaderError> {
        let mut string_buf = String::new();

        loop {
            match self.read()?.ok_or(ReaderError::UnterminatedString)? {
                '"' => return Ok(string_buf),
                '\\' => match self.read()?.ok_or(ReaderError::UnterminatedString)? {
                    c @ '\\' | c @ '"' => string_buf.push(c),
                    c => return Err(ReaderError::BadEscapeSequence(c)),
                },
                c => string_buf.push(c),
            }
        }
    }

    fn read_nested_list(&mut self) -> Result<Value, ReaderError> {
        if self.depth >= self.max_depth {
            return Err(ReaderError::NestingTooDeep(self.max_depth));
        }
        self.depth += 1;
        let list = self.read_list();
        self.depth -= 1;
        list
    }

    // Starts right after the opening paren
    fn read_list(&mut self) -> Result<Value, ReaderError> {
        let mut datums = vec![];

        loop {
            match self.next_token()?.ok_or(ReaderError::UnterminatedList)? {
                Token::Close => return Ok(Value::list(datums)),
                Token::Dot if datums.is_empty() => return Err(ReaderError::BadDotPair),
                Token::Dot => {
                    let tail = match self.next_token()?.ok_or(ReaderError::UnterminatedList)? {
                        Token::Datum(tail) => tail,
                        Token::Close | Token::Dot => return Err(ReaderError::BadDotPair),
                    };
                    return match self.next_token()?.ok_or(ReaderError::UnterminatedList)? {
                        Token::Close => Ok(Value::improper_list(datums, tail)),
                        _ => Err(ReaderError::BadDotPair),
                    };
                }
                Token::Datum(datum) => datums.push(datum),
            }
        }
    }

    // Reads atom characters, leaving the first non-atom one in the stream
    fn read_rest_of_atom(&mut self, first: char) -> Result<String, ReaderError> {
        let mut atom = first.to_string();

        while let Some(c) = self.read()? {
            if is_atom_char(c) {
                atom.push(c);
            } else {
                self.chars.put_back()?;
                break;
            }
        }

        Ok(atom)
    }

    fn read_atom(&mut self, first: char) -> Result<Token, ReaderError> {
        let atom = self.read_rest_of_atom(first)?;

        if atom == "." {
            Ok(Token::Dot)
        } else if is_integer_literal(&atom) {
            match atom.parse() {
                Ok(n) => Ok(Token::Datum(Value::Number(n))),
                // too many digits for an i64
                Err(_) => Err(ReaderError::BadToken(atom)),
            }
        } else if is_identifier(&atom) {
            let name = if self.fold_case {
                atom.to_lowercase()
            } else {
                atom
            };
            Ok(Token::Datum(Value::Identifier(name)))
        } else {
            Err(ReaderError::BadToken(atom))
        }
    }

    // Starts right after the '#'
    fn read_boolean(&mut self) -> Result<Value, ReaderError> {
        let rest = match self.read()? {
            Some(c) if is_atom_char(c) => self.read_rest_of_atom(c)?,
            _ => String::new(),
        };

        match &rest[..] {
            "t" | "T" => Ok(Value::Boolean(true)),
            "f" | "F" => Ok(Value::Boolean(false)),
            _ => Err(ReaderError::BadToken(format!("#{}", rest))),
        }
    }
}

#[inline]
fn is_atom_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_special_atom_char(c)
}

#[inline]
fn is_special_atom_char(c: char) -> bool {
    match c {
        '!' | '$' | '%' | '&' | '*' | '+' | '-' | '.' | '/' | ':' | '<' | '=' | '>' | '?'
        | '@' | '^' | '_' | '~' => true,
        _ => false,
    }
}

#[inline]
fn is_sign(c: char) -> bool {
    c == '+' || c == '-'
}

fn is_integer_literal(atom: &str) -> bool {
    let digits = atom.strip_prefix(is_sign).unwrap_or(atom);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// Assumes `atom` is made of atom characters only
fn is_identifier(atom: &str) -> bool {
    match atom.chars().next() {
        _ if atom == "+" || atom == "-" => true,
        Some(c) => !(c.is_ascii_digit() || is_sign(c) || c == '.'),
        None => false,
    }
}

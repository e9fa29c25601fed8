use crate::symbols::Kind;
use crate::token::TokenKind;

use itertools::Itertools;

use std::convert;
use std::fmt;
use std::io;

#[derive(Debug)]
pub enum Error {
    Io(io::Error),
    NoInput,
    InputTooLong {
        limit: usize,
    },
    InvalidCharacter {
        line: usize,
        character: char,
    },
    UnexpectedToken {
        line: usize,
        expected: Vec<TokenKind>,
        found: String,
    },
    UnterminatedBlock {
        line: usize,
    },
    NestingTooDeep {
        line: usize,
        limit: usize,
    },
    UndefinedVariable {
        line: usize,
        name: String,
    },
    InvalidInput {
        line: usize,
        name: String,
        kind: Kind,
        input: String,
    },
    MissingInput {
        line: usize,
        name: String,
    },
}

impl convert::From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Io(ref e) => write!(f, "error: {}", e),
            Error::NoInput => write!(f, "error: no input provided"),
            Error::InputTooLong { limit } => {
                write!(f, "error: input too long (limit is {} bytes)", limit)
            }
            Error::InvalidCharacter { line, character } => {
                write!(f, "{}: error: invalid character '{}'", line, character)
            }
            Error::UnexpectedToken {
                line,
                ref expected,
                ref found,
            } => write!(
                f,
                "{}: error: expected {}, found {}",
                line,
                expected.iter().join(" or "),
                found
            ),
            Error::UnterminatedBlock { line } => {
                write!(f, "{}: error: block is never closed", line)
            }
            Error::NestingTooDeep { line, limit } => write!(
                f,
                "{}: error: blocks and parentheses nested deeper than {} levels",
                line, limit
            ),
            Error::UndefinedVariable { line, ref name } => {
                write!(f, "{}: error: undefined variable {}", line, name)
            }
            Error::InvalidInput {
                line,
                ref name,
                kind,
                ref input,
            } => write!(
                f,
                "{}: error: invalid {} input '{}' for variable {}",
                line, kind, input, name
            ),
            Error::MissingInput { line, ref name } => {
                write!(f, "{}: error: no input left for variable {}", line, name)
            }
        }
    }
}

mod cursor;
mod error;
mod expression;
mod format;
mod input;
mod interpreter;
mod lexer;
mod source;
mod symbols;
mod token;

use tracing::debug;

use std::io::{BufRead, Write};

pub use error::Error;
pub use interpreter::Interpreter;
pub use lexer::tokenize;
pub use source::{acquire, MAX_PROGRAM_SIZE};
pub use symbols::{Kind, SymbolTable, Value};
pub use token::{Token, TokenKind};

/// Tokenizes and runs `source`.
///
/// `read` statements take their values from `input`, `write` statements print to
/// `output`, and warnings are written to `err_output`. Output produced before an
/// error stays in `output`.
pub fn execute<R, W, E>(source: &str, input: R, output: W, err_output: E) -> Result<(), Error>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    let tokens = tokenize(source)?;
    debug!(tokens = tokens.len(), "tokenized program");
    Interpreter::new(tokens, input, output, err_output).run()
}

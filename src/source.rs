use crate::error::Error;

use tracing::debug;

use std::io::BufRead;

/// Default allowance for program text read from the console, in bytes.
pub const MAX_PROGRAM_SIZE: usize = 10_000;

const PROGRAM_END: &str = "stop;";

/// Reads program text line by line until a line ends the buffer with `stop;`
/// (trailing whitespace allowed) or the reader is exhausted.
///
/// Lines after the terminating one stay in `reader`, so they can feed `read`
/// statements. The buffer must stay below `limit` bytes.
pub fn acquire<R: BufRead>(reader: &mut R, limit: usize) -> Result<String, Error> {
    let mut program = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if program.len() + line.len() >= limit {
            return Err(Error::InputTooLong { limit });
        }
        program.push_str(&line);
        if is_complete(&program) {
            break;
        }
    }

    if program.is_empty() {
        return Err(Error::NoInput);
    }
    debug!(bytes = program.len(), "acquired program text");
    Ok(program)
}

fn is_complete(program: &str) -> bool {
    program.trim_end().ends_with(PROGRAM_END)
}

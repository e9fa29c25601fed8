use std::collections::VecDeque;
use std::io::{self, BufRead};

/// Whitespace separated words read lazily, line by line, from `reader`.
#[derive(Debug)]
pub struct Words<R> {
    reader: R,
    pending: VecDeque<String>,
}

impl<R: BufRead> Words<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// Returns the next word, blocking until a line containing one is available.
    /// `None` means the reader is exhausted.
    pub fn next_word(&mut self) -> io::Result<Option<String>> {
        loop {
            if let Some(word) = self.pending.pop_front() {
                return Ok(Some(word));
            }
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(line.split_whitespace().map(String::from));
        }
    }
}

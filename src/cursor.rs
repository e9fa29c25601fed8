use crate::error::Error;
use crate::token::{Token, TokenKind};

use tracing::trace;

use std::collections::HashMap;

/// Maximum number of blocks and parentheses open at the same time.
pub const MAX_NESTING: usize = 128;

/// Token range of a `{ ... }` block.
///
/// `start` is the position of the first token inside the block, `end` the position
/// of the matching `}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block {
    pub start: usize,
    pub end: usize,
}

/// Position into an immutable token sequence.
///
/// The cursor never moves past the trailing `TokenKind::Eof` token. Block ranges
/// are resolved once per opening brace and cached for the rest of the run.
///
/// The cursor also counts the blocks and parentheses currently being evaluated, so
/// that deeply nested programs fail with an error instead of exhausting the stack.
#[derive(Debug)]
pub struct Cursor {
    tokens: Vec<Token>,
    position: usize,
    blocks: HashMap<usize, Block>,
    depth: usize,
}

impl Cursor {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::eof(line));
        }
        Self {
            tokens,
            position: 0,
            blocks: HashMap::new(),
            depth: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn seek(&mut self, position: usize) {
        self.position = position.min(self.tokens.len() - 1);
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.position]
    }

    pub fn advance(&mut self) -> &Token {
        let current = self.position;
        if current + 1 < self.tokens.len() {
            self.position += 1;
        }
        &self.tokens[current]
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<&Token, Error> {
        if self.peek().kind != kind {
            return Err(self.unexpected(&[kind]));
        }
        Ok(self.advance())
    }

    /// Error for the current token, which is none of `expected`.
    pub fn unexpected(&self, expected: &[TokenKind]) -> Error {
        let token = self.peek();
        Error::UnexpectedToken {
            line: token.line,
            expected: expected.to_vec(),
            found: token.describe(),
        }
    }

    /// Opens one nesting level at the current token. Must be paired with `leave`.
    pub fn enter(&mut self) -> Result<(), Error> {
        if self.depth >= MAX_NESTING {
            return Err(Error::NestingTooDeep {
                line: self.peek().line,
                limit: MAX_NESTING,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Consumes `{` and resolves the block it opens. The cursor is left on the first
    /// token inside the block.
    pub fn block(&mut self) -> Result<Block, Error> {
        let open = self.position;
        self.expect(TokenKind::LBrace)?;
        if let Some(block) = self.blocks.get(&open) {
            return Ok(*block);
        }

        let mut depth = 0;
        for (position, token) in self.tokens.iter().enumerate().skip(open + 1) {
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace if depth == 0 => {
                    let block = Block {
                        start: open + 1,
                        end: position,
                    };
                    trace!(open = open, end = position, "resolved block");
                    self.blocks.insert(open, block);
                    return Ok(block);
                }
                TokenKind::RBrace => depth -= 1,
                _ => (),
            }
        }
        Err(Error::UnterminatedBlock {
            line: self.tokens[open].line,
        })
    }

    /// Moves the cursor just past the closing brace of `block`.
    pub fn skip(&mut self, block: Block) {
        self.seek(block.end + 1);
    }
}

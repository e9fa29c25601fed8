//! Arithmetic expressions and conditions, evaluated while they are parsed.
//!
//! ```text
//! factor     := NUMBER | IDENT | '(' expression ')'
//! term       := factor ( ('*'|'/') factor )*
//! expression := term ( ('+'|'-') term )*
//! condition  := expression ('<'|'>'|'=='|'<=') expression
//! ```

use crate::cursor::Cursor;
use crate::error::Error;
use crate::symbols::SymbolTable;
use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    LessThan,
    GreaterThan,
    EqualTo,
    LessThanOrEqualTo,
}

impl Relation {
    pub const TOKENS: [TokenKind; 4] = [
        TokenKind::Lt,
        TokenKind::Gt,
        TokenKind::Eq,
        TokenKind::Le,
    ];

    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Lt => Some(Relation::LessThan),
            TokenKind::Gt => Some(Relation::GreaterThan),
            TokenKind::Eq => Some(Relation::EqualTo),
            TokenKind::Le => Some(Relation::LessThanOrEqualTo),
            _ => None,
        }
    }

    pub fn holds(self, left: f64, right: f64) -> bool {
        match self {
            Relation::LessThan => left < right,
            Relation::GreaterThan => left > right,
            Relation::EqualTo => left == right,
            Relation::LessThanOrEqualTo => left <= right,
        }
    }
}

pub fn factor(cursor: &mut Cursor, symbols: &SymbolTable) -> Result<f64, Error> {
    let kind = cursor.peek().kind;
    match kind {
        TokenKind::Number => Ok(cursor.advance().value.unwrap_or_default()),
        TokenKind::Ident => {
            let token = cursor.advance();
            symbols
                .lookup(&token.lexeme)
                .map(|id| symbols.get(id).as_f64())
                .ok_or_else(|| Error::UndefinedVariable {
                    line: token.line,
                    name: token.lexeme.clone(),
                })
        }
        TokenKind::LParen => {
            cursor.enter()?;
            cursor.advance();
            let value = expression(cursor, symbols)?;
            cursor.expect(TokenKind::RParen)?;
            cursor.leave();
            Ok(value)
        }
        _ => Err(cursor.unexpected(&[
            TokenKind::Number,
            TokenKind::Ident,
            TokenKind::LParen,
        ])),
    }
}

pub fn term(cursor: &mut Cursor, symbols: &SymbolTable) -> Result<f64, Error> {
    let mut value = factor(cursor, symbols)?;
    loop {
        let kind = cursor.peek().kind;
        match kind {
            TokenKind::Star => {
                cursor.advance();
                value *= factor(cursor, symbols)?;
            }
            TokenKind::Slash => {
                cursor.advance();
                value /= factor(cursor, symbols)?;
            }
            _ => return Ok(value),
        }
    }
}

pub fn expression(cursor: &mut Cursor, symbols: &SymbolTable) -> Result<f64, Error> {
    let mut value = term(cursor, symbols)?;
    loop {
        let kind = cursor.peek().kind;
        match kind {
            TokenKind::Plus => {
                cursor.advance();
                value += term(cursor, symbols)?;
            }
            TokenKind::Minus => {
                cursor.advance();
                value -= term(cursor, symbols)?;
            }
            _ => return Ok(value),
        }
    }
}

/// Evaluates exactly one comparison between two expressions.
pub fn condition(cursor: &mut Cursor, symbols: &SymbolTable) -> Result<bool, Error> {
    let left = expression(cursor, symbols)?;
    let relation = Relation::from_token(cursor.peek().kind)
        .ok_or_else(|| cursor.unexpected(&Relation::TOKENS))?;
    cursor.advance();
    let right = expression(cursor, symbols)?;
    Ok(relation.holds(left, right))
}

use crate::error::Error;
use crate::token::{Token, TokenKind};

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1, take_while_m_n},
    combinator::{map, recognize},
    error::{ErrorKind, ParseError},
    sequence::pair,
    IResult,
};

// Each rule taking characters one by one has a predicate, which is used with the
// `take_while` family of combinators.

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
}

fn is_letter_or_digit(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_number_character(c: char) -> bool {
    c.is_ascii_digit() || c == '.'
}

fn space<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while(is_space)(i)
}

fn word<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, (TokenKind, &'a str), E> {
    map(
        recognize(pair(
            take_while_m_n(1, 1, is_letter),
            take_while(is_letter_or_digit),
        )),
        |lexeme: &'a str| (TokenKind::keyword(lexeme).unwrap_or(TokenKind::Ident), lexeme),
    )(i)
}

fn number<'a, E: ParseError<&'a str>>(i: &'a str) -> IResult<&'a str, (TokenKind, &'a str), E> {
    map(take_while1(is_number_character), |lexeme: &'a str| {
        (TokenKind::Number, lexeme)
    })(i)
}

fn operator<'a, E: ParseError<&'a str>>(
    lexeme: &'static str,
    kind: TokenKind,
) -> impl Fn(&'a str) -> IResult<&'a str, (TokenKind, &'a str), E> {
    map(tag(lexeme), move |matched: &'a str| (kind, matched))
}

fn punctuation<'a, E: ParseError<&'a str>>(
    i: &'a str,
) -> IResult<&'a str, (TokenKind, &'a str), E> {
    // Note: two character operators share their first character with single character
    // ones, therefore they need to be tried first.
    alt((
        operator("==", TokenKind::Eq),
        operator("<=", TokenKind::Le),
        operator("=", TokenKind::Assign),
        operator("<", TokenKind::Lt),
        operator(">", TokenKind::Gt),
        operator("+", TokenKind::Plus),
        operator("-", TokenKind::Minus),
        operator("*", TokenKind::Star),
        operator("/", TokenKind::Slash),
        operator(";", TokenKind::Semicolon),
        operator("(", TokenKind::LParen),
        operator(")", TokenKind::RParen),
        operator("{", TokenKind::LBrace),
        operator("}", TokenKind::RBrace),
    ))(i)
}

fn next_token<'a, E: ParseError<&'a str>>(
    i: &'a str,
) -> IResult<&'a str, (TokenKind, &'a str), E> {
    alt((word, number, punctuation))(i)
}

/// Splits program text into tokens.
///
/// The returned sequence always ends with exactly one `TokenKind::Eof` token. The
/// first character which does not start a token aborts lexing.
pub fn tokenize(source: &str) -> Result<Vec<Token>, Error> {
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut rest = source;
    loop {
        let (after_space, skipped) = space::<(&str, ErrorKind)>(rest).unwrap_or((rest, ""));
        line += skipped.matches('\n').count();
        rest = after_space;

        let character = match rest.chars().next() {
            Some(c) => c,
            None => break,
        };
        match next_token::<(&str, ErrorKind)>(rest) {
            Ok((remaining, (kind, lexeme))) => {
                tokens.push(Token::new(kind, lexeme, line));
                rest = remaining;
            }
            Err(_) => return Err(Error::InvalidCharacter { line, character }),
        }
    }
    tokens.push(Token::eof(line));
    Ok(tokens)
}

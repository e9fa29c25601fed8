use std::fmt;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum TokenKind {
    Start,
    Stop,
    Int,
    Float,
    Read,
    Write,
    If,
    Else,
    While,
    Ident,
    Number,
    Plus,
    Minus,
    Star,
    Slash,
    Assign,
    Eq,
    Lt,
    Gt,
    Le,
    LParen,
    RParen,
    LBrace,
    RBrace,
    Semicolon,
    Eof,
}

impl TokenKind {
    pub fn keyword(lexeme: &str) -> Option<Self> {
        let kind = match lexeme {
            "start" => TokenKind::Start,
            "stop" => TokenKind::Stop,
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "read" => TokenKind::Read,
            "write" => TokenKind::Write,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            TokenKind::Start => "`start`",
            TokenKind::Stop => "`stop`",
            TokenKind::Int => "`int`",
            TokenKind::Float => "`float`",
            TokenKind::Read => "`read`",
            TokenKind::Write => "`write`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Assign => "`=`",
            TokenKind::Eq => "`==`",
            TokenKind::Lt => "`<`",
            TokenKind::Gt => "`>`",
            TokenKind::Le => "`<=`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// One lexical unit of a program.
///
/// `value` is only present for `TokenKind::Number`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub value: Option<f64>,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: &str, line: usize) -> Self {
        let value = match kind {
            TokenKind::Number => Some(number_value(lexeme)),
            _ => None,
        };
        Self {
            kind,
            lexeme: lexeme.into(),
            value,
            line,
        }
    }

    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::Eof, "", line)
    }

    /// Describes the token the way it appears in diagnostics.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Eof => TokenKind::Eof.to_string(),
            _ => format!("`{}`", self.lexeme),
        }
    }
}

/// Parses a run of digits and full stops into a number.
///
/// Everything from a second full stop on is ignored, and a lexeme without digits
/// yields zero, so `1.2.3` is `1.2` and `.` is `0`.
pub fn number_value(lexeme: &str) -> f64 {
    let end = lexeme
        .match_indices('.')
        .nth(1)
        .map(|(pos, _)| pos)
        .unwrap_or_else(|| lexeme.len());
    lexeme[..end].parse().unwrap_or(0.0)
}

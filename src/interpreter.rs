use crate::cursor::{Block, Cursor};
use crate::error::Error;
use crate::expression::{condition, expression};
use crate::format::format_value;
use crate::input::Words;
use crate::symbols::{Kind, SymbolTable, VarId};
use crate::token::{Token, TokenKind};

use tracing::{debug, trace};

use std::collections::{HashMap, HashSet};
use std::io::{BufRead, Write};

const STATEMENT_START: [TokenKind; 7] = [
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Read,
    TokenKind::Write,
    TokenKind::Ident,
    TokenKind::If,
    TokenKind::While,
];

/// Executes a token sequence while parsing it.
///
/// There is no syntax tree: every statement is executed as soon as it is parsed,
/// and `if`/`while` move the cursor over the token sequence to skip or repeat
/// blocks. Values for `read` come from `input`, `write` prints to `output`, and
/// warnings go to `err_output`.
pub struct Interpreter<R, W, E> {
    cursor: Cursor,
    symbols: SymbolTable,
    input: Words<R>,
    output: W,
    err_output: E,
    // token position of the declaration each name resolves to
    declared_at: HashMap<String, usize>,
    // declaration sites already reported as duplicates
    warned_declarations: HashSet<usize>,
}

impl<R, W, E> Interpreter<R, W, E>
where
    R: BufRead,
    W: Write,
    E: Write,
{
    pub fn new(tokens: Vec<Token>, input: R, output: W, err_output: E) -> Self {
        Self {
            cursor: Cursor::new(tokens),
            symbols: SymbolTable::new(),
            input: Words::new(input),
            output,
            err_output,
            declared_at: HashMap::new(),
            warned_declarations: HashSet::new(),
        }
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Runs `start` statement* `stop`.
    ///
    /// An optional `;` after `stop` is consumed; everything after it is ignored.
    pub fn run(&mut self) -> Result<(), Error> {
        self.cursor.expect(TokenKind::Start)?;
        loop {
            let kind = self.cursor.peek().kind;
            match kind {
                TokenKind::Stop => break,
                TokenKind::Eof => return Err(self.cursor.unexpected(&[TokenKind::Stop])),
                _ => self.statement()?,
            }
        }
        self.cursor.advance();
        if self.cursor.peek().kind == TokenKind::Semicolon {
            self.cursor.advance();
        }

        let trailing = self.cursor.peek();
        if trailing.kind != TokenKind::Eof {
            writeln!(
                self.err_output,
                "{}: warning: ignoring {} and everything after it",
                trailing.line,
                trailing.describe()
            )?;
        }
        self.output.flush()?;
        Ok(())
    }

    fn statement(&mut self) -> Result<(), Error> {
        let (kind, line) = {
            let token = self.cursor.peek();
            (token.kind, token.line)
        };
        trace!(line = line, kind = ?kind, "statement");
        match kind {
            TokenKind::Int => self.declaration(Kind::Integer),
            TokenKind::Float => self.declaration(Kind::Float),
            TokenKind::Read => self.read(),
            TokenKind::Write => self.write(),
            TokenKind::Ident => self.assignment(),
            TokenKind::If => self.if_else(),
            TokenKind::While => self.while_loop(),
            _ => Err(self.cursor.unexpected(&STATEMENT_START)),
        }
    }

    fn declaration(&mut self, kind: Kind) -> Result<(), Error> {
        let site = self.cursor.position();
        self.cursor.advance();
        let (name, line) = {
            let token = self.cursor.expect(TokenKind::Ident)?;
            (token.lexeme.clone(), token.line)
        };

        match self.declared_at.get(&name).copied() {
            // Executed again, e.g. in a loop body.
            Some(first) if first == site => (),
            // Lookups resolve to the first declaration, so a second slot would be
            // unreachable.
            Some(_) => {
                if self.warned_declarations.insert(site) {
                    writeln!(
                        self.err_output,
                        "{}: warning: variable {} is already declared, using the first declaration",
                        line, name
                    )?;
                }
            }
            None => {
                self.symbols.declare(&name, kind);
                self.declared_at.insert(name.clone(), site);
                debug!(name = %name, kind = %kind, "declared variable");
            }
        }

        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    /// Consumes an identifier and resolves it to a declared variable.
    fn variable(&mut self) -> Result<(VarId, usize), Error> {
        let token = self.cursor.expect(TokenKind::Ident)?;
        let id = self
            .symbols
            .lookup(&token.lexeme)
            .ok_or_else(|| Error::UndefinedVariable {
                line: token.line,
                name: token.lexeme.clone(),
            })?;
        Ok((id, token.line))
    }

    fn read(&mut self) -> Result<(), Error> {
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen)?;
        let (id, line) = self.variable()?;

        let name = self.symbols.name(id).to_string();
        let kind = self.symbols.kind(id);
        let word = match self.input.next_word()? {
            Some(word) => word,
            None => return Err(Error::MissingInput { line, name }),
        };
        let value = match kind {
            Kind::Integer => word.parse::<i32>().map(f64::from).ok(),
            Kind::Float => word.parse::<f64>().ok(),
        };
        match value {
            Some(value) => self.symbols.assign(id, value),
            None => {
                return Err(Error::InvalidInput {
                    line,
                    name,
                    kind,
                    input: word,
                })
            }
        }

        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    fn write(&mut self) -> Result<(), Error> {
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen)?;
        let (id, _) = self.variable()?;
        writeln!(self.output, "{}", format_value(self.symbols.get(id)))?;
        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    fn assignment(&mut self) -> Result<(), Error> {
        let (id, _) = self.variable()?;
        self.cursor.expect(TokenKind::Assign)?;
        let value = expression(&mut self.cursor, &self.symbols)?;
        self.symbols.assign(id, value);
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    fn parenthesized_condition(&mut self) -> Result<bool, Error> {
        self.cursor.expect(TokenKind::LParen)?;
        let holds = condition(&mut self.cursor, &self.symbols)?;
        self.cursor.expect(TokenKind::RParen)?;
        Ok(holds)
    }

    fn if_else(&mut self) -> Result<(), Error> {
        self.cursor.advance();
        let holds = self.parenthesized_condition()?;
        let then_block = self.cursor.block()?;
        self.branch(then_block, holds)?;

        if self.cursor.peek().kind == TokenKind::Else {
            self.cursor.advance();
            let else_block = self.cursor.block()?;
            self.branch(else_block, !holds)?;
        }
        Ok(())
    }

    fn while_loop(&mut self) -> Result<(), Error> {
        let line = self.cursor.advance().line;
        let condition_start = self.cursor.position();
        let mut holds = self.parenthesized_condition()?;
        let body = self.cursor.block()?;

        let mut iterations: u64 = 0;
        while holds {
            self.run_block(body)?;
            iterations += 1;
            self.cursor.seek(condition_start);
            holds = self.parenthesized_condition()?;
        }
        self.cursor.skip(body);
        debug!(line = line, iterations = iterations, "left while loop");
        Ok(())
    }

    fn branch(&mut self, block: Block, taken: bool) -> Result<(), Error> {
        if taken {
            self.run_block(block)
        } else {
            self.cursor.skip(block);
            Ok(())
        }
    }

    /// Executes the statements of `block` and consumes its closing brace.
    fn run_block(&mut self, block: Block) -> Result<(), Error> {
        self.cursor.seek(block.start);
        self.cursor.enter()?;
        while self.cursor.position() < block.end {
            self.statement()?;
        }
        self.cursor.expect(TokenKind::RBrace)?;
        self.cursor.leave();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;
    use crate::symbols::Value;

    struct Run {
        result: Result<(), Error>,
        output: String,
        err_output: String,
        values: Vec<(String, Value)>,
    }

    fn run_with_input(source: &str, input: &str, names: &[&str]) -> Run {
        let tokens = tokenize(source).expect("failed to tokenize");
        let mut output = Vec::new();
        let mut err_output = Vec::new();
        let (result, values) = {
            let mut interpreter =
                Interpreter::new(tokens, input.as_bytes(), &mut output, &mut err_output);
            let result = interpreter.run();
            let values = names
                .iter()
                .filter_map(|name| {
                    let symbols = interpreter.symbols();
                    symbols
                        .lookup(name)
                        .map(|id| (name.to_string(), symbols.get(id)))
                })
                .collect();
            (result, values)
        };
        Run {
            result,
            output: String::from_utf8(output).unwrap(),
            err_output: String::from_utf8(err_output).unwrap(),
            values,
        }
    }

    fn run(source: &str) -> Run {
        run_with_input(source, "", &[])
    }

    fn value(run: &Run, name: &str) -> Value {
        run.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .expect("variable not found")
    }

    #[test]
    fn test_write_integer() {
        let r = run("start int x; x = 3; write(x); stop;");
        assert!(r.result.is_ok());
        assert_eq!(r.output, "3\n");
    }

    #[test]
    fn test_write_float() {
        let r = run("start float f; f = 7; f = f / 2; write(f); stop;");
        assert!(r.result.is_ok());
        assert_eq!(r.output, "3.500000\n");
    }

    #[test]
    fn test_integer_assignment_truncates() {
        let r = run_with_input("start int x; x = 7 / 2; stop;", "", &["x"]);
        assert!(r.result.is_ok());
        assert_eq!(value(&r, "x"), Value::Integer(3));

        let r = run_with_input("start int x; x = 0 - 7 / 2; stop;", "", &["x"]);
        assert_eq!(value(&r, "x"), Value::Integer(-3));
    }

    #[test]
    fn test_while_loop() {
        let r = run("start int i; i = 0; while (i < 3) { write(i); i = i + 1; } stop;");
        assert!(r.result.is_ok());
        assert_eq!(r.output, "0\n1\n2\n");
    }

    #[test]
    fn test_while_with_false_condition_never_runs_body() {
        let r = run_with_input(
            "start int i; int y; y = 5; while (i > 0) { y = 9; write(y); } write(y); stop;",
            "",
            &["y"],
        );
        assert!(r.result.is_ok());
        assert_eq!(r.output, "5\n");
        assert_eq!(value(&r, "y"), Value::Integer(5));
    }

    #[test]
    fn test_if_else_runs_exactly_one_branch() {
        let r = run("start int x; x = 1; if (x > 1) { int y; write(y); } else { write(x); } stop;");
        assert!(r.result.is_ok());
        assert_eq!(r.output, "1\n");

        let r = run("start int x; x = 2; if (x > 1) { write(x); } else { int y; write(y); } stop;");
        assert!(r.result.is_ok());
        assert_eq!(r.output, "2\n");
    }

    #[test]
    fn test_if_without_else() {
        let r = run("start int x; if (x == 0) { x = 4; } if (x == 0) { x = 5; } write(x); stop;");
        assert!(r.result.is_ok());
        assert_eq!(r.output, "4\n");
    }

    #[test]
    fn test_nested_blocks_are_skipped_as_a_whole() {
        let r = run(
            "start int x; int y;
             if (x > 0) { if (y == 0) { y = 1; } x = 10; }
             write(x); write(y);
             stop;",
        );
        assert!(r.result.is_ok(), "{:?}", r.result.err());
        assert_eq!(r.output, "0\n0\n");
    }

    #[test]
    fn test_nested_loops() {
        let r = run(
            "start int i; int j; int n;
             while (i < 3) {
                 j = 0;
                 while (j < i) { n = n + 1; j = j + 1; }
                 i = i + 1;
             }
             write(n);
             stop;",
        );
        assert!(r.result.is_ok(), "{:?}", r.result.err());
        assert_eq!(r.output, "3\n");
    }

    #[test]
    fn test_read() {
        let r = run_with_input(
            "start int n; float f; read(n); read(f); write(n); write(f); stop;",
            "12\n2.25\n",
            &[],
        );
        assert!(r.result.is_ok());
        assert_eq!(r.output, "12\n2.250000\n");
    }

    #[test]
    fn test_read_invalid_integer() {
        let r = run_with_input("start int n; read(n); stop;", "1.5\n", &[]);
        match r.result {
            Err(Error::InvalidInput { name, kind, input, .. }) => {
                assert_eq!(name, "n");
                assert_eq!(kind, Kind::Integer);
                assert_eq!(input, "1.5");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_read_without_input() {
        let r = run("start float f; read(f); stop;");
        match r.result {
            Err(Error::MissingInput { name, .. }) => assert_eq!(name, "f"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_undefined_variable_stops_execution() {
        let r = run("start int x; write(x); x = y + 1; write(x); stop;");
        match r.result {
            Err(Error::UndefinedVariable { name, .. }) => assert_eq!(name, "y"),
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(r.output, "0\n");
    }

    #[test]
    fn test_duplicate_declaration_keeps_first() {
        let r = run_with_input("start int x; float x; x = 2.5; write(x); stop;", "", &["x"]);
        assert!(r.result.is_ok());
        assert_eq!(r.output, "2\n");
        assert_eq!(
            r.err_output,
            "1: warning: variable x is already declared, using the first declaration\n"
        );
    }

    #[test]
    fn test_declaration_in_loop_is_not_a_duplicate() {
        let r = run("start int i; while (i < 3) { int t; t = t + i; i = i + 1; } write(t); stop;");
        assert!(r.result.is_ok());
        assert_eq!(r.output, "3\n");
        assert_eq!(r.err_output, "");
    }

    #[test]
    fn test_duplicate_declaration_in_loop_warns_once() {
        let r = run(
            "start int i; int t;
             while (i < 3) { float t; i = i + 1; }
             stop;",
        );
        assert!(r.result.is_ok());
        assert_eq!(
            r.err_output,
            "2: warning: variable t is already declared, using the first declaration\n"
        );
    }

    #[test]
    fn test_nested_blocks_within_limit() {
        let depth = crate::cursor::MAX_NESTING;
        let source = format!(
            "start int x; {} x = 1; {} write(x); stop;",
            "if (x == 0) {".repeat(depth),
            "}".repeat(depth)
        );
        let r = run(&source);
        assert!(r.result.is_ok(), "{:?}", r.result.err());
        assert_eq!(r.output, "1\n");
    }

    #[test]
    fn test_nesting_too_deep() {
        let depth = crate::cursor::MAX_NESTING + 1;
        let source = format!(
            "start int x;\n{} x = 1; {} stop;",
            "while (x == 0) {".repeat(depth),
            "}".repeat(depth)
        );
        match run(&source).result {
            Err(Error::NestingTooDeep { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {:?}", other),
        }

        // Parentheses count towards the same limit as blocks.
        let source = format!(
            "start int x; {} x = {}1{}; {} stop;",
            "if (x == 0) {".repeat(100),
            "(".repeat(29),
            ")".repeat(29),
            "}".repeat(100)
        );
        match run(&source).result {
            Err(Error::NestingTooDeep { .. }) => (),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let r = run("start int x\nx = 1; stop;");
        match r.result {
            Err(Error::UnexpectedToken { line, expected, found }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, vec![TokenKind::Semicolon]);
                assert_eq!(found, "`x`");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_missing_stop() {
        let r = run("start int x;");
        match r.result {
            Err(Error::UnexpectedToken { expected, found, .. }) => {
                assert_eq!(expected, vec![TokenKind::Stop]);
                assert_eq!(found, "end of input");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unexpected_statement() {
        let r = run("start ; stop;");
        match r.result {
            Err(Error::UnexpectedToken { expected, .. }) => {
                assert_eq!(expected, STATEMENT_START.to_vec())
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_unterminated_block() {
        let r = run("start int x; if (x == 0) { x = 1; stop;");
        match r.result {
            Err(Error::UnterminatedBlock { line }) => assert_eq!(line, 1),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_input_after_stop_is_ignored() {
        let r = run("start int x; stop; x = 1;");
        assert!(r.result.is_ok());
        assert_eq!(
            r.err_output,
            "1: warning: ignoring `x` and everything after it\n"
        );
    }
}

//! Core parser infrastructure: token cursor, error reporting, helpers.

use tune_lexer::token::{Token, TokenKind};
use tune_types::ast::Expr;
use tune_types::{ErrorCode, SourceFile, Span, SyntaxError, SyntaxErrors};

/// Maximum nesting of sub-expressions before the parser gives up.
pub const MAX_NESTING: u32 = 64;

/// The Tune parser.
///
/// Consumes a token stream produced by the lexer and builds one top-level
/// [`Expr`]. Parsing stops at the first syntax error.
pub struct Parser<'src> {
    /// The token stream.
    tokens: Vec<Token>,
    /// Current index into `tokens`.
    pos: usize,
    /// Source file for error context.
    source_file: &'src SourceFile,
    /// Collected errors.
    errors: SyntaxErrors,
    /// Current sub-expression nesting depth.
    depth: u32,
}

/// Result of parsing.
#[derive(Debug)]
pub struct ParseResult {
    /// `None` when any error was reported.
    pub expr: Option<Expr>,
    pub errors: SyntaxErrors,
}

impl<'src> Parser<'src> {
    /// Create a new parser from a token stream and source file.
    pub fn new(tokens: Vec<Token>, source_file: &'src SourceFile) -> Self {
        Self {
            tokens,
            pos: 0,
            source_file,
            errors: SyntaxErrors::empty(),
            depth: 0,
        }
    }

    // ── Token Cursor ──────────────────────────────────────────────────────────

    /// The kind of the current token. Past the end of the stream this is `Eof`.
    pub(crate) fn peek_kind(&self) -> &TokenKind {
        self.look_ahead(0)
    }

    /// Advance the cursor by one and return the consumed token.
    pub(crate) fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    /// Returns the span of the current token.
    pub(crate) fn current_span(&self) -> Span {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(Span::point(1, 1), |t| t.span)
    }

    pub(crate) fn at_end(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Eof)
    }

    /// Check if the current token matches the given kind exactly.
    pub(crate) fn check_exact(&self, kind: &TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// If the current token matches, advance and return `true`.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check_exact(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Look ahead by `n` tokens from current position.
    pub(crate) fn look_ahead(&self, n: usize) -> &TokenKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| &t.kind)
            .unwrap_or(&TokenKind::Eof)
    }

    // ── Expect Helpers ────────────────────────────────────────────────────────

    /// Expect a specific token kind, or emit an error.
    pub(crate) fn expect(&mut self, expected: &TokenKind) -> Option<()> {
        if self.eat(expected) {
            Some(())
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '{}', got '{}'", expected, self.peek_kind()),
            );
            None
        }
    }

    /// Expect the token that closes a form opened by `opener` at `open_span`.
    ///
    /// Running out of input is reported as an unclosed delimiter pointing back
    /// at the opener; anything else is an unexpected token.
    pub(crate) fn expect_closing(
        &mut self,
        closer: &TokenKind,
        opener: &str,
        open_span: Span,
    ) -> Option<()> {
        if self.eat(closer) {
            return Some(());
        }
        if self.at_end() {
            let message = format!("'{opener}' opened at {open_span} is never closed");
            let error = self
                .build_error(ErrorCode::UNCLOSED_DELIMITER, message, self.current_span())
                .with_suggestion(format!("add '{closer}'"));
            self.errors.push_error(error);
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!(
                    "expected '{closer}' to close '{opener}', got '{}'",
                    self.peek_kind()
                ),
            );
        }
        None
    }

    /// Expect a name token. Keywords are rejected.
    pub(crate) fn expect_identifier(&mut self) -> Option<String> {
        match self.peek_kind().clone() {
            TokenKind::Identifier(name) => {
                self.advance();
                Some(name)
            }
            other => {
                let message = if other.is_keyword() {
                    format!("'{other}' is a keyword and cannot be used as a name")
                } else {
                    format!("expected name, got '{other}'")
                };
                self.error_at_current(ErrorCode::UNEXPECTED_TOKEN, message);
                None
            }
        }
    }

    /// Expect a string literal token. Returns the string value.
    pub(crate) fn expect_string_literal(&mut self) -> Option<String> {
        match self.peek_kind().clone() {
            TokenKind::StringLit(s) => {
                self.advance();
                Some(s)
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected file path string, got '{other}'"),
                );
                None
            }
        }
    }

    // ── Nesting ───────────────────────────────────────────────────────────────

    /// Run `parse` one nesting level deeper, reporting
    /// [`ErrorCode::NESTING_TOO_DEEP`] past [`MAX_NESTING`].
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        if self.depth >= MAX_NESTING {
            self.error_at_current(
                ErrorCode::NESTING_TOO_DEEP,
                format!("expressions nest more than {MAX_NESTING} levels deep"),
            );
            return None;
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    // ── Error Reporting ───────────────────────────────────────────────────────

    /// Report an error at the current token position.
    pub(crate) fn error_at_current(&mut self, code: ErrorCode, message: impl Into<String>) {
        let span = self.current_span();
        self.error_at(code, message, span);
    }

    /// Report an error at a specific span.
    pub(crate) fn error_at(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let error = self.build_error(code, message, span);
        self.errors.push_error(error);
    }

    pub(crate) fn push_error(&mut self, error: SyntaxError) {
        self.errors.push_error(error);
    }

    pub(crate) fn build_error(
        &self,
        code: ErrorCode,
        message: impl Into<String>,
        span: Span,
    ) -> SyntaxError {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        SyntaxError::new(&self.source_file.name, code, message, span, source_line)
    }

    // ── Public API ────────────────────────────────────────────────────────────

    /// Parse the whole token stream as one top-level expression.
    pub fn parse(mut self) -> ParseResult {
        let expr = self.parse_program();
        let expr = if self.errors.has_errors() { None } else { expr };
        ParseResult {
            expr,
            errors: self.errors,
        }
    }

    fn parse_program(&mut self) -> Option<Expr> {
        if self.at_end() {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                "expected expression, got end of input",
            );
            return None;
        }
        let expr = self.parse_sequence()?;
        if !self.at_end() {
            let error = self
                .build_error(
                    ErrorCode::TRAILING_INPUT,
                    format!("unexpected '{}' after complete expression", self.peek_kind()),
                    self.current_span(),
                )
                .with_suggestion("separate expressions with ';'");
            self.push_error(error);
            return None;
        }
        Some(expr)
    }
}

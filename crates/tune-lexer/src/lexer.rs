//! Core Tune lexer: converts source text to a token stream.
//!
//! - Newlines are ordinary whitespace; an expression may span lines.
//! - `//` comments run to the end of the line.
//! - A single letter `A`–`G` directly followed by `#` lexes as one sharp
//!   pitch name (`C#`); `#` is not valid anywhere else.
//! - Error recovery: bad characters are reported and skipped, so one pass
//!   reports every lexical error (up to [`tune_types::MAX_ERRORS`]).

use tune_types::{ErrorCode, SourceFile, Span, SyntaxError, SyntaxErrors};

use crate::token::{Token, TokenKind};

pub struct Lexer<'src> {
    source: &'src [u8],
    source_file: &'src SourceFile,
    /// Current byte offset into `source`.
    pos: usize,
    /// 1-based.
    line: u32,
    /// 1-based.
    col: u32,
    errors: SyntaxErrors,
}

/// Result of lexing: tokens + any errors collected.
pub struct LexResult {
    /// Always ends with [`TokenKind::Eof`].
    pub tokens: Vec<Token>,
    pub errors: SyntaxErrors,
}

impl<'src> Lexer<'src> {
    pub fn new(source_file: &'src SourceFile) -> Self {
        Self {
            source: source_file.source.as_bytes(),
            source_file,
            pos: 0,
            line: 1,
            col: 1,
            errors: SyntaxErrors::empty(),
        }
    }

    /// Lex the whole source.
    pub fn lex(mut self) -> LexResult {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        LexResult {
            tokens,
            errors: self.errors,
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Character-level helpers
    // ─────────────────────────────────────────────────────────────

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;
        if ch == b'\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    /// Consume `next` if it is the upcoming byte.
    fn eat(&mut self, next: u8) -> bool {
        if self.peek() == Some(next) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn span_from(&self, start_line: u32, start_col: u32) -> Span {
        Span::new(
            start_line,
            start_col,
            self.line,
            self.col.saturating_sub(1).max(1),
        )
    }

    fn text_from(&self, start: usize) -> &'src str {
        std::str::from_utf8(&self.source[start..self.pos]).unwrap_or("")
    }

    fn emit_error(&mut self, code: ErrorCode, message: impl Into<String>, span: Span) {
        let source_line = self.source_file.line(span.start_line).unwrap_or("");
        let err = SyntaxError::new(&self.source_file.name, code, message, span, source_line);
        self.errors.push_error(err);
    }

    // ─────────────────────────────────────────────────────────────
    // Whitespace & comments
    // ─────────────────────────────────────────────────────────────

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while self.peek().is_some_and(|ch| ch != b'\n') {
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    // ─────────────────────────────────────────────────────────────
    // Scanning
    // ─────────────────────────────────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let (start_line, start_col) = (self.line, self.col);
            let Some(ch) = self.advance() else {
                return Token::new(TokenKind::Eof, Span::point(self.line, self.col));
            };

            let kind = match ch {
                b'0'..=b'9' => self.scan_int(start, start_line, start_col),
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.scan_identifier(start),
                b'"' => self.scan_string(start_line, start_col),

                b';' => TokenKind::Semicolon,
                b',' => TokenKind::Comma,
                b'(' => TokenKind::LParen,
                b')' => TokenKind::RParen,
                b'[' => TokenKind::LBracket,
                b']' => TokenKind::RBracket,
                b'+' => TokenKind::Plus,
                b'-' => TokenKind::Minus,
                b'*' => TokenKind::Star,
                b'/' => TokenKind::Slash,

                b':' if self.eat(b'=') => TokenKind::ColonEq,
                b':' => TokenKind::Colon,
                b'=' if self.eat(b'=') => TokenKind::EqEq,
                b'=' => TokenKind::Eq,
                b'!' if self.eat(b'=') => TokenKind::BangEq,
                b'!' => TokenKind::Bang,
                b'<' if self.eat(b'=') => TokenKind::LessEq,
                b'<' => TokenKind::Less,
                b'>' if self.eat(b'=') => TokenKind::GreaterEq,
                b'>' => TokenKind::Greater,
                b'|' if self.eat(b'|') => TokenKind::PipePipe,
                b'|' => TokenKind::Pipe,
                b'&' if self.eat(b'&') => TokenKind::AmpAmp,

                b'&' => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        "unexpected character '&'; did you mean '&&'?",
                        span,
                    );
                    continue;
                }
                _ => {
                    let span = self.span_from(start_line, start_col);
                    let shown = self.text_from(start).chars().next().unwrap_or('?');
                    self.emit_error(
                        ErrorCode::UNEXPECTED_CHARACTER,
                        format!("unexpected character '{shown}'"),
                        span,
                    );
                    // Skip the rest of a multi-byte character.
                    while self.peek().is_some_and(|b| b & 0b1100_0000 == 0b1000_0000) {
                        self.advance();
                    }
                    continue;
                }
            };
            return Token::new(kind, self.span_from(start_line, start_col));
        }
    }

    fn scan_int(&mut self, start: usize, start_line: u32, start_col: u32) -> TokenKind {
        while self.peek().is_some_and(|ch| ch.is_ascii_digit()) {
            self.advance();
        }
        let text = self.text_from(start);
        match text.parse::<i64>() {
            Ok(value) => TokenKind::IntLit(value),
            Err(_) => {
                let span = self.span_from(start_line, start_col);
                self.emit_error(
                    ErrorCode::INTEGER_TOO_LARGE,
                    format!("integer literal {text} does not fit in 64 bits"),
                    span,
                );
                TokenKind::IntLit(0)
            }
        }
    }

    fn scan_identifier(&mut self, start: usize) -> TokenKind {
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_alphanumeric() || ch == b'_')
        {
            self.advance();
        }
        if self.pos - start == 1
            && matches!(self.source[start], b'A'..=b'G')
            && self.peek() == Some(b'#')
        {
            self.advance();
        }
        let text = self.text_from(start);
        TokenKind::from_keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()))
    }

    /// Scan a string literal after its opening `"`. Strings may not span lines.
    fn scan_string(&mut self, start_line: u32, start_col: u32) -> TokenKind {
        let mut buf = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => {
                    let span = self.span_from(start_line, start_col);
                    self.emit_error(
                        ErrorCode::UNTERMINATED_STRING,
                        "unterminated string literal",
                        span,
                    );
                    break;
                }
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') if matches!(self.peek_at(1), Some(b'"' | b'\\')) => {
                    self.advance();
                    buf.extend(self.advance());
                }
                Some(_) => buf.extend(self.advance()),
            }
        }
        TokenKind::StringLit(String::from_utf8_lossy(&buf).into_owned())
    }
}

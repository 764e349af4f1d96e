//! Primary expressions: literals, names, parenthesised forms, note literals,
//! binding forms and the built-in tune/effect forms.

use tune_lexer::token::TokenKind;
use tune_types::ast::{Expr, Note};
use tune_types::{ErrorCode, Pitch, Span};

use crate::parser::Parser;

const PITCH_HINT: &str = "pitches are C C# D D# E F F# G G# A A# B, or R for a rest";

impl<'src> Parser<'src> {
    /// ```text
    /// Primary = Int | "true" | "false" | Name | "read"
    ///         | "(" ParenBody
    ///         | LetExpr | LetfunExpr
    ///         | "repeat" "(" Sequence "," Sequence ")"
    ///         | "reverse" "(" Sequence ")"
    ///         | "write" "(" Sequence "," String ")"
    ///         | "run" "(" String ")"
    /// ```
    pub(crate) fn parse_primary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        match self.peek_kind().clone() {
            TokenKind::IntLit(n) => {
                self.advance();
                Some(Expr::int(n))
            }
            TokenKind::True => {
                self.advance();
                Some(Expr::bool(true))
            }
            TokenKind::False => {
                self.advance();
                Some(Expr::bool(false))
            }
            TokenKind::Identifier(name) => {
                self.advance();
                Some(Expr::name(name))
            }
            TokenKind::Read => {
                self.advance();
                Some(Expr::Read)
            }
            TokenKind::LParen => {
                self.advance();
                self.parse_paren_body(start)
            }
            TokenKind::Let => self.parse_let(start),
            TokenKind::Letfun => self.parse_letfun(start),
            TokenKind::Repeat => {
                let (count, tune) = self.parse_builtin_args("repeat", |p| {
                    let count = p.parse_sequence()?;
                    p.expect(&TokenKind::Comma)?;
                    let tune = p.parse_sequence()?;
                    Some((count, tune))
                })?;
                Some(Expr::repeat(count, tune))
            }
            TokenKind::Reverse => {
                let tune = self.parse_builtin_args("reverse", |p| p.parse_sequence())?;
                Some(Expr::reverse(tune))
            }
            TokenKind::Write => {
                let (tune, path) = self.parse_builtin_args("write", |p| {
                    let tune = p.parse_sequence()?;
                    p.expect(&TokenKind::Comma)?;
                    let path = p.expect_string_literal()?;
                    Some((tune, path))
                })?;
                Some(Expr::write(tune, path))
            }
            TokenKind::Run => {
                let path = self.parse_builtin_args("run", |p| p.expect_string_literal())?;
                Some(Expr::run(path))
            }
            TokenKind::Eof => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    "expected expression, got end of input",
                );
                None
            }
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{other}'"),
                );
                None
            }
        }
    }

    /// Everything after an opening `(`: either a note literal `P, n)` or a
    /// parenthesised sequence.
    pub(crate) fn parse_paren_body(&mut self, open: Span) -> Option<Expr> {
        if matches!(self.peek_kind(), TokenKind::Identifier(_))
            && self.look_ahead(1) == &TokenKind::Comma
        {
            return self.parse_note(open);
        }
        let inner = self.parse_sequence()?;
        self.expect_closing(&TokenKind::RParen, "(", open)?;
        Some(inner)
    }

    /// `Note = "(" Pitch "," Int ")"`, with the `(` already consumed.
    fn parse_note(&mut self, open: Span) -> Option<Expr> {
        let pitch_span = self.current_span();
        let name = self.expect_identifier()?;
        let Some(pitch) = Pitch::from_name(&name) else {
            let error = self
                .build_error(
                    ErrorCode::INVALID_PITCH,
                    format!("'{name}' is not a pitch"),
                    pitch_span,
                )
                .with_suggestion(PITCH_HINT);
            self.push_error(error);
            return None;
        };
        self.expect(&TokenKind::Comma)?;

        let duration = match self.peek_kind().clone() {
            TokenKind::IntLit(n) => match u32::try_from(n) {
                Ok(d) => d,
                Err(_) => {
                    self.error_at_current(
                        ErrorCode::UNEXPECTED_TOKEN,
                        format!("note duration {n} is too large (at most {})", u32::MAX),
                    );
                    return None;
                }
            },
            other => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("note duration must be a non-negative integer literal, got '{other}'"),
                );
                return None;
            }
        };
        self.advance();
        self.expect_closing(&TokenKind::RParen, "(", open)?;
        Some(Expr::Note(Note::new(pitch, duration)))
    }

    /// `LetExpr = "let" Name "=" Sequence "in" Sequence "end"`
    fn parse_let(&mut self, start: Span) -> Option<Expr> {
        self.advance(); // let
        let name = self.expect_identifier()?;
        self.expect(&TokenKind::Eq)?;
        let def = self.parse_sequence()?;
        self.expect(&TokenKind::In)?;
        let body = self.parse_sequence()?;
        self.expect_closing(&TokenKind::End, "let", start)?;
        Some(Expr::let_(name, def, body))
    }

    /// `LetfunExpr = "letfun" Name "(" Name ")" "=" Sequence "in" Sequence "end"`
    fn parse_letfun(&mut self, start: Span) -> Option<Expr> {
        self.advance(); // letfun
        let name = self.expect_identifier()?;
        let open = self.current_span();
        self.expect(&TokenKind::LParen)?;
        let param = self.expect_identifier()?;
        self.expect_closing(&TokenKind::RParen, "(", open)?;
        self.expect(&TokenKind::Eq)?;
        let body = self.parse_sequence()?;
        self.expect(&TokenKind::In)?;
        let cont = self.parse_sequence()?;
        self.expect_closing(&TokenKind::End, "letfun", start)?;
        Some(Expr::letfun(name, param, body, cont))
    }

    /// Shared shape of the built-in forms: `keyword "(" args ")"`.
    fn parse_builtin_args<T>(
        &mut self,
        keyword: &str,
        args: impl FnOnce(&mut Self) -> Option<T>,
    ) -> Option<T> {
        self.advance(); // keyword
        let open = self.current_span();
        if !self.eat(&TokenKind::LParen) {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected '(' after '{keyword}', got '{}'", self.peek_kind()),
            );
            return None;
        }
        let result = args(self)?;
        self.expect_closing(&TokenKind::RParen, "(", open)?;
        Some(result)
    }
}

//! Token types for the Tune lexer.
//!
//! Defines [`TokenKind`] covering every lexeme of the language and
//! [`Token`], which pairs a kind with a source [`Span`].

use std::fmt;
use tune_types::Span;

/// Every reserved word. These cannot be used as names.
pub const ALL_KEYWORDS: &[&str] = &[
    // Binding forms
    "let", "letfun", "in", "end",
    // Control flow
    "if", "then", "else",
    // Literals
    "true", "false",
    // Effects
    "show", "read", "write", "run",
    // Tune forms
    "repeat", "reverse",
];

// ─────────────────────────────────────────────────────────────────────
// Token
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

// ─────────────────────────────────────────────────────────────────────
// TokenKind
// ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // ── Literals ──────────────────────────────────────────────
    /// Non-negative integer literal: `42`
    IntLit(i64),
    /// `"tune.mid"` (file paths for `write` and `run`)
    StringLit(String),
    True,
    False,

    /// User-defined name, or a pitch name inside a note literal: `x`, `A`, `C#`
    Identifier(String),

    // ── Keywords ─────────────────────────────────────────────
    Let,
    Letfun,
    In,
    End,
    If,
    Then,
    Else,
    Show,
    Read,
    Write,
    Run,
    Repeat,
    Reverse,

    // ── Operators ────────────────────────────────────────────
    /// `;`
    Semicolon,
    /// `:=`
    ColonEq,
    /// `||`
    PipePipe,
    /// `&&`
    AmpAmp,
    /// `!`
    Bang,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Less,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `>=`
    GreaterEq,
    /// `|` (join)
    Pipe,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,

    // ── Punctuation ──────────────────────────────────────────
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    /// `:` (slice bounds separator)
    Colon,
    /// `=` (binding in `let` / `letfun`)
    Eq,

    Eof,
}

impl TokenKind {
    /// Look up a reserved word. `None` for user names.
    pub fn from_keyword(s: &str) -> Option<TokenKind> {
        Some(match s {
            "let" => TokenKind::Let,
            "letfun" => TokenKind::Letfun,
            "in" => TokenKind::In,
            "end" => TokenKind::End,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "show" => TokenKind::Show,
            "read" => TokenKind::Read,
            "write" => TokenKind::Write,
            "run" => TokenKind::Run,
            "repeat" => TokenKind::Repeat,
            "reverse" => TokenKind::Reverse,
            _ => return None,
        })
    }

    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Let
                | TokenKind::Letfun
                | TokenKind::In
                | TokenKind::End
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::True
                | TokenKind::False
                | TokenKind::Show
                | TokenKind::Read
                | TokenKind::Write
                | TokenKind::Run
                | TokenKind::Repeat
                | TokenKind::Reverse
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::IntLit(n) => return write!(f, "{n}"),
            TokenKind::StringLit(s) => return write!(f, "{s:?}"),
            TokenKind::Identifier(name) => return f.write_str(name),
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Let => "let",
            TokenKind::Letfun => "letfun",
            TokenKind::In => "in",
            TokenKind::End => "end",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Else => "else",
            TokenKind::Show => "show",
            TokenKind::Read => "read",
            TokenKind::Write => "write",
            TokenKind::Run => "run",
            TokenKind::Repeat => "repeat",
            TokenKind::Reverse => "reverse",
            TokenKind::Semicolon => ";",
            TokenKind::ColonEq => ":=",
            TokenKind::PipePipe => "||",
            TokenKind::AmpAmp => "&&",
            TokenKind::Bang => "!",
            TokenKind::EqEq => "==",
            TokenKind::BangEq => "!=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEq => "<=",
            TokenKind::GreaterEq => ">=",
            TokenKind::Pipe => "|",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Eq => "=",
            TokenKind::Eof => "end of input",
        };
        f.write_str(text)
    }
}

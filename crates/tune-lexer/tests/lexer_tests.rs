//! Lexer tests: keywords, operators, literals, comments, pitch names,
//! and error recovery.

use tune_lexer::{Lexer, TokenKind};
use tune_types::{ErrorCode, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Lex source text and return just the token kinds (excluding final Eof).
fn kinds(source: &str) -> Vec<TokenKind> {
    let sf = SourceFile::new("test.tune", source);
    Lexer::new(&sf)
        .lex()
        .tokens
        .into_iter()
        .filter(|t| t.kind != TokenKind::Eof)
        .map(|t| t.kind)
        .collect()
}

fn error_codes(source: &str) -> Vec<ErrorCode> {
    let sf = SourceFile::new("test.tune", source);
    Lexer::new(&sf)
        .lex()
        .errors
        .errors
        .into_iter()
        .map(|e| e.code)
        .collect()
}

fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

// ─────────────────────────────────────────────────────────────────────
// Keywords & names
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_keywords() {
    assert_eq!(
        kinds("let letfun in end if then else show read write run repeat reverse true false"),
        vec![
            TokenKind::Let,
            TokenKind::Letfun,
            TokenKind::In,
            TokenKind::End,
            TokenKind::If,
            TokenKind::Then,
            TokenKind::Else,
            TokenKind::Show,
            TokenKind::Read,
            TokenKind::Write,
            TokenKind::Run,
            TokenKind::Repeat,
            TokenKind::Reverse,
            TokenKind::True,
            TokenKind::False,
        ]
    );
}

#[test]
fn test_keyword_prefixes_are_names() {
    assert_eq!(
        kinds("lets ending reader _x x1"),
        vec![ident("lets"), ident("ending"), ident("reader"), ident("_x"), ident("x1")]
    );
}

#[test]
fn test_pitch_names() {
    assert_eq!(
        kinds("A C# G# R Bb"),
        vec![ident("A"), ident("C#"), ident("G#"), ident("R"), ident("Bb")]
    );
}

#[test]
fn test_sharp_only_after_single_letter() {
    // `H#` and `AB#` are not pitches; the `#` is rejected.
    assert_eq!(
        error_codes("H# AB#"),
        vec![ErrorCode::UNEXPECTED_CHARACTER, ErrorCode::UNEXPECTED_CHARACTER]
    );
    assert_eq!(kinds("H#"), vec![ident("H")]);
}

// ─────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_operators() {
    assert_eq!(
        kinds("; := || && ! == != < > <= >= | + - * /"),
        vec![
            TokenKind::Semicolon,
            TokenKind::ColonEq,
            TokenKind::PipePipe,
            TokenKind::AmpAmp,
            TokenKind::Bang,
            TokenKind::EqEq,
            TokenKind::BangEq,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEq,
            TokenKind::GreaterEq,
            TokenKind::Pipe,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Star,
            TokenKind::Slash,
        ]
    );
}

#[test]
fn test_punctuation() {
    assert_eq!(
        kinds("( ) [ ] , : ="),
        vec![
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBracket,
            TokenKind::RBracket,
            TokenKind::Comma,
            TokenKind::Colon,
            TokenKind::Eq,
        ]
    );
}

#[test]
fn test_operators_without_spaces() {
    assert_eq!(
        kinds("x:=t[1:-2]|u"),
        vec![
            ident("x"),
            TokenKind::ColonEq,
            ident("t"),
            TokenKind::LBracket,
            TokenKind::IntLit(1),
            TokenKind::Colon,
            TokenKind::Minus,
            TokenKind::IntLit(2),
            TokenKind::RBracket,
            TokenKind::Pipe,
            ident("u"),
        ]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Literals
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_integer_literals() {
    assert_eq!(
        kinds("0 42 9223372036854775807"),
        vec![
            TokenKind::IntLit(0),
            TokenKind::IntLit(42),
            TokenKind::IntLit(i64::MAX),
        ]
    );
}

#[test]
fn test_integer_too_large() {
    assert_eq!(
        error_codes("9223372036854775808"),
        vec![ErrorCode::INTEGER_TOO_LARGE]
    );
}

#[test]
fn test_string_literals() {
    assert_eq!(
        kinds(r#"write(t, "out/song.mid") "say \"hi\"""#),
        vec![
            TokenKind::Write,
            TokenKind::LParen,
            ident("t"),
            TokenKind::Comma,
            TokenKind::StringLit("out/song.mid".into()),
            TokenKind::RParen,
            TokenKind::StringLit("say \"hi\"".into()),
        ]
    );
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        error_codes("run(\"a.tune\nx"),
        vec![ErrorCode::UNTERMINATED_STRING]
    );
}

// ─────────────────────────────────────────────────────────────────────
// Trivia
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_comments_and_newlines() {
    assert_eq!(
        kinds("x // the tune\n;\n// trailing\n  show x"),
        vec![ident("x"), TokenKind::Semicolon, TokenKind::Show, ident("x")]
    );
}

#[test]
fn test_empty_source_is_just_eof() {
    let sf = SourceFile::new("test.tune", "   // nothing\n");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.tokens.len(), 1);
    assert_eq!(result.tokens[0].kind, TokenKind::Eof);
    assert!(!result.errors.has_errors());
}

// ─────────────────────────────────────────────────────────────────────
// Error recovery
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_bad_characters_are_skipped() {
    let sf = SourceFile::new("test.tune", "x @ y $ z");
    let result = Lexer::new(&sf).lex();
    assert_eq!(result.errors.total_errors, 2);
    let names: Vec<_> = result
        .tokens
        .iter()
        .filter_map(|t| match &t.kind {
            TokenKind::Identifier(n) => Some(n.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["x", "y", "z"]);
}

#[test]
fn test_single_ampersand_suggests_and() {
    let sf = SourceFile::new("test.tune", "a & b");
    let result = Lexer::new(&sf).lex();
    let err = result.errors.first().expect("expected an error");
    assert_eq!(err.code, ErrorCode::UNEXPECTED_CHARACTER);
    assert!(err.message.contains("&&"));
    assert_eq!(err.span.start_col, 3);
    assert_eq!(err.source_line, "a & b");
}

#[test]
fn test_non_ascii_character_reported_once() {
    assert_eq!(error_codes("x ♪ y"), vec![ErrorCode::UNEXPECTED_CHARACTER]);
}

#[test]
fn test_lexing_is_deterministic() {
    let src = "letfun f(x) = x * 2 in show f((A, 1) | (C#, 2)) end";
    let first = kinds(src);
    for _ in 0..50 {
        assert_eq!(kinds(src), first);
    }
}

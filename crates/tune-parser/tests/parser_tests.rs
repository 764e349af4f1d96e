//! Parser tests: precedence and associativity, note literals, binding
//! forms, built-in forms, and syntax errors.

use pretty_assertions::assert_eq;
use tune_parser::{parse_source, ParseResult, MAX_NESTING};
use tune_types::ast::{BinOp, Expr, LogicOp, UnaryOp};
use tune_types::{ErrorCode, Pitch, SourceFile};

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

fn parse(source: &str) -> ParseResult {
    let sf = SourceFile::new("test.tune", source);
    parse_source(&sf)
}

/// Parse source and return the expression, panicking if there are errors.
fn parse_ok(source: &str) -> Expr {
    let result = parse(source);
    if result.errors.has_errors() {
        for e in &result.errors.errors {
            eprintln!("  ERROR: {} ({})", e.message, e.code);
        }
        panic!("unexpected parse errors (see above)");
    }
    result.expr.expect("no expression returned")
}

/// Parse source that must fail and return the first error code.
fn first_error(source: &str) -> ErrorCode {
    let result = parse(source);
    assert!(result.expr.is_none(), "expected a syntax error for {source:?}");
    result.errors.first().expect("error list is empty").code
}

fn name(n: &str) -> Expr {
    Expr::name(n)
}

fn int(n: i64) -> Expr {
    Expr::int(n)
}

// ─────────────────────────────────────────────────────────────────────
// Atoms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_literals_and_names() {
    assert_eq!(parse_ok("42"), int(42));
    assert_eq!(parse_ok("true"), Expr::bool(true));
    assert_eq!(parse_ok("false"), Expr::bool(false));
    assert_eq!(parse_ok("melody"), name("melody"));
    assert_eq!(parse_ok("read"), Expr::Read);
    assert_eq!(parse_ok("((7))"), int(7));
}

#[test]
fn test_note_literals() {
    assert_eq!(parse_ok("(A, 1)"), Expr::note(Pitch::A, 1));
    assert_eq!(parse_ok("(C#, 4)"), Expr::note(Pitch::CSharp, 4));
    assert_eq!(parse_ok("(R, 0)"), Expr::note(Pitch::Rest, 0));
}

#[test]
fn test_invalid_pitch() {
    assert_eq!(first_error("(H, 1)"), ErrorCode::INVALID_PITCH);
    assert_eq!(first_error("(x, 1)"), ErrorCode::INVALID_PITCH);
    assert_eq!(first_error("(E#, 1)"), ErrorCode::INVALID_PITCH);

    let result = parse("(Q, 2)");
    let err = result.errors.first().unwrap();
    assert!(err.suggestion.as_deref().unwrap_or("").contains("R for a rest"));
}

#[test]
fn test_note_duration_must_be_literal() {
    assert_eq!(first_error("(A, x)"), ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(first_error("(A, -1)"), ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(first_error("(A, 4294967296)"), ErrorCode::UNEXPECTED_TOKEN);
}

// ─────────────────────────────────────────────────────────────────────
// Sequence, assignment, show, if
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_sequence_is_right_associative() {
    assert_eq!(
        parse_ok("x; a; b"),
        Expr::seq(name("x"), Expr::seq(name("a"), name("b")))
    );
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(
        parse_ok("x := a := b"),
        Expr::assign("x", Expr::assign("a", name("b")))
    );
}

#[test]
fn test_assignment_binds_looser_than_operators() {
    assert_eq!(
        parse_ok("x := x + 1; show x"),
        Expr::seq(
            Expr::assign("x", Expr::binary(BinOp::Add, name("x"), int(1))),
            Expr::show(name("x")),
        )
    );
}

#[test]
fn test_show_takes_low_precedence_operand() {
    assert_eq!(
        parse_ok("show (A, 1) | (B, 2)"),
        Expr::show(Expr::join(
            Expr::note(Pitch::A, 1),
            Expr::note(Pitch::B, 2)
        ))
    );
    assert_eq!(
        parse_ok("show t := t * 2"),
        Expr::show(Expr::assign(
            "t",
            Expr::binary(BinOp::Mul, name("t"), int(2))
        ))
    );
}

#[test]
fn test_if_expression() {
    assert_eq!(
        parse_ok("if a < b then x else y"),
        Expr::if_(
            Expr::binary(BinOp::Lt, name("a"), name("b")),
            name("x"),
            name("y")
        )
    );
}

#[test]
fn test_if_branches() {
    // The `then` branch may be a sequence; `else` stops at `;`.
    assert_eq!(
        parse_ok("if c then a; b else d; e"),
        Expr::seq(
            Expr::if_(name("c"), Expr::seq(name("a"), name("b")), name("d")),
            name("e"),
        )
    );
}

#[test]
fn test_missing_else() {
    assert_eq!(first_error("if c then a"), ErrorCode::UNEXPECTED_TOKEN);
}

// ─────────────────────────────────────────────────────────────────────
// Operators
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_logic_precedence() {
    assert_eq!(
        parse_ok("a || b && !c"),
        Expr::logic(
            LogicOp::Or,
            name("a"),
            Expr::logic(
                LogicOp::And,
                name("b"),
                Expr::unary(UnaryOp::Not, name("c"))
            ),
        )
    );
}

#[test]
fn test_not_binds_looser_than_comparison() {
    assert_eq!(
        parse_ok("!a == b"),
        Expr::unary(UnaryOp::Not, Expr::binary(BinOp::Eq, name("a"), name("b")))
    );
}

#[test]
fn test_comparison_operators() {
    for (src, op) in [
        ("a == b", BinOp::Eq),
        ("a != b", BinOp::Neq),
        ("a < b", BinOp::Lt),
        ("a > b", BinOp::Gt),
        ("a <= b", BinOp::Leq),
        ("a >= b", BinOp::Geq),
    ] {
        assert_eq!(parse_ok(src), Expr::binary(op, name("a"), name("b")));
    }
}

#[test]
fn test_comparison_does_not_chain() {
    assert_eq!(first_error("a < b < c"), ErrorCode::CHAINED_COMPARISON);
}

#[test]
fn test_join_is_right_associative_and_looser_than_arithmetic() {
    assert_eq!(
        parse_ok("a | b + 2 | c"),
        Expr::join(
            name("a"),
            Expr::join(Expr::binary(BinOp::Add, name("b"), int(2)), name("c"))
        )
    );
}

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(
        parse_ok("1 + 2 * 3 - 4 / 2"),
        Expr::binary(
            BinOp::Sub,
            Expr::binary(
                BinOp::Add,
                int(1),
                Expr::binary(BinOp::Mul, int(2), int(3))
            ),
            Expr::binary(BinOp::Div, int(4), int(2)),
        )
    );
}

#[test]
fn test_unary_minus() {
    assert_eq!(
        parse_ok("-a * b"),
        Expr::binary(BinOp::Mul, Expr::unary(UnaryOp::Neg, name("a")), name("b"))
    );
    assert_eq!(
        parse_ok("--3"),
        Expr::unary(UnaryOp::Neg, Expr::unary(UnaryOp::Neg, int(3)))
    );
}

// ─────────────────────────────────────────────────────────────────────
// Postfix
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_application() {
    assert_eq!(parse_ok("f(x)"), Expr::app(name("f"), name("x")));
    assert_eq!(
        parse_ok("f(x)(y)"),
        Expr::app(Expr::app(name("f"), name("x")), name("y"))
    );
    assert_eq!(
        parse_ok("-f(2)"),
        Expr::unary(UnaryOp::Neg, Expr::app(name("f"), int(2)))
    );
}

#[test]
fn test_application_to_bare_note() {
    assert_eq!(
        parse_ok("f(A, 1)"),
        Expr::app(name("f"), Expr::note(Pitch::A, 1))
    );
    assert_eq!(parse_ok("f((A, 1))"), parse_ok("f(A, 1)"));
}

#[test]
fn test_slice() {
    assert_eq!(
        parse_ok("t[1:2]"),
        Expr::slice(name("t"), int(1), int(2))
    );
    assert_eq!(
        parse_ok("t[0:-1][1:n+1]"),
        Expr::slice(
            Expr::slice(name("t"), int(0), Expr::unary(UnaryOp::Neg, int(1))),
            int(1),
            Expr::binary(BinOp::Add, name("n"), int(1)),
        )
    );
}

#[test]
fn test_unclosed_slice() {
    assert_eq!(first_error("t[1:2"), ErrorCode::UNCLOSED_DELIMITER);
    assert_eq!(first_error("t[1]"), ErrorCode::UNEXPECTED_TOKEN);
}

// ─────────────────────────────────────────────────────────────────────
// Binding forms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_let() {
    assert_eq!(
        parse_ok("let a = b in c end"),
        Expr::let_("a", name("b"), name("c"))
    );
}

#[test]
fn test_let_body_is_a_sequence() {
    assert_eq!(
        parse_ok("let x = 1 in x := x + 1; x end"),
        Expr::let_(
            "x",
            int(1),
            Expr::seq(
                Expr::assign("x", Expr::binary(BinOp::Add, name("x"), int(1))),
                name("x"),
            ),
        )
    );
}

#[test]
fn test_letfun() {
    assert_eq!(
        parse_ok("letfun a(b) = c in d end"),
        Expr::letfun("a", "b", name("c"), name("d"))
    );
}

#[test]
fn test_recursive_letfun() {
    let src = "letfun fact(n) = if n < 1 then 1 else n * fact(n - 1) in fact(5) end";
    assert_eq!(
        parse_ok(src),
        Expr::letfun(
            "fact",
            "n",
            Expr::if_(
                Expr::binary(BinOp::Lt, name("n"), int(1)),
                int(1),
                Expr::binary(
                    BinOp::Mul,
                    name("n"),
                    Expr::app(name("fact"), Expr::binary(BinOp::Sub, name("n"), int(1))),
                ),
            ),
            Expr::app(name("fact"), int(5)),
        )
    );
}

#[test]
fn test_unclosed_let() {
    assert_eq!(first_error("let x = 1 in x"), ErrorCode::UNCLOSED_DELIMITER);
    let result = parse("let x = 1 in x");
    let err = result.errors.first().unwrap();
    assert!(err.message.contains("'let' opened at 1:1"));
    assert_eq!(err.suggestion.as_deref(), Some("add 'end'"));
}

#[test]
fn test_keyword_is_not_a_name() {
    let result = parse("let end = 1 in 2 end");
    assert!(result.errors.first().unwrap().message.contains("keyword"));
}

// ─────────────────────────────────────────────────────────────────────
// Built-in forms
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_tune_builtins() {
    assert_eq!(
        parse_ok("repeat(3, t | u)"),
        Expr::repeat(int(3), Expr::join(name("t"), name("u")))
    );
    assert_eq!(parse_ok("reverse(t)"), Expr::reverse(name("t")));
}

#[test]
fn test_effect_builtins() {
    assert_eq!(
        parse_ok(r#"write(t * 2, "out.mid")"#),
        Expr::write(Expr::binary(BinOp::Mul, name("t"), int(2)), "out.mid")
    );
    assert_eq!(parse_ok(r#"run("songs/a.tune")"#), Expr::run("songs/a.tune"));
}

#[test]
fn test_builtins_require_parentheses() {
    assert_eq!(first_error("reverse t"), ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(first_error("run(path)"), ErrorCode::UNEXPECTED_TOKEN);
}

// ─────────────────────────────────────────────────────────────────────
// Whole programs & errors
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_multiline_program_with_comments() {
    let src = "// a small tune\n\
               let t = (C, 1) | (E, 1) | (G, 2) in\n\
               \x20 show t + 2;   // up a whole step\n\
               \x20 reverse(t)\n\
               end";
    let expr = parse_ok(src);
    assert_eq!(
        expr.to_string(),
        "let t = ((C, 1) | ((E, 1) | (G, 2))) in ((show (t + 2)); reverse(t)) end"
    );
}

#[test]
fn test_empty_input() {
    assert_eq!(first_error(""), ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(first_error("   // only a comment"), ErrorCode::UNEXPECTED_TOKEN);
}

#[test]
fn test_trailing_input() {
    assert_eq!(first_error("a b"), ErrorCode::TRAILING_INPUT);
    assert_eq!(first_error("(A, 1))"), ErrorCode::TRAILING_INPUT);
}

#[test]
fn test_lexical_errors_stop_before_parsing() {
    let result = parse("x @ y");
    assert!(result.expr.is_none());
    assert_eq!(result.errors.total_errors, 1);
    assert_eq!(
        result.errors.first().unwrap().code,
        ErrorCode::UNEXPECTED_CHARACTER
    );
}

#[test]
fn test_error_span_points_at_offending_token() {
    let result = parse("let x = 1 in\n  x + * 2\nend");
    let err = result.errors.first().unwrap();
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!((err.span.start_line, err.span.start_col), (2, 7));
    assert_eq!(err.source_line, "  x + * 2");
}

#[test]
fn test_nesting_limit() {
    let depth = MAX_NESTING as usize + 10;
    let src = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
    assert_eq!(first_error(&src), ErrorCode::NESTING_TOO_DEEP);

    let ok = format!("{}1{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(parse_ok(&ok), int(1));
}

#[test]
fn test_prefix_operator_chains_hit_nesting_limit() {
    let minus = format!("{}1", "-".repeat(100_000));
    assert_eq!(first_error(&minus), ErrorCode::NESTING_TOO_DEEP);

    let bang = format!("{}true", "!".repeat(100_000));
    assert_eq!(first_error(&bang), ErrorCode::NESTING_TOO_DEEP);

    let shows = format!("{}1", "show ".repeat(100_000));
    assert_eq!(first_error(&shows), ErrorCode::NESTING_TOO_DEEP);

    assert_eq!(
        parse_ok("--1"),
        Expr::unary(UnaryOp::Neg, Expr::unary(UnaryOp::Neg, int(1)))
    );
}

#[test]
fn test_long_sequences_and_joins_do_not_count_as_nesting() {
    let count = MAX_NESTING as usize * 4;

    let statements = vec!["x := 1"; count].join("; ");
    let mut expr = parse_ok(&statements);
    let mut seen = 1;
    while let Expr::Seq { second, .. } = expr {
        expr = *second;
        seen += 1;
    }
    assert_eq!(seen, count);

    let melody = vec!["(A, 1)"; count].join(" | ");
    let mut expr = parse_ok(&melody);
    let mut seen = 1;
    while let Expr::Join { right, .. } = expr {
        expr = *right;
        seen += 1;
    }
    assert_eq!(seen, count);
}

#[test]
fn test_ast_serializes_to_json() {
    let expr = parse_ok("show (A, 1) * 2");
    let json = serde_json::to_value(&expr).unwrap();
    let back: Expr = serde_json::from_value(json).unwrap();
    assert_eq!(back, expr);
}

#[test]
fn test_parsing_is_deterministic() {
    let src = "letfun f(x) = x * 2 in show f((A, 1) | (C#, 2)) end";
    let first = parse_ok(src);
    for _ in 0..50 {
        assert_eq!(parse_ok(src), first);
    }
}

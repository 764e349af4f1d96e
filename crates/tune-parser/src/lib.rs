//! Tune parser: converts a token stream into an expression tree.

mod parse_atom;
mod parse_expr;
mod parser;

pub use parser::{ParseResult, Parser, MAX_NESTING};

use tune_lexer::Lexer;
use tune_types::SourceFile;

/// Lex and parse `source_file` in one step.
///
/// Lexical errors stop the pipeline before parsing; the returned
/// [`ParseResult`] then carries only those errors.
pub fn parse_source(source_file: &SourceFile) -> ParseResult {
    let lexed = Lexer::new(source_file).lex();
    if lexed.errors.has_errors() {
        return ParseResult {
            expr: None,
            errors: lexed.errors,
        };
    }
    Parser::new(lexed.tokens, source_file).parse()
}

//! Shared types for the Tune language.
//!
//! This crate defines the expression tree, the musical data model
//! (pitches, notes, tunes), source spans and syntax error types used by
//! every stage from the lexer to the evaluator.

mod error;
mod span;
pub mod ast;

pub use ast::{Note, Pitch, Tune, CHROMATIC};
pub use error::{ErrorCategory, ErrorCode, SyntaxError, SyntaxErrors, MAX_ERRORS};
pub use span::{SourceFile, Span};

/// Result type used by the front end.
pub type Result<T> = std::result::Result<T, SyntaxError>;

//! Runtime error types for the Tune evaluator.

use std::fmt;
use thiserror::Error;

use crate::host::HostError;

/// The three recoverable error families a driver reports.
///
/// Stack exhaustion and integer overflow are not part of this taxonomy:
/// they abort the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Operand kind mismatch, non-boolean condition, applying a non-function,
    /// reassigning a function name, bad duration modifier.
    Type,
    /// A name with no binding in scope.
    UnboundName,
    /// Input, serialization and playback failures.
    Runtime,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type => write!(f, "TypeError"),
            Self::UnboundName => write!(f, "EnvError"),
            Self::Runtime => write!(f, "RuntimeError"),
        }
    }
}

/// Evaluation error. Aborts the current top-level expression only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    // ── Type errors ──
    #[error("cannot apply '{op}' to {left} and {right}")]
    OperandMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },
    #[error("cannot apply '{op}' to {operand}")]
    UnaryMismatch {
        op: &'static str,
        operand: &'static str,
    },
    #[error("left operand of '{op}' must be a boolean, got {got}")]
    LeftNotBoolean { op: &'static str, got: &'static str },
    #[error("right operand of '{op}' must be a boolean, got {got}")]
    RightNotBoolean { op: &'static str, got: &'static str },
    #[error("if condition must be a boolean, got {got}")]
    ConditionNotBoolean { got: &'static str },
    #[error("application of non-function: {got}")]
    NotAFunction { got: &'static str },
    #[error("cannot assign to '{name}': it names a function")]
    AssignToFunction { name: String },
    #[error("non-joinable types: {left} | {right}")]
    NotJoinable {
        left: &'static str,
        right: &'static str,
    },
    #[error("non-sliceable types: {tune}[{start}:{end}]")]
    NotSliceable {
        tune: &'static str,
        start: &'static str,
        end: &'static str,
    },
    #[error("repeat expects an integer count and a tune, got {count} and {tune}")]
    NotRepeatable {
        count: &'static str,
        tune: &'static str,
    },
    #[error("reverse expects a tune, got {got}")]
    NotReversible { got: &'static str },
    #[error("duration modifier must be positive, got {got}")]
    NonPositiveModifier { got: i64 },
    #[error("division by zero")]
    DivisionByZero,

    // ── Environment errors ──
    #[error("name is not in environment: {0}")]
    UnboundName(String),

    // ── Runtime errors ──
    #[error("expected Integer, got {input:?}")]
    BadInput { input: String },
    #[error("expected Integer, but input is closed")]
    InputClosed,
    #[error("failed to read input: {0}")]
    ReadFailed(#[source] HostError),
    #[error("expected Tune, got {got}")]
    ExpectedTune { got: &'static str },
    #[error("failed to write '{path}': {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: HostError,
    },
    #[error("failed to run '{path}': {source}")]
    RunFailed {
        path: String,
        #[source]
        source: HostError,
    },
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnboundName(_) => ErrorKind::UnboundName,
            Self::BadInput { .. }
            | Self::InputClosed
            | Self::ReadFailed(_)
            | Self::ExpectedTune { .. }
            | Self::WriteFailed { .. }
            | Self::RunFailed { .. } => ErrorKind::Runtime,
            _ => ErrorKind::Type,
        }
    }
}

/// Result alias for evaluator operations.
pub type EvalResult<T> = Result<T, EvalError>;

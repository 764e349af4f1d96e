//! Tune tree-walking evaluator.
//!
//! Evaluates an [`Expr`](tune_types::ast::Expr) to a [`Value`] against a
//! persistent environment of shared mutable [`Location`]s. Tune-valued
//! operands give the arithmetic operators their musical meaning (see
//! [`algebra`]); effect forms reach the outside world through a [`Host`].

pub mod algebra;
pub mod env;
pub mod error;
pub mod evaluator;
pub mod host;
pub mod value;

pub use env::{Env, Location};
pub use error::{ErrorKind, EvalError, EvalResult};
pub use evaluator::{Evaluator, READ_PROMPT};
pub use host::{Host, HostError, ScriptedHost};
pub use value::{Closure, Value};

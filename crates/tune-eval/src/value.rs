//! Runtime values.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tune_types::ast::Expr;
use tune_types::Tune;

use crate::env::Env;

/// The result of evaluating an expression.
///
/// Integers and booleans are distinct tags: they never compare equal.
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Tune(Tune),
    Closure(Rc<Closure>),
}

impl Value {
    /// Name of the runtime tag, as used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Bool(_) => "boolean",
            Value::Tune(_) => "tune",
            Value::Closure(_) => "function",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_tune(&self) -> Option<&Tune> {
        match self {
            Value::Tune(t) => Some(t),
            _ => None,
        }
    }

    /// `true` if both values carry the same runtime tag.
    pub fn same_tag(&self, other: &Value) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// Structural equality within a tag; closures by identity; different tags
/// are never equal.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Tune(a), Value::Tune(b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Tune> for Value {
    fn from(t: Tune) -> Self {
        Value::Tune(t)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Tune(t) => write!(f, "{t}"),
            Value::Closure(c) => write!(f, "<function({})>", c.param),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Tune(t) => write!(f, "Tune({t})"),
            Value::Closure(c) => write!(f, "{c:?}"),
        }
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Closure
// ══════════════════════════════════════════════════════════════════════════════

/// A function value: parameter, body, and the environment it was defined in.
///
/// The captured environment is fixed at construction except for one
/// backpatch performed by `letfun`, which points it at the environment that
/// binds the function's own name. A recursive function therefore forms an
/// `Rc` cycle (closure → env → location → closure) that is never reclaimed.
pub struct Closure {
    param: String,
    body: Rc<Expr>,
    env: RefCell<Env>,
}

impl Closure {
    pub fn new(param: impl Into<String>, body: Rc<Expr>, env: Env) -> Self {
        Self {
            param: param.into(),
            body,
            env: RefCell::new(env),
        }
    }

    pub fn param(&self) -> &str {
        &self.param
    }

    pub fn body(&self) -> &Expr {
        &self.body
    }

    /// The captured environment.
    pub fn env(&self) -> Env {
        self.env.borrow().clone()
    }

    /// Replace the captured environment. Only `letfun` does this, once,
    /// right after binding the closure to its name.
    pub(crate) fn backpatch(&self, env: Env) {
        *self.env.borrow_mut() = env;
    }
}

impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Closure")
            .field("param", &self.param)
            .field("body", &self.body.to_string())
            .field("env", &*self.env.borrow())
            .finish()
    }
}

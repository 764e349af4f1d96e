//! Core expression evaluator.

use std::path::Path;
use std::rc::Rc;

use tracing::{debug, trace, warn};
use tune_types::ast::{BinOp, Expr, Literal, LogicOp, UnaryOp};
use tune_types::Tune;

use crate::algebra::{self, overflow};
use crate::env::{Env, Location};
use crate::error::{EvalError, EvalResult};
use crate::host::Host;
use crate::value::{Closure, Value};

/// Prompt shown when `read` asks for an integer.
pub const READ_PROMPT: &str = "enter Integer: ";

/// The tree-walking evaluator.
///
/// It holds no interpreter state besides the host: every top-level
/// expression runs in a fresh empty environment, and all mutable state lives
/// in the [`Location`]s that environment comes to reach.
pub struct Evaluator<H: Host> {
    host: H,
}

impl<H: Host> Evaluator<H> {
    pub fn new(host: H) -> Self {
        Self { host }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn into_host(self) -> H {
        self.host
    }

    /// Evaluate a top-level expression in the empty environment.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn run(&mut self, expr: &Expr) -> EvalResult<Value> {
        let result = self.eval(expr, &Env::empty());
        match &result {
            Ok(value) => debug!(result = %value, "evaluation finished"),
            Err(err) => debug!(kind = %err.kind(), error = %err, "evaluation failed"),
        }
        result
    }

    // ══════════════════════════════════════════════════════════════════════
    // Expression evaluation
    // ══════════════════════════════════════════════════════════════════════

    /// Evaluate `expr` in `env`.
    pub fn eval(&mut self, expr: &Expr, env: &Env) -> EvalResult<Value> {
        match expr {
            Expr::Lit(Literal::Int(n)) => Ok(Value::Int(*n)),
            Expr::Lit(Literal::Bool(b)) => Ok(Value::Bool(*b)),
            Expr::Note(note) => Ok(Value::Tune(Tune::from(*note))),
            Expr::Name(name) => Ok(env.lookup(name)?.get()),

            Expr::Binary { op, left, right } => {
                let lv = self.eval(left, env)?;
                let rv = self.eval(right, env)?;
                binary(*op, lv, rv)
            }
            Expr::Logic { op, left, right } => self.eval_logic(*op, left, right, env),
            Expr::Unary { op, operand } => {
                let v = self.eval(operand, env)?;
                unary(*op, v)
            }

            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => match self.eval(cond, env)? {
                Value::Bool(true) => self.eval(then_branch, env),
                Value::Bool(false) => self.eval(else_branch, env),
                other => Err(EvalError::ConditionNotBoolean {
                    got: other.type_name(),
                }),
            },

            Expr::Let { name, def, body } => {
                let value = self.eval(def, env)?;
                let extended = env.extend(name.as_str(), Location::new(value));
                self.eval(body, &extended)
            }
            Expr::Letfun {
                name,
                param,
                body,
                cont,
            } => {
                let closure = Rc::new(Closure::new(param.as_str(), Rc::clone(body), env.clone()));
                let location = Location::new(Value::Closure(Rc::clone(&closure)));
                let extended = env.extend(name.as_str(), location);
                closure.backpatch(extended.clone());
                trace!(function = %name, %param, "bound function");
                self.eval(cont, &extended)
            }
            Expr::App { func, arg } => self.eval_app(func, arg, env),
            Expr::Assign { name, value } => {
                let location = env.lookup(name)?;
                if location.holds_function() {
                    return Err(EvalError::AssignToFunction { name: name.clone() });
                }
                let value = self.eval(value, env)?;
                trace!(%name, %value, "assign");
                location.set(value.clone());
                Ok(value)
            }
            Expr::Seq { first, second } => {
                self.eval(first, env)?;
                self.eval(second, env)
            }

            Expr::Join { left, right } => {
                match (self.eval(left, env)?, self.eval(right, env)?) {
                    (Value::Tune(l), Value::Tune(r)) => Ok(Value::Tune(algebra::join(&l, &r))),
                    (l, r) => Err(EvalError::NotJoinable {
                        left: l.type_name(),
                        right: r.type_name(),
                    }),
                }
            }
            Expr::Slice { tune, start, end } => {
                let tv = self.eval(tune, env)?;
                let sv = self.eval(start, env)?;
                let ev = self.eval(end, env)?;
                match (&tv, sv.as_int(), ev.as_int()) {
                    (Value::Tune(t), Some(s), Some(e)) => Ok(Value::Tune(algebra::slice(t, s, e))),
                    _ => Err(EvalError::NotSliceable {
                        tune: tv.type_name(),
                        start: sv.type_name(),
                        end: ev.type_name(),
                    }),
                }
            }
            Expr::Repeat { count, tune } => {
                match (self.eval(count, env)?, self.eval(tune, env)?) {
                    (Value::Int(n), Value::Tune(t)) => Ok(Value::Tune(algebra::repeat(&t, n))),
                    (c, t) => Err(EvalError::NotRepeatable {
                        count: c.type_name(),
                        tune: t.type_name(),
                    }),
                }
            }
            Expr::Reverse(tune) => match self.eval(tune, env)? {
                Value::Tune(t) => Ok(Value::Tune(algebra::reverse(&t))),
                other => Err(EvalError::NotReversible {
                    got: other.type_name(),
                }),
            },

            Expr::Read => self.eval_read(),
            Expr::Show(inner) => self.eval_show(inner, env),
            Expr::Write { tune, path } => self.eval_write(tune, path, env),
            Expr::Run { path } => self.eval_run(path),
        }
    }

    // ── Logic & application ──────────────────────────────────────────────

    /// `&&` and `||` short-circuit on the left operand.
    fn eval_logic(
        &mut self,
        op: LogicOp,
        left: &Expr,
        right: &Expr,
        env: &Env,
    ) -> EvalResult<Value> {
        let lv = self.eval(left, env)?;
        let Some(l) = lv.as_bool() else {
            return Err(EvalError::LeftNotBoolean {
                op: op.symbol(),
                got: lv.type_name(),
            });
        };
        let decided = match op {
            LogicOp::And => !l,
            LogicOp::Or => l,
        };
        if decided {
            return Ok(Value::Bool(l));
        }
        let rv = self.eval(right, env)?;
        match rv {
            Value::Bool(r) => Ok(Value::Bool(r)),
            other => Err(EvalError::RightNotBoolean {
                op: op.symbol(),
                got: other.type_name(),
            }),
        }
    }

    /// Apply a closure: the argument is evaluated in the caller's environment,
    /// the body in the closure's captured one.
    fn eval_app(&mut self, func: &Expr, arg: &Expr, env: &Env) -> EvalResult<Value> {
        let closure = match self.eval(func, env)? {
            Value::Closure(c) => c,
            other => {
                return Err(EvalError::NotAFunction {
                    got: other.type_name(),
                })
            }
        };
        let arg = self.eval(arg, env)?;
        trace!(param = closure.param(), %arg, "apply");
        let call_env = closure.env().extend(closure.param(), Location::new(arg));
        self.eval(closure.body(), &call_env)
    }

    // ── Effects ──────────────────────────────────────────────────────────

    fn eval_read(&mut self) -> EvalResult<Value> {
        let line = self
            .host
            .read_line(READ_PROMPT)
            .map_err(EvalError::ReadFailed)?
            .ok_or(EvalError::InputClosed)?;
        line.trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalError::BadInput { input: line })
    }

    /// Print the value and, for a tune, try to play it. Returns the value.
    fn eval_show(&mut self, inner: &Expr, env: &Env) -> EvalResult<Value> {
        let value = self.eval(inner, env)?;
        self.host.print(&value.to_string());
        if let Value::Tune(tune) = &value {
            if let Err(err) = self.host.play(tune) {
                warn!(error = %err, "playback failed");
                self.host.diagnostic(&format!("playback failed: {err}"));
            }
        }
        Ok(value)
    }

    fn eval_write(&mut self, tune: &Expr, path: &str, env: &Env) -> EvalResult<Value> {
        let value = self.eval(tune, env)?;
        let Value::Tune(tune) = value else {
            return Err(EvalError::ExpectedTune {
                got: value.type_name(),
            });
        };
        self.host
            .write_tune(&tune, Path::new(path))
            .map_err(|source| EvalError::WriteFailed {
                path: path.to_string(),
                source,
            })?;
        debug!(path, notes = tune.len(), "tune written");
        Ok(Value::Bool(true))
    }

    fn eval_run(&mut self, path: &str) -> EvalResult<Value> {
        self.host
            .run_file(Path::new(path))
            .map_err(|source| EvalError::RunFailed {
                path: path.to_string(),
                source,
            })?;
        Ok(Value::Bool(true))
    }
}

// ══════════════════════════════════════════════════════════════════════════
// Operators
// ══════════════════════════════════════════════════════════════════════════

fn binary(op: BinOp, lv: Value, rv: Value) -> EvalResult<Value> {
    use Value::{Int, Tune};

    let result = match (op, &lv, &rv) {
        // Equality is defined for every pair of values.
        (BinOp::Eq, _, _) => Value::Bool(lv == rv),
        (BinOp::Neq, _, _) => Value::Bool(lv.same_tag(&rv) && lv != rv),

        (BinOp::Add, Int(a), Int(b)) => Int(a.checked_add(*b).unwrap_or_else(|| overflow("+"))),
        (BinOp::Sub, Int(a), Int(b)) => Int(a.checked_sub(*b).unwrap_or_else(|| overflow("-"))),
        (BinOp::Mul, Int(a), Int(b)) => Int(a.checked_mul(*b).unwrap_or_else(|| overflow("*"))),
        (BinOp::Div, Int(a), Int(b)) => Int(floor_div(*a, *b)?),

        (BinOp::Add, Tune(t), Int(n)) => Tune(algebra::transpose(t, *n)),
        (BinOp::Sub, Tune(t), Int(n)) => {
            Tune(algebra::transpose(t, n.checked_neg().unwrap_or_else(|| overflow("-"))))
        }
        (BinOp::Mul, Tune(t), Int(n)) => Tune(algebra::stretch(t, *n)?),
        (BinOp::Div, Tune(t), Int(n)) => Tune(algebra::compress(t, *n)?),

        (BinOp::Lt, Int(a), Int(b)) => Value::Bool(a < b),
        (BinOp::Gt, Int(a), Int(b)) => Value::Bool(a > b),
        (BinOp::Leq, Int(a), Int(b)) => Value::Bool(a <= b),
        (BinOp::Geq, Int(a), Int(b)) => Value::Bool(a >= b),

        _ => {
            return Err(EvalError::OperandMismatch {
                op: op.symbol(),
                left: lv.type_name(),
                right: rv.type_name(),
            })
        }
    };
    Ok(result)
}

fn unary(op: UnaryOp, v: Value) -> EvalResult<Value> {
    match (op, &v) {
        (UnaryOp::Neg, Value::Int(n)) => Ok(Value::Int(
            n.checked_neg().unwrap_or_else(|| overflow("negation")),
        )),
        (UnaryOp::Not, Value::Bool(b)) => Ok(Value::Bool(!b)),
        _ => Err(EvalError::UnaryMismatch {
            op: op.symbol(),
            operand: v.type_name(),
        }),
    }
}

/// Integer division rounding toward negative infinity.
fn floor_div(a: i64, b: i64) -> EvalResult<i64> {
    if b == 0 {
        return Err(EvalError::DivisionByZero);
    }
    let q = a.checked_div(b).unwrap_or_else(|| overflow("/"));
    if a % b != 0 && ((a < 0) != (b < 0)) {
        Ok(q - 1)
    } else {
        Ok(q)
    }
}

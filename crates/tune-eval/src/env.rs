//! Locations and persistent environments.
//!
//! A [`Location`] is a shared mutable cell; cloning one yields another handle
//! to the same cell, so a write is visible through every alias. An [`Env`]
//! is an immutable cons list of `(name, Location)` frames: extending never
//! touches the parent, and lookup walks from the most recent binding.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{EvalError, EvalResult};
use crate::value::Value;

// ── Location ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct Location(Rc<RefCell<Value>>);

impl Location {
    pub fn new(value: Value) -> Self {
        Self(Rc::new(RefCell::new(value)))
    }

    pub fn get(&self) -> Value {
        self.0.borrow().clone()
    }

    /// Overwrite the cell in place.
    pub fn set(&self, value: Value) {
        *self.0.borrow_mut() = value;
    }

    /// `true` if the cell currently holds a closure.
    pub fn holds_function(&self) -> bool {
        matches!(*self.0.borrow(), Value::Closure(_))
    }

    /// `true` if both handles refer to the same cell.
    pub fn same_cell(&self, other: &Location) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({:?})", self.0.borrow())
    }
}

// ── Env ──────────────────────────────────────────────────────────────────────

struct Frame {
    name: String,
    location: Location,
    parent: Env,
}

#[derive(Clone, Default)]
pub struct Env {
    head: Option<Rc<Frame>>,
}

impl Env {
    /// The empty environment every top-level expression starts in.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The location bound to `name` by the most recent binding.
    pub fn lookup(&self, name: &str) -> EvalResult<Location> {
        let mut frame = self.head.as_deref();
        while let Some(f) = frame {
            if f.name == name {
                return Ok(f.location.clone());
            }
            frame = f.parent.head.as_deref();
        }
        Err(EvalError::UnboundName(name.to_string()))
    }

    /// A new environment with `name` bound in front of `self`. O(1).
    pub fn extend(&self, name: impl Into<String>, location: Location) -> Env {
        Env {
            head: Some(Rc::new(Frame {
                name: name.into(),
                location,
                parent: self.clone(),
            })),
        }
    }

    /// Bound names, most recent first. Shadowed names appear more than once.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let mut frame = self.head.as_deref();
        std::iter::from_fn(move || {
            let f = frame?;
            frame = f.parent.head.as_deref();
            Some(f.name.as_str())
        })
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

// Closures capture environments that may contain themselves, so only the
// names are shown.
impl fmt::Debug for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

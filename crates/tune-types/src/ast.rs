//! Expression tree and musical data types for the Tune language.
//!
//! The tree is immutable once built. Function bodies are held behind [`Rc`]
//! so a closure can share its body with the tree that defined it.
//! Large recursive variants are boxed to keep the enum small.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Pitches and notes
// ══════════════════════════════════════════════════════════════════════════════

/// The twelve chromatic pitch names, in half-step order starting at `C`.
pub const CHROMATIC: [Pitch; 12] = [
    Pitch::C,
    Pitch::CSharp,
    Pitch::D,
    Pitch::DSharp,
    Pitch::E,
    Pitch::F,
    Pitch::FSharp,
    Pitch::G,
    Pitch::GSharp,
    Pitch::A,
    Pitch::ASharp,
    Pitch::B,
];

/// A note's pitch: one of the twelve chromatic names, or a rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pitch {
    C,
    CSharp,
    D,
    DSharp,
    E,
    F,
    FSharp,
    G,
    GSharp,
    A,
    ASharp,
    B,
    /// Silence for the note's duration.
    Rest,
}

impl Pitch {
    /// Parse a pitch name as written in source (`C`, `C#`, ..., `R`).
    pub fn from_name(name: &str) -> Option<Pitch> {
        if name == "R" {
            return Some(Pitch::Rest);
        }
        CHROMATIC.iter().copied().find(|p| p.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            Pitch::C => "C",
            Pitch::CSharp => "C#",
            Pitch::D => "D",
            Pitch::DSharp => "D#",
            Pitch::E => "E",
            Pitch::F => "F",
            Pitch::FSharp => "F#",
            Pitch::G => "G",
            Pitch::GSharp => "G#",
            Pitch::A => "A",
            Pitch::ASharp => "A#",
            Pitch::B => "B",
            Pitch::Rest => "R",
        }
    }

    /// Position on the chromatic cycle, `None` for a rest.
    pub fn chromatic_index(self) -> Option<usize> {
        CHROMATIC.iter().position(|&p| p == self)
    }

    /// Shift by `half_steps` around the 12-tone cycle.
    ///
    /// A rest has no place on the cycle and transposes to a rest.
    pub fn transpose(self, half_steps: i64) -> Pitch {
        match self.chromatic_index() {
            Some(index) => {
                let shifted = (index as i64 + half_steps.rem_euclid(12)).rem_euclid(12);
                CHROMATIC
                    .get(shifted as usize)
                    .copied()
                    .unwrap_or(Pitch::Rest)
            }
            None => Pitch::Rest,
        }
    }
}

impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A pitched (or silent) note lasting `duration` beats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    pub pitch: Pitch,
    pub duration: u32,
}

impl Note {
    pub fn new(pitch: Pitch, duration: u32) -> Self {
        Self { pitch, duration }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.pitch, self.duration)
    }
}

/// An ordered, possibly empty sequence of notes.
///
/// Tunes are values: every operation builds a new tune.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tune {
    notes: Vec<Note>,
}

impl Tune {
    pub fn new(notes: Vec<Note>) -> Self {
        Self { notes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Total length in beats, rests included.
    pub fn total_duration(&self) -> u64 {
        self.notes.iter().map(|n| u64::from(n.duration)).sum()
    }
}

impl From<Note> for Tune {
    fn from(note: Note) -> Self {
        Self { notes: vec![note] }
    }
}

impl FromIterator<Note> for Tune {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        Self {
            notes: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Tune {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, note) in self.notes.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{note}")?;
        }
        f.write_str("]")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

/// Literal values that appear directly in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Literal {
    Int(i64),
    Bool(bool),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// Binary operators whose operands are both evaluated eagerly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinOp {
    // Arithmetic (overloaded for tunes)
    Add,
    Sub,
    Mul,
    Div,
    // Equality
    Eq,
    Neq,
    // Relational
    Lt,
    Gt,
    Leq,
    Geq,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
            BinOp::Lt => "<",
            BinOp::Gt => ">",
            BinOp::Leq => "<=",
            BinOp::Geq => ">=",
        }
    }
}

/// Short-circuiting boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicOp {
    And,
    Or,
}

impl LogicOp {
    pub fn symbol(self) -> &'static str {
        match self {
            LogicOp::And => "&&",
            LogicOp::Or => "||",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        }
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// `42`, `true`
    Lit(Literal),
    /// `(A, 1)`, evaluates to a one-note tune.
    Note(Note),
    /// `x`
    Name(String),

    /// `a + b`, `a == b`, ...
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `a && b`, `a || b`
    Logic {
        op: LogicOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `-a`, `!a`
    Unary { op: UnaryOp, operand: Box<Expr> },

    /// `if cond then a else b`
    If {
        cond: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    /// `let name = def in body end`
    Let {
        name: String,
        def: Box<Expr>,
        body: Box<Expr>,
    },
    /// `letfun name(param) = body in cont end`
    Letfun {
        name: String,
        param: String,
        body: Rc<Expr>,
        cont: Box<Expr>,
    },
    /// `f(arg)`
    App { func: Box<Expr>, arg: Box<Expr> },
    /// `name := value`
    Assign { name: String, value: Box<Expr> },
    /// `first; second`
    Seq { first: Box<Expr>, second: Box<Expr> },

    /// `a | b`
    Join { left: Box<Expr>, right: Box<Expr> },
    /// `tune[start:end]`
    Slice {
        tune: Box<Expr>,
        start: Box<Expr>,
        end: Box<Expr>,
    },
    /// `repeat(count, tune)`
    Repeat { count: Box<Expr>, tune: Box<Expr> },
    /// `reverse(tune)`
    Reverse(Box<Expr>),

    /// `read`
    Read,
    /// `show e`
    Show(Box<Expr>),
    /// `write(tune, "path")`
    Write { tune: Box<Expr>, path: String },
    /// `run("path")`
    Run { path: String },
}

// ── Constructors ─────────────────────────────────────────────────────────────
//
// Building trees by hand is common in tests and in the driver; these keep the
// boxing out of the way.

impl Expr {
    pub fn int(n: i64) -> Expr {
        Expr::Lit(Literal::Int(n))
    }

    pub fn bool(b: bool) -> Expr {
        Expr::Lit(Literal::Bool(b))
    }

    pub fn note(pitch: Pitch, duration: u32) -> Expr {
        Expr::Note(Note::new(pitch, duration))
    }

    pub fn name(name: impl Into<String>) -> Expr {
        Expr::Name(name.into())
    }

    pub fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn logic(op: LogicOp, left: Expr, right: Expr) -> Expr {
        Expr::Logic {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Expr {
        Expr::Unary {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn if_(cond: Expr, then_branch: Expr, else_branch: Expr) -> Expr {
        Expr::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        }
    }

    pub fn let_(name: impl Into<String>, def: Expr, body: Expr) -> Expr {
        Expr::Let {
            name: name.into(),
            def: Box::new(def),
            body: Box::new(body),
        }
    }

    pub fn letfun(
        name: impl Into<String>,
        param: impl Into<String>,
        body: Expr,
        cont: Expr,
    ) -> Expr {
        Expr::Letfun {
            name: name.into(),
            param: param.into(),
            body: Rc::new(body),
            cont: Box::new(cont),
        }
    }

    pub fn app(func: Expr, arg: Expr) -> Expr {
        Expr::App {
            func: Box::new(func),
            arg: Box::new(arg),
        }
    }

    pub fn assign(name: impl Into<String>, value: Expr) -> Expr {
        Expr::Assign {
            name: name.into(),
            value: Box::new(value),
        }
    }

    pub fn seq(first: Expr, second: Expr) -> Expr {
        Expr::Seq {
            first: Box::new(first),
            second: Box::new(second),
        }
    }

    pub fn join(left: Expr, right: Expr) -> Expr {
        Expr::Join {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn slice(tune: Expr, start: Expr, end: Expr) -> Expr {
        Expr::Slice {
            tune: Box::new(tune),
            start: Box::new(start),
            end: Box::new(end),
        }
    }

    pub fn repeat(count: Expr, tune: Expr) -> Expr {
        Expr::Repeat {
            count: Box::new(count),
            tune: Box::new(tune),
        }
    }

    pub fn reverse(tune: Expr) -> Expr {
        Expr::Reverse(Box::new(tune))
    }

    pub fn show(expr: Expr) -> Expr {
        Expr::Show(Box::new(expr))
    }

    pub fn write(tune: Expr, path: impl Into<String>) -> Expr {
        Expr::Write {
            tune: Box::new(tune),
            path: path.into(),
        }
    }

    pub fn run(path: impl Into<String>) -> Expr {
        Expr::Run { path: path.into() }
    }
}

/// Fully parenthesised concrete form, used when echoing what is about to run.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lit(lit) => write!(f, "{lit}"),
            Expr::Note(note) => write!(f, "{note}"),
            Expr::Name(name) => f.write_str(name),
            Expr::Binary { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            Expr::Logic { op, left, right } => {
                write!(f, "({left} {} {right})", op.symbol())
            }
            Expr::Unary { op, operand } => write!(f, "({}{operand})", op.symbol()),
            Expr::If {
                cond,
                then_branch,
                else_branch,
            } => write!(f, "(if {cond} then {then_branch} else {else_branch})"),
            Expr::Let { name, def, body } => write!(f, "let {name} = {def} in {body} end"),
            Expr::Letfun {
                name,
                param,
                body,
                cont,
            } => write!(f, "letfun {name}({param}) = {body} in {cont} end"),
            Expr::App { func, arg } => write!(f, "{func}({arg})"),
            Expr::Assign { name, value } => write!(f, "({name} := {value})"),
            Expr::Seq { first, second } => write!(f, "({first}; {second})"),
            Expr::Join { left, right } => write!(f, "({left} | {right})"),
            Expr::Slice { tune, start, end } => write!(f, "{tune}[{start}:{end}]"),
            Expr::Repeat { count, tune } => write!(f, "repeat({count}, {tune})"),
            Expr::Reverse(tune) => write!(f, "reverse({tune})"),
            Expr::Read => f.write_str("read"),
            Expr::Show(expr) => write!(f, "(show {expr})"),
            Expr::Write { tune, path } => write!(f, "write({tune}, {path:?})"),
            Expr::Run { path } => write!(f, "run({path:?})"),
        }
    }
}

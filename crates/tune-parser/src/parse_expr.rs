//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 10. `;` (sequence, right-assoc)
//! 9. `:=` (right-assoc), `show`, `if … then … else`
//! 8. `||`
//! 7. `&&`
//! 6. `!`
//! 5. `==`, `!=`, `<`, `>`, `<=`, `>=` (no chaining)
//! 4. `|` (join, right-assoc)
//! 3. `+`, `-`
//! 2. `*`, `/`
//! 1. unary `-`
//! 0. `f(x)` (application), `t[a:b]` (slice)

use tune_lexer::token::TokenKind;
use tune_types::ast::{BinOp, Expr, LogicOp, UnaryOp};
use tune_types::ErrorCode;

use crate::parser::Parser;

impl<'src> Parser<'src> {
    // ══════════════════════════════════════════════════════════════════════════
    // Entry Point
    // ══════════════════════════════════════════════════════════════════════════

    /// `Sequence = Statement [ ";" Sequence ]`
    ///
    /// Statements are collected in a loop and folded to the right, so a long
    /// script does not count against the nesting limit.
    pub(crate) fn parse_sequence(&mut self) -> Option<Expr> {
        self.nested(|p| {
            let first = p.parse_statement()?;
            let mut rest = Vec::new();
            while p.eat(&TokenKind::Semicolon) {
                rest.push(p.parse_statement()?);
            }
            Some(fold_right(first, rest, Expr::seq))
        })
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Statement-level forms
    // ══════════════════════════════════════════════════════════════════════════

    /// `Statement = Name ":=" Statement | "show" Statement | IfExpr | OrExpr`
    fn parse_statement(&mut self) -> Option<Expr> {
        match self.peek_kind() {
            TokenKind::Identifier(_) if self.look_ahead(1) == &TokenKind::ColonEq => {
                let name = self.expect_identifier()?;
                self.advance(); // :=
                let value = self.nested(Self::parse_statement)?;
                Some(Expr::assign(name, value))
            }
            TokenKind::Show => {
                self.advance();
                let operand = self.nested(Self::parse_statement)?;
                Some(Expr::show(operand))
            }
            TokenKind::If => self.parse_if(),
            _ => self.parse_or(),
        }
    }

    /// `IfExpr = "if" Sequence "then" Sequence "else" Statement`
    fn parse_if(&mut self) -> Option<Expr> {
        self.advance(); // if
        let cond = self.parse_sequence()?;
        self.expect(&TokenKind::Then)?;
        let then_branch = self.parse_sequence()?;
        self.expect(&TokenKind::Else)?;
        let else_branch = self.nested(Self::parse_statement)?;
        Some(Expr::if_(cond, then_branch, else_branch))
    }

    // ══════════════════════════════════════════════════════════════════════════
    // Precedence Chain
    // ══════════════════════════════════════════════════════════════════════════

    /// `OrExpr = AndExpr { "||" AndExpr }`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.eat(&TokenKind::PipePipe) {
            let right = self.parse_and()?;
            left = Expr::logic(LogicOp::Or, left, right);
        }
        Some(left)
    }

    /// `AndExpr = NotExpr { "&&" NotExpr }`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_not()?;
        while self.eat(&TokenKind::AmpAmp) {
            let right = self.parse_not()?;
            left = Expr::logic(LogicOp::And, left, right);
        }
        Some(left)
    }

    /// `NotExpr = "!" NotExpr | CompExpr`
    fn parse_not(&mut self) -> Option<Expr> {
        if self.eat(&TokenKind::Bang) {
            let operand = self.nested(Self::parse_not)?;
            return Some(Expr::unary(UnaryOp::Not, operand));
        }
        self.parse_comparison()
    }

    /// `CompExpr = JoinExpr [ CompOp JoinExpr ]`
    ///
    /// Comparison operators do NOT chain: `a < b < c` is a parse error.
    fn parse_comparison(&mut self) -> Option<Expr> {
        let left = self.parse_join()?;
        let Some(op) = self.match_comparison_op() else {
            return Some(left);
        };
        self.advance(); // consume operator
        let right = self.parse_join()?;
        if self.match_comparison_op().is_some() {
            let error = self
                .build_error(
                    ErrorCode::CHAINED_COMPARISON,
                    "comparison operators cannot be chained",
                    self.current_span(),
                )
                .with_suggestion("combine comparisons with '&&': a < b && b < c");
            self.push_error(error);
            return None;
        }
        Some(Expr::binary(op, left, right))
    }

    /// Check if current token is a comparison operator, return corresponding BinOp.
    fn match_comparison_op(&self) -> Option<BinOp> {
        match self.peek_kind() {
            TokenKind::EqEq => Some(BinOp::Eq),
            TokenKind::BangEq => Some(BinOp::Neq),
            TokenKind::Less => Some(BinOp::Lt),
            TokenKind::Greater => Some(BinOp::Gt),
            TokenKind::LessEq => Some(BinOp::Leq),
            TokenKind::GreaterEq => Some(BinOp::Geq),
            _ => None,
        }
    }

    /// `JoinExpr = AddExpr [ "|" JoinExpr ]`
    fn parse_join(&mut self) -> Option<Expr> {
        let first = self.parse_add()?;
        let mut rest = Vec::new();
        while self.eat(&TokenKind::Pipe) {
            rest.push(self.parse_add()?);
        }
        Some(fold_right(first, rest, Expr::join))
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_add(&mut self) -> Option<Expr> {
        let mut left = self.parse_mul()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_mul()?;
            left = Expr::binary(op, left, right);
        }
        Some(left)
    }

    /// `MulExpr = UnaryExpr { ("*" | "/") UnaryExpr }`
    fn parse_mul(&mut self) -> Option<Expr> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::binary(op, left, right);
        }
        Some(left)
    }

    /// `UnaryExpr = "-" UnaryExpr | PostfixExpr`
    fn parse_unary(&mut self) -> Option<Expr> {
        if self.eat(&TokenKind::Minus) {
            let operand = self.nested(Self::parse_unary)?;
            return Some(Expr::unary(UnaryOp::Neg, operand));
        }
        self.parse_postfix()
    }

    /// `PostfixExpr = Primary { "(" Argument ")" | "[" Sequence ":" Sequence "]" }`
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;
        loop {
            match self.peek_kind() {
                TokenKind::LParen => {
                    let open = self.current_span();
                    self.advance();
                    // A call with a single note argument may drop the inner
                    // parentheses: `f(A, 1)` is `f((A, 1))`.
                    let arg = self.parse_paren_body(open)?;
                    expr = Expr::app(expr, arg);
                }
                TokenKind::LBracket => {
                    let open = self.current_span();
                    self.advance();
                    let start = self.parse_sequence()?;
                    self.expect(&TokenKind::Colon)?;
                    let end = self.parse_sequence()?;
                    self.expect_closing(&TokenKind::RBracket, "[", open)?;
                    expr = Expr::slice(expr, start, end);
                }
                _ => break,
            }
        }
        Some(expr)
    }
}

/// Combine operands right-associatively: `a, [b, c]` becomes `f(a, f(b, c))`.
fn fold_right(first: Expr, rest: Vec<Expr>, combine: impl Fn(Expr, Expr) -> Expr) -> Expr {
    let mut rest = rest.into_iter().rev();
    let Some(last) = rest.next() else {
        return first;
    };
    let tail = rest.fold(last, |acc, item| combine(item, acc));
    combine(first, tail)
}

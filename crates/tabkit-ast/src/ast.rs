//! Statement and expression nodes.
//!
//! The grammar is deliberately closed: every construct the compiler accepts
//! has exactly one variant here, and everything else is rejected by the
//! parser. Compilation is an exhaustive `match` over [`ExprKind`].

use crate::foundation::{BinaryOp, Span, UnaryOp};

/// Expression node with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// What the expression is.
    pub kind: ExprKind,
    /// Where it was written.
    pub span: Span,
}

/// Expression variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// Integer literal: `42`.
    Integer(i64),

    /// Float literal: `3.5`, `1e3`.
    Float(f64),

    /// String literal: `"a,b"`.
    String(String),

    /// Column or bound name: `price`, `_tmp`.
    Name(String),

    /// Binary operation: `a + b`, `x <= y`, `p and q`.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },

    /// Unary operation: `-x`, `not flag`.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// Operand expression.
        operand: Box<Expr>,
    },

    /// Call with positional arguments: `log(a)`, `sum(x)`.
    Call {
        /// Function name.
        function: String,
        /// Positional arguments.
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Create an expression node.
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the name if this expression is a bare name reference.
    pub fn as_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// Short description of the node kind, for diagnostics.
    pub fn describe(&self) -> &'static str {
        match &self.kind {
            ExprKind::Integer(_) | ExprKind::Float(_) => "number",
            ExprKind::String(_) => "string",
            ExprKind::Name(_) => "name",
            ExprKind::Binary { op, .. } if op.is_comparison() => "comparison",
            ExprKind::Binary { op, .. } if op.is_logical() => "boolean operation",
            ExprKind::Binary { .. } => "binary operation",
            ExprKind::Unary { .. } => "unary operation",
            ExprKind::Call { .. } => "call",
        }
    }
}

/// Statement with its source span.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    /// What the statement is.
    pub kind: StmtKind,
    /// Where it was written.
    pub span: Span,
}

/// Statement variants.
#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `name = expr`
    Assign {
        /// Bound name.
        target: String,
        /// Right-hand side.
        value: Expr,
    },

    /// Bare expression. In output blocks only a bare name is allowed, which is
    /// shorthand for `name = name`; filter blocks use arbitrary expressions.
    Expr(Expr),
}

impl Stmt {
    /// Create a statement node.
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }
}

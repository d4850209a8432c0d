//! Compiled expressions.
//!
//! A [`CompiledExpr`] is a fragment of awk source together with the type it
//! evaluates to and what kind of value it is. The kind drives two decisions
//! made by the compilers:
//!
//! - **simple references** (a column read or an aggregator's state) can be
//!   bound to a new name without emitting any code
//! - **aggregated** values are constant within a group and may therefore be
//!   printed when the group is flushed

use tabkit_ast::{BinaryOp, Type, UnaryOp};

/// What a compiled expression denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Direct read of a zero-based input column.
    Column(usize),
    /// State variable of an aggregate function.
    Aggregator,
    /// Temporary variable holding an assigned value.
    Variable,
    /// Number or string literal.
    Literal,
    /// Any other computation.
    Computed,
}

/// A compiled expression: awk code plus its type and provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpr {
    code: String,
    ty: Type,
    kind: ValueKind,
    aggregated: bool,
    children: Vec<CompiledExpr>,
}

impl CompiledExpr {
    /// Read of zero-based input column `index`, rendered as `$<index+1>`.
    pub fn column(index: usize, ty: Type) -> Self {
        Self {
            code: format!("${}", index + 1),
            ty,
            kind: ValueKind::Column(index),
            aggregated: false,
            children: Vec::new(),
        }
    }

    /// Literal value. Literals are constant, hence aggregated.
    pub fn literal(code: impl Into<String>, ty: Type) -> Self {
        Self {
            code: code.into(),
            ty,
            kind: ValueKind::Literal,
            aggregated: true,
            children: Vec::new(),
        }
    }

    /// Aggregate function state variable.
    pub fn aggregator(var: impl Into<String>, ty: Type, args: Vec<CompiledExpr>) -> Self {
        Self {
            code: var.into(),
            ty,
            kind: ValueKind::Aggregator,
            aggregated: true,
            children: args,
        }
    }

    /// Temporary variable `var` holding `value`.
    pub fn variable(var: impl Into<String>, value: CompiledExpr) -> Self {
        Self {
            code: var.into(),
            ty: value.ty,
            kind: ValueKind::Variable,
            aggregated: value.aggregated,
            children: vec![value],
        }
    }

    /// Computation over `children`; aggregated iff every child is.
    pub fn computed(code: impl Into<String>, ty: Type, children: Vec<CompiledExpr>) -> Self {
        let aggregated = !children.is_empty() && children.iter().all(|c| c.aggregated);
        Self {
            code: code.into(),
            ty,
            kind: ValueKind::Computed,
            aggregated,
            children,
        }
    }

    /// Reference to a group key from inside an aggregate block.
    ///
    /// Aggregated, but not a simple reference: when a flush runs the key
    /// expression already reads the next group, so a bound key must be
    /// copied into a variable on every row.
    pub fn group_key(key: &CompiledExpr) -> Self {
        Self {
            code: key.code.clone(),
            ty: key.ty,
            kind: ValueKind::Computed,
            aggregated: true,
            children: Vec::new(),
        }
    }

    /// `(left op right)` with the inferred result type.
    pub fn binary(op: BinaryOp, left: CompiledExpr, right: CompiledExpr) -> Self {
        let ty = Type::infer_binary(op, left.ty, right.ty);
        let code = format!("({}{}{})", left.code, op.awk_symbol(), right.code);
        Self::computed(code, ty, vec![left, right])
    }

    /// `(op operand)` with the inferred result type.
    pub fn unary(op: UnaryOp, operand: CompiledExpr) -> Self {
        let ty = Type::infer_unary(op, operand.ty);
        let code = format!("({}{})", op.awk_symbol(), operand.code);
        Self::computed(code, ty, vec![operand])
    }

    /// Awk source of the expression.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Result type.
    pub fn ty(&self) -> Type {
        self.ty
    }

    /// What the expression denotes.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// Sub-expressions this one was built from.
    pub fn children(&self) -> &[CompiledExpr] {
        &self.children
    }

    /// Whether the value is constant within a group.
    pub fn is_aggregated(&self) -> bool {
        self.aggregated
    }

    /// Whether the expression is a bare read needing no storage of its own.
    pub fn is_simple_reference(&self) -> bool {
        matches!(self.kind, ValueKind::Column(_) | ValueKind::Aggregator)
    }

    /// Input column read directly, if any.
    pub fn column_index(&self) -> Option<usize> {
        match self.kind {
            ValueKind::Column(index) => Some(index),
            _ => None,
        }
    }
}

/// Render a string literal as an awk string constant.
pub(crate) fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

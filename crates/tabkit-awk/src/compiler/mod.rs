//! Expression compilers.
//!
//! ## Architecture
//!
//! - `statement`: output and group-key blocks (assignments, output names)
//! - `condition`: filter predicates over a finished context, read-only
//! - `aggregate`: aggregate blocks with aggregate functions and the
//!   aggregation check
//!
//! All three share [`ExprLowering`], an exhaustive match over the closed
//! expression grammar. They differ only in how names and calls resolve.

mod aggregate;
mod condition;
mod statement;

pub use aggregate::{AggregateBlock, AggregateCompiler};
pub use condition::ConditionCompiler;
pub use statement::{StatementBlock, StatementCompiler};

use tabkit_ast::{Expr, ExprKind, Stmt, StmtKind, Type};
use tabkit_schema::Schema;

use crate::error::{CompileError, CompileResult};
use crate::expr::{quote, CompiledExpr};
use crate::functions::scalar_call;

/// Lowering of parsed expressions to awk fragments.
pub(crate) trait ExprLowering {
    /// Resolve a name reference.
    fn lower_name(&self, name: &str) -> CompileResult<CompiledExpr>;

    /// Compile a call over compiled arguments.
    fn lower_call(&mut self, function: &str, args: Vec<CompiledExpr>) -> CompileResult<CompiledExpr> {
        scalar_call(function, args)
    }

    fn lower(&mut self, expr: &Expr) -> CompileResult<CompiledExpr> {
        match &expr.kind {
            ExprKind::Integer(n) => Ok(CompiledExpr::literal(n.to_string(), Type::Integer)),
            ExprKind::Float(x) => {
                if !x.is_finite() {
                    return Err(CompileError::syntax(format!(
                        "number literal at {} is out of range",
                        expr.span
                    )));
                }
                Ok(CompiledExpr::literal(format!("{:?}", x), Type::Floating))
            }
            ExprKind::String(text) => Ok(CompiledExpr::literal(quote(text), Type::String)),
            ExprKind::Name(name) => self.lower_name(name),
            ExprKind::Binary { op, left, right } => {
                let left = self.lower(left)?;
                let right = self.lower(right)?;
                Ok(CompiledExpr::binary(*op, left, right))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.lower(operand)?;
                Ok(CompiledExpr::unary(*op, operand))
            }
            ExprKind::Call { function, args } => {
                let args = args
                    .iter()
                    .map(|arg| self.lower(arg))
                    .collect::<CompileResult<Vec<_>>>()?;
                self.lower_call(function, args)
            }
        }
    }
}

/// Read of column `name`, if the schema has one.
pub(crate) fn column_ref(schema: &Schema, name: &str) -> Option<CompiledExpr> {
    let index = schema.index(name).ok()?;
    let field = schema.field_at(index)?;
    Some(CompiledExpr::column(index, field.ty))
}

/// Split an output-style statement into target and value.
///
/// A bare name `x` is shorthand for `x = x`.
pub(crate) fn as_assignment(stmt: &Stmt) -> CompileResult<(&str, &Expr)> {
    match &stmt.kind {
        StmtKind::Assign { target, value } => Ok((target, value)),
        StmtKind::Expr(expr) => match expr.as_name() {
            Some(name) => Ok((name, expr)),
            None => Err(CompileError::syntax(format!(
                "assign statements or field names expected, found {} at {}",
                expr.describe(),
                stmt.span
            ))),
        },
    }
}

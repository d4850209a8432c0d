//! Filter predicates.

use tabkit_ast::StmtKind;
use tabkit_parser::parse_block;
use tabkit_schema::Schema;
use tracing::debug;

use super::{column_ref, ExprLowering};
use crate::context::Context;
use crate::error::{CompileError, CompileResult};
use crate::expr::CompiledExpr;

/// Compiles filter expressions against a schema and a finished context.
///
/// Read-only: assignments are rejected and the context is never modified.
pub struct ConditionCompiler<'a> {
    schema: &'a Schema,
    context: &'a Context,
    conditions: Vec<CompiledExpr>,
}

impl<'a> ConditionCompiler<'a> {
    /// Start compiling against `schema` and the bindings in `context`.
    pub fn new(schema: &'a Schema, context: &'a Context) -> Self {
        Self {
            schema,
            context,
            conditions: Vec::new(),
        }
    }

    /// Compile one filter string; each statement in it is one condition.
    pub fn compile(&mut self, source: &str) -> CompileResult<()> {
        let block = parse_block(source)?;
        for stmt in &block {
            match &stmt.kind {
                StmtKind::Expr(expr) => {
                    let condition = self.lower(expr)?;
                    self.conditions.push(condition);
                }
                StmtKind::Assign { target, .. } => {
                    return Err(CompileError::syntax(format!(
                        "assignment to '{}' is not allowed",
                        target
                    )));
                }
            }
        }
        debug!(conditions = self.conditions.len(), "compiled filter block");
        Ok(())
    }

    /// Compile every string in `sources`.
    pub fn compile_all<S: AsRef<str>>(&mut self, sources: &[S]) -> CompileResult<()> {
        for source in sources {
            self.compile(source.as_ref())?;
        }
        Ok(())
    }

    /// Compiled conditions, in source order.
    pub fn finish(self) -> Vec<CompiledExpr> {
        self.conditions
    }
}

impl ExprLowering for ConditionCompiler<'_> {
    fn lower_name(&self, name: &str) -> CompileResult<CompiledExpr> {
        if let Some(column) = column_ref(self.schema, name) {
            return Ok(column);
        }
        self.context
            .get(name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::StatementCompiler;

    #[test]
    fn test_conditions_see_output_bindings() {
        let schema: Schema = "# a:int\tb:int".parse().unwrap();
        let mut outputs = StatementCompiler::new(&schema);
        outputs.compile("_total = a + b").unwrap();
        let block = outputs.finish();

        let mut filters = ConditionCompiler::new(&schema, &block.context);
        filters.compile("_total > 10 and not a == b").unwrap();
        filters.compile("b").unwrap();
        let conditions = filters.finish();

        let code: Vec<&str> = conditions.iter().map(CompiledExpr::code).collect();
        assert_eq!(code, vec!["((__var__0>10)&&(!($1==$2)))", "$2"]);
    }

    #[test]
    fn test_assignment_rejected() {
        let schema: Schema = "# a".parse().unwrap();
        let context = Context::new();
        let mut filters = ConditionCompiler::new(&schema, &context);
        let err = filters.compile("x = a").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error: assignment to 'x' is not allowed"
        );
    }
}

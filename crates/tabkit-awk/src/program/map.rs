//! Row-wise map/filter programs.

use std::fmt;

use tabkit_schema::Schema;
use tracing::debug;

use super::join_statements;
use crate::compiler::{ConditionCompiler, StatementCompiler};
use crate::error::{Clause, CompileError, CompileResult};
use crate::expr::CompiledExpr;

/// A stateless per-row program:
///
/// ```text
/// {row statements;}condition{print outputs;}
/// ```
///
/// With no outputs the whole input row is printed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MapProgram {
    /// Assignments computed for every row.
    pub row_statements: Vec<String>,
    /// Filter conditions, all of which must hold.
    pub conditions: Vec<String>,
    /// Expressions printed for matching rows; empty prints `$0`.
    pub output: Vec<String>,
}

impl fmt::Display for MapProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.row_statements.is_empty() {
            write!(f, "{{{}}}", join_statements(&self.row_statements))?;
        }
        f.write_str(&self.conditions.join("&&"))?;
        if self.output.is_empty() {
            f.write_str("{print $0;}")
        } else {
            write!(f, "{{print {};}}", self.output.join(","))
        }
    }
}

/// Compile a map operator.
///
/// `outputs` are assignment blocks whose non-hidden names become the output
/// columns; `filters` are predicates that may use those names. When no
/// output name is registered the program passes rows through unchanged and
/// the output schema is the input schema.
///
/// # Errors
/// Failures are wrapped with the clause they occurred in.
pub fn map_program<S: AsRef<str>>(
    schema: &Schema,
    outputs: &[S],
    filters: &[S],
) -> CompileResult<(MapProgram, Schema)> {
    let mut statements = StatementCompiler::new(schema);
    statements
        .compile_all(outputs)
        .map_err(|err| err.in_clause(Clause::Output))?;
    let block = statements.finish();

    let mut conditions = ConditionCompiler::new(schema, &block.context);
    conditions
        .compile_all(filters)
        .map_err(|err| err.in_clause(Clause::Filter))?;
    let conditions = conditions.finish();

    let output_schema = if block.context.output_count() == 0 {
        schema.clone()
    } else {
        block
            .context
            .output_schema(schema)
            .map_err(|err| CompileError::from(err).in_clause(Clause::Output))?
    };

    let program = MapProgram {
        row_statements: block.code,
        conditions: conditions
            .iter()
            .map(CompiledExpr::code)
            .map(str::to_string)
            .collect(),
        output: block.context.output_code(),
    };

    debug!(
        outputs = program.output.len(),
        conditions = program.conditions.len(),
        "compiled map program"
    );
    Ok((program, output_schema))
}

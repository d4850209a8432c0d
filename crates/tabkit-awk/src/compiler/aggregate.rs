//! Aggregate blocks.
//!
//! Every value assigned here must be constant within a group: built from
//! literals, group keys and aggregate function results only. Each aggregate
//! call site becomes an [`Aggregator`] with its own state variable, an
//! optional per-group init statement and a per-row step statement.

use tabkit_ast::{Expr, ExprKind};
use tabkit_parser::parse_block;
use tabkit_schema::Schema;
use tracing::{debug, trace};

use super::{as_assignment, column_ref, ExprLowering};
use crate::context::{Context, VarNames};
use crate::error::{CompileError, CompileResult};
use crate::expr::CompiledExpr;
use crate::functions::{scalar_call, AggregateFunction, Aggregator};

/// Compiles aggregate blocks against a schema and the group-key context.
///
/// Names resolve against the group keys first, the schema second and the
/// block's own bindings last. Only output keys count as aggregated; hidden
/// key temporaries may vary within a group and resolve as plain values, and
/// reading one outside an aggregate call is reported by name.
pub struct AggregateCompiler<'a> {
    schema: &'a Schema,
    group: &'a Context,
    context: Context,
    vars: VarNames,
    aggregators: Vec<Aggregator>,
    steps: Vec<String>,
}

/// Result of an aggregate compilation.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateBlock {
    /// Aggregators in first-use order.
    pub aggregators: Vec<Aggregator>,
    /// Per-row statements: aggregator steps interleaved with assignments.
    pub steps: Vec<String>,
    /// Final bindings and output names.
    pub context: Context,
}

impl AggregateBlock {
    /// Init statements of the non-cumulative aggregators.
    pub fn init_code(&self) -> Vec<String> {
        self.aggregators
            .iter()
            .filter_map(|aggregator| aggregator.init.clone())
            .collect()
    }
}

impl<'a> AggregateCompiler<'a> {
    /// Start compiling against `schema` with keys bound in `group`.
    pub fn new(schema: &'a Schema, group: &'a Context) -> Self {
        Self {
            schema,
            group,
            context: Context::new(),
            vars: VarNames::new(VarNames::AGGREGATE),
            aggregators: Vec::new(),
            steps: Vec::new(),
        }
    }

    /// Compile one expression string.
    ///
    /// Step statements of the aggregators a statement introduces are
    /// emitted right before that statement's assignment.
    pub fn compile(&mut self, source: &str) -> CompileResult<()> {
        let block = parse_block(source)?;

        for stmt in &block {
            let (target, value) = as_assignment(stmt)?;
            let first_new = self.aggregators.len();
            let compiled = self.lower(value)?;
            if !compiled.is_aggregated() {
                return Err(match self.hidden_group_name(value) {
                    Some(name) => CompileError::HiddenGroupName {
                        target: target.to_string(),
                        name: name.to_string(),
                    },
                    None => CompileError::NeedAggregate(target.to_string()),
                });
            }

            self.steps.extend(
                self.aggregators[first_new..]
                    .iter()
                    .map(|aggregator| aggregator.step.clone()),
            );
            if let Some(code) = self.context.assign(target, compiled, &mut self.vars) {
                self.steps.push(code);
            }
        }

        debug!(
            statements = block.len(),
            aggregators = self.aggregators.len(),
            "compiled aggregate block"
        );
        Ok(())
    }

    /// First hidden group name read by `expr` outside an aggregate call.
    fn hidden_group_name<'e>(&self, expr: &'e Expr) -> Option<&'e str> {
        match &expr.kind {
            ExprKind::Name(name) => {
                (self.group.contains(name) && !self.group.is_output(name)).then_some(name.as_str())
            }
            ExprKind::Binary { left, right, .. } => self
                .hidden_group_name(left)
                .or_else(|| self.hidden_group_name(right)),
            ExprKind::Unary { operand, .. } => self.hidden_group_name(operand),
            ExprKind::Call { function, args } => {
                if AggregateFunction::from_name(function).is_some() {
                    return None;
                }
                args.iter().find_map(|arg| self.hidden_group_name(arg))
            }
            ExprKind::Integer(_) | ExprKind::Float(_) | ExprKind::String(_) => None,
        }
    }

    /// Compile every string in `sources`.
    pub fn compile_all<S: AsRef<str>>(&mut self, sources: &[S]) -> CompileResult<()> {
        for source in sources {
            self.compile(source.as_ref())?;
        }
        Ok(())
    }

    /// Finish, handing over aggregators, steps and the context.
    pub fn finish(self) -> AggregateBlock {
        AggregateBlock {
            aggregators: self.aggregators,
            steps: self.steps,
            context: self.context,
        }
    }
}

impl ExprLowering for AggregateCompiler<'_> {
    fn lower_name(&self, name: &str) -> CompileResult<CompiledExpr> {
        if let Some(key) = self.group.get(name) {
            if self.group.is_output(name) {
                return Ok(CompiledExpr::group_key(key));
            }
            return Ok(key.clone());
        }
        if let Some(column) = column_ref(self.schema, name) {
            return Ok(column);
        }
        self.context
            .get(name)
            .cloned()
            .ok_or_else(|| CompileError::UnknownIdentifier(name.to_string()))
    }

    fn lower_call(&mut self, function: &str, args: Vec<CompiledExpr>) -> CompileResult<CompiledExpr> {
        let Some(aggregate) = AggregateFunction::from_name(function) else {
            return scalar_call(function, args);
        };

        let aggregator = aggregate.instantiate(self.vars.fresh(), &args)?;
        trace!(
            function = aggregate.name(),
            var = %aggregator.var,
            "new aggregator"
        );
        let expr = CompiledExpr::aggregator(aggregator.var.clone(), aggregator.ty, args);
        self.aggregators.push(aggregator);
        Ok(expr)
    }
}
